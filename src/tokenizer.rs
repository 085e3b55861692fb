//! Tokenizer Boundary
//!
//! The sampler never looks inside tokens: it only needs an ordered sequence
//! of integer IDs. Anything that can turn text into IDs can feed it, so the
//! tokenizer is expressed as a trait.
//!
//! ## Byte-Level Tokenizer
//!
//! [`ByteTokenizer`] is the simplest possible implementation: every UTF-8
//! byte becomes one token, giving a fixed vocabulary of 256.
//!
//! ```text
//! "Hi é"  →  bytes [0x48, 0x69, 0x20, 0xc3, 0xa9]  →  IDs [72, 105, 32, 195, 169]
//! ```
//!
//! A real subword tokenizer (BPE, WordPiece, ...) produces far fewer tokens
//! for the same text, but the windows built on top look exactly the same.

use crate::sampler::TokenId;
use rayon::prelude::*;

/// Texts larger than this are encoded in parallel chunks
const PARALLEL_THRESHOLD: usize = 1 << 20;

/// Anything that maps text to token IDs and back
pub trait Tokenizer {
    /// Encode text into token IDs
    fn encode(&self, text: &str) -> Vec<TokenId>;

    /// Decode token IDs back into text
    fn decode(&self, ids: &[TokenId]) -> String;

    /// Number of distinct token IDs this tokenizer can produce
    fn vocab_size(&self) -> usize;
}

/// One token per UTF-8 byte
///
/// # Example
///
/// ```rust
/// use yorick::{ByteTokenizer, Tokenizer};
///
/// let tokenizer = ByteTokenizer;
/// let ids = tokenizer.encode("To be");
/// assert_eq!(ids, vec![84, 111, 32, 98, 101]);
/// assert_eq!(tokenizer.decode(&ids), "To be");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteTokenizer;

impl Tokenizer for ByteTokenizer {
    fn encode(&self, text: &str) -> Vec<TokenId> {
        let bytes = text.as_bytes();
        if bytes.len() < PARALLEL_THRESHOLD {
            return bytes.iter().map(|&b| b as TokenId).collect();
        }

        // Byte tokens never span a chunk boundary, so chunks concatenate cleanly
        let chunk_size = (bytes.len() / rayon::current_num_threads().max(1)).max(1);
        bytes
            .par_chunks(chunk_size)
            .flat_map_iter(|chunk| chunk.iter().map(|&b| b as TokenId))
            .collect()
    }

    /// Out-of-range IDs are skipped and invalid UTF-8 is replaced
    fn decode(&self, ids: &[TokenId]) -> String {
        let bytes: Vec<u8> = ids
            .iter()
            .filter_map(|&id| u8::try_from(id).ok())
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn vocab_size(&self) -> usize {
        256
    }
}
