//! Sliding-Window Sampling
//!
//! A language model learns by predicting the next token. To train it we cut
//! one long token stream into many fixed-length windows and pair each window
//! with the same window shifted one position to the right:
//!
//! ```text
//! Tokens:     [10, 20, 30, 40, 50, 60, 70, 80]
//! max_length: 4
//! stride:     1
//!
//! offset 0:  input [10, 20, 30, 40]  target [20, 30, 40, 50]
//! offset 1:  input [20, 30, 40, 50]  target [30, 40, 50, 60]
//! offset 2:  input [30, 40, 50, 60]  target [40, 50, 60, 70]
//! offset 3:  input [40, 50, 60, 70]  target [50, 60, 70, 80]
//! ```
//!
//! Position `k` of the target is the token that follows position `k` of the
//! input, so one window pair holds `max_length` prediction tasks.
//!
//! ## Stride
//!
//! The stride is how far the window moves between samples:
//!
//! - `stride < max_length`: windows overlap (more samples, more repetition)
//! - `stride == max_length`: windows tile the sequence with no overlap
//! - `stride > max_length`: windows leave gaps; some tokens are never used
//!
//! ## The Last Window
//!
//! The target window reaches one token further than the input window, so the
//! last valid offset `i` must satisfy `i + max_length <= N - 1`. Leftover
//! tokens that cannot form a full pair are dropped; nothing is padded. A
//! sequence with `N <= max_length` yields no pairs at all.
//!
//! ## Eager vs Lazy
//!
//! [`sample`] materializes every pair into a [`SampleSet`]. For very long
//! sequences [`Windows`] yields borrowed pairs on demand without copying.
//! Both produce exactly the same pairs in the same order.

use crate::error::{require_positive, Result};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

/// Integer token identifier produced by a tokenizer
pub type TokenId = usize;

/// Number of pairs produced for a sequence of `num_tokens` tokens
///
/// Equal to `floor((N - max_length - 1) / stride) + 1` when
/// `N > max_length`, otherwise zero. Returns zero for a zero `max_length`
/// or `stride` instead of dividing by zero; [`sample`] rejects those first.
///
/// # Example
///
/// ```rust
/// use yorick::pair_count;
///
/// assert_eq!(pair_count(8, 4, 1), 4);
/// assert_eq!(pair_count(9, 4, 2), 3);
/// assert_eq!(pair_count(3, 4, 1), 0);
/// ```
pub fn pair_count(num_tokens: usize, max_length: usize, stride: usize) -> usize {
    if max_length == 0 || stride == 0 || num_tokens <= max_length {
        return 0;
    }
    (num_tokens - max_length - 1) / stride + 1
}

/// Validated window parameters
///
/// Holding a `WindowConfig` means both `max_length` and `stride` are at
/// least 1, so sampling through it cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowConfig {
    max_length: usize,
    stride: usize,
}

impl WindowConfig {
    /// Create window parameters
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `max_length` or `stride` is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use yorick::WindowConfig;
    ///
    /// let window = WindowConfig::new(4, 2)?;
    /// assert_eq!(window.max_length(), 4);
    /// assert!(WindowConfig::new(0, 1).is_err());
    /// # Ok::<(), yorick::SamplerError>(())
    /// ```
    pub fn new(max_length: usize, stride: usize) -> Result<Self> {
        require_positive("max_length", max_length)?;
        require_positive("stride", stride)?;
        Ok(Self { max_length, stride })
    }

    /// Non-overlapping windows (`stride == max_length`)
    pub fn non_overlapping(max_length: usize) -> Result<Self> {
        Self::new(max_length, max_length)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of pairs this config produces for `num_tokens` tokens
    pub fn pair_count(&self, num_tokens: usize) -> usize {
        pair_count(num_tokens, self.max_length, self.stride)
    }

    /// Lazily iterate over the window pairs of `tokens`
    pub fn windows<'a>(&self, tokens: &'a [TokenId]) -> Windows<'a> {
        Windows::new(tokens, *self)
    }

    /// Materialize every window pair of `tokens`
    pub fn sample(&self, tokens: &[TokenId]) -> SampleSet {
        let pairs: Vec<SamplePair> = self.windows(tokens).map(SamplePair::from).collect();

        log::debug!(
            "sampled {} pairs from {} tokens (max_length={}, stride={})",
            pairs.len(),
            tokens.len(),
            self.max_length,
            self.stride
        );

        SampleSet {
            pairs,
            window: *self,
        }
    }
}

/// Cut a token sequence into (input, target) window pairs
///
/// Starting at offset 0 and advancing by `stride`, emits
/// `(tokens[i..i + max_length], tokens[i + 1..i + max_length + 1])` for every
/// offset that leaves room for the one-token-longer target.
///
/// # Arguments
///
/// * `tokens` - Token sequence (read-only)
/// * `max_length` - Window width in tokens
/// * `stride` - Offset step between successive windows
///
/// # Errors
///
/// `InvalidArgument` if `max_length` or `stride` is zero. A sequence that is
/// too short is not an error: the result is simply empty.
///
/// # Example
///
/// ```rust
/// use yorick::sample;
///
/// let tokens = [10, 20, 30, 40, 50, 60, 70, 80];
/// let samples = sample(&tokens, 4, 4)?;
///
/// assert_eq!(samples.len(), 1);
/// assert_eq!(samples[0].input, vec![10, 20, 30, 40]);
/// assert_eq!(samples[0].target, vec![20, 30, 40, 50]);
/// # Ok::<(), yorick::SamplerError>(())
/// ```
pub fn sample(tokens: &[TokenId], max_length: usize, stride: usize) -> Result<SampleSet> {
    Ok(WindowConfig::new(max_length, stride)?.sample(tokens))
}

/// One owned (input, target) training pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePair {
    /// Position of `input[0]` in the source sequence
    pub offset: usize,
    /// `tokens[offset..offset + max_length]`
    pub input: Vec<TokenId>,
    /// `tokens[offset + 1..offset + max_length + 1]`
    pub target: Vec<TokenId>,
}

impl From<WindowRef<'_>> for SamplePair {
    fn from(window: WindowRef<'_>) -> Self {
        Self {
            offset: window.offset,
            input: window.input.to_vec(),
            target: window.target.to_vec(),
        }
    }
}

/// Ordered collection of sample pairs, in generation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleSet {
    pairs: Vec<SamplePair>,
    window: WindowConfig,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SamplePair> {
        self.pairs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SamplePair> {
        self.pairs.iter()
    }

    pub fn pairs(&self) -> &[SamplePair] {
        &self.pairs
    }

    pub fn into_pairs(self) -> Vec<SamplePair> {
        self.pairs
    }

    /// Source offsets of every pair, in order
    pub fn offsets(&self) -> Vec<usize> {
        self.pairs.iter().map(|pair| pair.offset).collect()
    }

    /// Window parameters this set was sampled with
    pub fn window(&self) -> WindowConfig {
        self.window
    }

    pub fn max_length(&self) -> usize {
        self.window.max_length
    }

    pub fn stride(&self) -> usize {
        self.window.stride
    }
}

impl std::ops::Index<usize> for SampleSet {
    type Output = SamplePair;

    fn index(&self, index: usize) -> &SamplePair {
        &self.pairs[index]
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a SamplePair;
    type IntoIter = std::slice::Iter<'a, SamplePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Borrowed (input, target) pair yielded by [`Windows`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRef<'a> {
    pub offset: usize,
    pub input: &'a [TokenId],
    pub target: &'a [TokenId],
}

/// Lazy, restartable iterator over window pairs
///
/// Yields the same pairs as [`sample`] without copying any tokens. Calling
/// [`Windows::reset`] (or [`WindowConfig::windows`] again) starts from
/// offset 0; a clone continues from the current position.
///
/// # Example
///
/// ```rust
/// use yorick::WindowConfig;
///
/// let tokens: Vec<usize> = (0..9).collect();
/// let window = WindowConfig::new(4, 2)?;
///
/// let offsets: Vec<usize> = window.windows(&tokens).map(|w| w.offset).collect();
/// assert_eq!(offsets, vec![0, 2, 4]);
/// # Ok::<(), yorick::SamplerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    tokens: &'a [TokenId],
    window: WindowConfig,
    // Index of the next pair, not its offset
    next: usize,
    count: usize,
}

impl<'a> Windows<'a> {
    fn new(tokens: &'a [TokenId], window: WindowConfig) -> Self {
        Self {
            tokens,
            window,
            next: 0,
            count: window.pair_count(tokens.len()),
        }
    }

    /// Restart iteration from offset 0
    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Total number of pairs in a full pass, regardless of progress
    pub fn total(&self) -> usize {
        self.count
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = WindowRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }

        let offset = self.next * self.window.stride;
        let end = offset + self.window.max_length;
        self.next += 1;

        Some(WindowRef {
            offset,
            input: &self.tokens[offset..end],
            target: &self.tokens[offset + 1..end + 1],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.next = self.next.saturating_add(n).min(self.count);
        self.next()
    }
}

impl ExactSizeIterator for Windows<'_> {}

impl FusedIterator for Windows<'_> {}
