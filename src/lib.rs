//! Yorick: Sliding-Window Training Data for Language Models
//!
//! Turns a stream of token IDs into the (input, target) pairs a language
//! model learns next-token prediction from, and groups them into batches.
//! Named after the jester whose skull Hamlet holds, because every window
//! here is a small slice of something that used to be longer.
//!
//! # Modules
//!
//! - [`sampler`] - Sliding-window (input, target) pair generation
//! - [`loader`] - Batching, shuffling and the stateful data loader
//! - [`dataset`] - Text datasets, parallel document sampling, train/val split
//! - [`tokenizer`] - The tokenizer trait and a byte-level implementation
//! - [`config`] - Serializable pipeline configuration
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```rust
//! use yorick::sample;
//!
//! let tokens = [10, 20, 30, 40, 50, 60, 70, 80];
//! let samples = sample(&tokens, 4, 1)?;
//!
//! assert_eq!(samples.len(), 4);
//! assert_eq!(samples[0].input, vec![10, 20, 30, 40]);
//! assert_eq!(samples[0].target, vec![20, 30, 40, 50]);
//! # Ok::<(), yorick::SamplerError>(())
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod sampler;
pub mod tokenizer;

// Re-export main types for convenience
pub use config::DatasetConfig;
pub use dataset::{create_dataloader, sample_documents, train_val_split, TextDataset};
pub use error::{Result, SamplerError};
pub use loader::{collate, Batch, DataLoader, LoaderConfig};
pub use sampler::{
    pair_count, sample, SamplePair, SampleSet, TokenId, WindowConfig, WindowRef, Windows,
};
pub use tokenizer::{ByteTokenizer, Tokenizer};
