//! Text Datasets
//!
//! Glue between raw text and the sampler: tokenize once, keep the tokens,
//! and sample them into window pairs.
//!
//! ```text
//! text ──Tokenizer::encode──▶ tokens ──sample──▶ SampleSet ──DataLoader──▶ batches
//! ```
//!
//! [`create_dataloader`] does the whole chain in one call from a
//! [`DatasetConfig`].
//!
//! ## Example
//!
//! ```rust
//! use yorick::{create_dataloader, ByteTokenizer, DatasetConfig};
//!
//! let text = "To be, or not to be, that is the question.";
//! let config = DatasetConfig {
//!     max_length: 8,
//!     stride: 4,
//!     batch_size: 2,
//!     shuffle: false,
//!     drop_last: false,
//!     seed: None,
//! };
//!
//! let mut loader = create_dataloader(text, &ByteTokenizer, &config)?;
//! let (inputs, targets) = loader.next_batch().unwrap();
//! assert_eq!(inputs[0].len(), 8);
//! assert_eq!(targets[0][0], inputs[0][1]);
//! # Ok::<(), yorick::SamplerError>(())
//! ```

use crate::config::DatasetConfig;
use crate::error::{Result, SamplerError};
use crate::loader::DataLoader;
use crate::sampler::{SamplePair, SampleSet, TokenId, WindowConfig};
use crate::tokenizer::Tokenizer;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Tokenized text plus its window pairs
pub struct TextDataset {
    tokens: Vec<TokenId>,
    samples: SampleSet,
}

impl TextDataset {
    /// Tokenize `text` and sample it
    pub fn new<T: Tokenizer + ?Sized>(text: &str, tokenizer: &T, window: WindowConfig) -> Self {
        let tokens = tokenizer.encode(text);
        log::info!("Loaded {} tokens from text", tokens.len());
        Self::from_tokens(tokens, window)
    }

    /// Read a text file, tokenize it, and sample it
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read.
    pub fn from_file<P, T>(path: P, tokenizer: &T, window: WindowConfig) -> Result<Self>
    where
        P: AsRef<Path>,
        T: Tokenizer + ?Sized,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        log::info!("Read {} bytes from {}", text.len(), path.display());
        Ok(Self::new(&text, tokenizer, window))
    }

    /// Sample an already tokenized sequence
    pub fn from_tokens(tokens: Vec<TokenId>, window: WindowConfig) -> Self {
        let samples = window.sample(&tokens);

        if samples.is_empty() {
            log::warn!(
                "{} tokens is too short for max_length {}; dataset is empty",
                tokens.len(),
                window.max_length()
            );
        } else {
            log::info!(
                "Built {} sample pairs (max_length={}, stride={})",
                samples.len(),
                window.max_length(),
                window.stride()
            );
        }

        Self { tokens, samples }
    }

    pub fn tokens(&self) -> &[TokenId] {
        &self.tokens
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    pub fn into_samples(self) -> SampleSet {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SamplePair> {
        self.samples.get(index)
    }
}

/// Tokenize text and wrap its window pairs in a [`DataLoader`]
///
/// Every parameter in `config` is validated before the text is touched.
/// The loader owns the generator from [`DatasetConfig::rng`], so with
/// `config.shuffle` set every epoch, the first included, gets a new order.
///
/// # Errors
///
/// `InvalidArgument` if `max_length`, `stride` or `batch_size` is zero.
pub fn create_dataloader<T: Tokenizer + ?Sized>(
    text: &str,
    tokenizer: &T,
    config: &DatasetConfig,
) -> Result<DataLoader> {
    let window = config.window()?;
    let loader_config = config.loader()?;

    let dataset = TextDataset::new(text, tokenizer, window);
    Ok(DataLoader::new(
        dataset.into_samples(),
        loader_config,
        config.rng(),
    ))
}

/// Sample many independent token sequences in parallel
///
/// Each document is windowed on its own, so no pair ever spans two
/// documents. Output order matches input order.
///
/// # Example
///
/// ```rust
/// use yorick::{sample_documents, WindowConfig};
///
/// let docs = vec![vec![1, 2, 3, 4, 5], vec![6, 7], vec![8, 9, 10]];
/// let sets = sample_documents(&docs, WindowConfig::new(2, 1)?);
///
/// let counts: Vec<usize> = sets.iter().map(|s| s.len()).collect();
/// assert_eq!(counts, vec![3, 0, 1]);
/// # Ok::<(), yorick::SamplerError>(())
/// ```
pub fn sample_documents(documents: &[Vec<TokenId>], window: WindowConfig) -> Vec<SampleSet> {
    documents
        .par_iter()
        .map(|tokens| window.sample(tokens))
        .collect()
}

/// Split tokenized data into training and validation sets
///
/// The validation set is taken from the end of the data so the two sets do
/// not interleave. Sample each half separately so no window crosses the cut.
///
/// # Arguments
///
/// * `tokens` - All tokenized data
/// * `val_fraction` - Fraction to use for validation (e.g., 0.1 for 10%)
///
/// # Example
///
/// ```rust
/// # use yorick::train_val_split;
/// let tokens = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
/// let (train, val) = train_val_split(&tokens, 0.2)?;
/// assert_eq!(train.len(), 8);  // 80% for training
/// assert_eq!(val.len(), 2);    // 20% for validation
/// # Ok::<(), yorick::SamplerError>(())
/// ```
pub fn train_val_split(tokens: &[TokenId], val_fraction: f32) -> Result<(&[TokenId], &[TokenId])> {
    if !(0.0..=1.0).contains(&val_fraction) {
        return Err(SamplerError::InvalidFraction(val_fraction));
    }

    let split_idx = ((tokens.len() as f64) * (1.0 - val_fraction as f64)).round() as usize;
    Ok(tokens.split_at(split_idx.min(tokens.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::ByteTokenizer;
    use std::io::Write;

    #[test]
    fn test_dataset_from_text() {
        let window = WindowConfig::new(4, 4).unwrap();
        let dataset = TextDataset::new("abcdefghij", &ByteTokenizer, window);

        assert_eq!(dataset.tokens().len(), 10);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(0).unwrap().input, ByteTokenizer.encode("abcd"));
        assert_eq!(dataset.get(1).unwrap().target, ByteTokenizer.encode("fghi"));
        assert!(dataset.get(2).is_none());
    }

    #[test]
    fn test_dataset_too_short_is_empty() {
        let window = WindowConfig::new(16, 1).unwrap();
        let dataset = TextDataset::new("short", &ByteTokenizer, window);
        assert!(dataset.is_empty());
        assert_eq!(dataset.tokens().len(), 5);
    }

    #[test]
    fn test_dataset_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "To be, or not to be").unwrap();

        let window = WindowConfig::new(5, 2).unwrap();
        let dataset = TextDataset::from_file(file.path(), &ByteTokenizer, window).unwrap();

        assert_eq!(dataset.tokens().len(), 19);
        assert_eq!(dataset.len(), window.pair_count(19));
    }

    #[test]
    fn test_dataset_missing_file() {
        let window = WindowConfig::new(5, 2).unwrap();
        let result = TextDataset::from_file("/nonexistent/corpus.txt", &ByteTokenizer, window);
        assert!(matches!(result, Err(SamplerError::Io(_))));
    }

    #[test]
    fn test_dataset_accepts_trait_object() {
        let tokenizer: Box<dyn Tokenizer> = Box::new(ByteTokenizer);
        let window = WindowConfig::new(2, 1).unwrap();
        let dataset = TextDataset::new("abc", tokenizer.as_ref(), window);
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_create_dataloader_validates_first() {
        let config = DatasetConfig {
            batch_size: 0,
            ..DatasetConfig::tiny()
        };
        let err = create_dataloader("some text", &ByteTokenizer, &config).err().unwrap();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_create_dataloader_seeded_shuffle_is_reproducible() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(10);
        let config = DatasetConfig {
            max_length: 6,
            stride: 3,
            batch_size: 5,
            shuffle: true,
            drop_last: true,
            seed: Some(2024),
        };

        let mut a = create_dataloader(&text, &ByteTokenizer, &config).unwrap();
        let mut b = create_dataloader(&text, &ByteTokenizer, &config).unwrap();

        assert_eq!(a.num_batches(), b.num_batches());
        for _ in 0..a.num_batches() {
            assert_eq!(a.next_batch(), b.next_batch());
        }
        assert!(a.next_batch().is_none());
        assert!(b.next_batch().is_none());

        // The second epoch draws from the same seeded stream
        assert_eq!(a.next_batch(), b.next_batch());
    }

    #[test]
    fn test_sample_documents_matches_sequential() {
        let docs: Vec<Vec<TokenId>> = (0..32)
            .map(|d| (0..(d * 3 + 1)).map(|t| t * 10 + d).collect())
            .collect();
        let window = WindowConfig::new(4, 3).unwrap();

        let parallel = sample_documents(&docs, window);
        let sequential: Vec<SampleSet> = docs.iter().map(|doc| window.sample(doc)).collect();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_train_val_split() {
        let tokens: Vec<TokenId> = (0..10).collect();

        let (train, val) = train_val_split(&tokens, 0.2).unwrap();
        assert_eq!(train, &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(val, &[8, 9]);

        let (train, val) = train_val_split(&tokens, 0.0).unwrap();
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());

        let (train, val) = train_val_split(&tokens, 1.0).unwrap();
        assert!(train.is_empty());
        assert_eq!(val.len(), 10);
    }

    #[test]
    fn test_train_val_split_rejects_bad_fraction() {
        let tokens: Vec<TokenId> = (0..10).collect();
        assert!(matches!(
            train_val_split(&tokens, 1.5),
            Err(SamplerError::InvalidFraction(_))
        ));
        assert!(train_val_split(&tokens, -0.1).is_err());
        assert!(train_val_split(&tokens, f32::NAN).is_err());
    }
}
