//! Batching and Data Loading
//!
//! A training loop consumes sample pairs a batch at a time. This module
//! groups a [`SampleSet`] into consecutive batches, optionally reordering the
//! pairs first:
//!
//! ```text
//! Pairs (batch_size = 2):   p0 p1 p2 p3 p4
//!
//! shuffle = false:          [p0 p1] [p2 p3] [p4]
//! shuffle = true:           [p3 p0] [p4 p2] [p1]     (depends on RNG)
//! drop_last = true:         [p0 p1] [p2 p3]          (short batch dropped)
//! ```
//!
//! Shuffling moves whole pairs; tokens inside a window are never reordered.
//! The random source is always passed in by the caller, so a fixed seed
//! gives the same batches on every run.
//!
//! ## Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use yorick::{sample, DataLoader, LoaderConfig};
//!
//! let tokens: Vec<usize> = (0..100).collect();
//! let samples = sample(&tokens, 8, 8)?;
//!
//! let config = LoaderConfig::new(4, true, true)?;
//! let mut loader = DataLoader::new(samples, config, StdRng::seed_from_u64(42));
//!
//! while let Some((inputs, targets)) = loader.next_batch() {
//!     assert_eq!(inputs.len(), 4);     // batch_size
//!     assert_eq!(inputs[0].len(), 8);  // max_length
//!     assert_eq!(targets.len(), inputs.len());
//! }
//! # Ok::<(), yorick::SamplerError>(())
//! ```

use crate::error::{require_positive, Result};
use crate::sampler::{SamplePair, SampleSet, TokenId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// A batch of input/target windows
/// Each element is a Vec<Vec<TokenId>> with shape [batch_len][max_length]
pub type Batch = (Vec<Vec<TokenId>>, Vec<Vec<TokenId>>);

/// Batching parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
}

impl LoaderConfig {
    /// # Errors
    ///
    /// `InvalidArgument` if `batch_size` is zero.
    pub fn new(batch_size: usize, shuffle: bool, drop_last: bool) -> Result<Self> {
        require_positive("batch_size", batch_size)?;
        Ok(Self {
            batch_size,
            shuffle,
            drop_last,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn drop_last(&self) -> bool {
        self.drop_last
    }

    /// Number of batches produced from `num_pairs` pairs
    pub fn num_batches(&self, num_pairs: usize) -> usize {
        if self.drop_last {
            num_pairs / self.batch_size
        } else {
            num_pairs.div_ceil(self.batch_size)
        }
    }
}

/// Pair indices in visiting order for one epoch
fn epoch_order<R: Rng + ?Sized>(len: usize, shuffle: bool, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    if shuffle {
        order.shuffle(rng);
    }
    order
}

fn build_batch(pairs: &[SamplePair], indices: &[usize]) -> Batch {
    indices
        .iter()
        .map(|&i| (pairs[i].input.clone(), pairs[i].target.clone()))
        .unzip()
}

/// Partition a sample set into batches in one call
///
/// `rng` is only consulted when `config.shuffle()` is set.
///
/// # Example
///
/// ```rust
/// use yorick::{collate, sample, LoaderConfig};
///
/// let tokens: Vec<usize> = (0..11).collect();
/// let samples = sample(&tokens, 2, 2)?;   // 5 pairs
///
/// let config = LoaderConfig::new(2, false, false)?;
/// let batches = collate(&samples, config, &mut rand::rng());
/// assert_eq!(batches.len(), 3);
/// assert_eq!(batches[2].0.len(), 1);       // short trailing batch kept
/// # Ok::<(), yorick::SamplerError>(())
/// ```
pub fn collate<R: Rng + ?Sized>(samples: &SampleSet, config: LoaderConfig, rng: &mut R) -> Vec<Batch> {
    let order = epoch_order(samples.len(), config.shuffle, rng);

    order
        .chunks(config.batch_size)
        .filter(|chunk| !config.drop_last || chunk.len() == config.batch_size)
        .map(|chunk| build_batch(samples.pairs(), chunk))
        .collect()
}

/// Stateful data loader over a sample set
///
/// Hands out one batch per call to [`DataLoader::next_batch`]. When the
/// epoch is exhausted it returns `None` and rewinds; with `shuffle` set, a
/// fresh pair order is drawn from the loader's own random source at every
/// epoch boundary, including the first.
///
/// # Fields
///
/// - `samples`: All sample pairs
/// - `config`: Batch size, shuffle and drop-last flags
/// - `rng`: Random source for shuffling, supplied by the caller
/// - `order`: Pair indices for the current epoch
/// - `position`: Index into `order` of the next pair to hand out
pub struct DataLoader<R = StdRng> {
    samples: SampleSet,
    config: LoaderConfig,
    rng: R,
    order: Vec<usize>,
    position: usize,
}

impl<R: Rng> DataLoader<R> {
    /// Create a loader and draw the first epoch's order
    ///
    /// `rng` is kept for the lifetime of the loader and only consulted when
    /// `config.shuffle()` is set. Seeding it fixes the order of every epoch.
    pub fn new(samples: SampleSet, config: LoaderConfig, mut rng: R) -> Self {
        if samples.is_empty() {
            log::warn!("data loader created from an empty sample set");
        }

        let order = epoch_order(samples.len(), config.shuffle, &mut rng);
        Self {
            samples,
            config,
            rng,
            order,
            position: 0,
        }
    }

    /// Rewind and, if shuffling is enabled, draw a new pair order
    pub fn start_epoch(&mut self) {
        self.order = epoch_order(self.samples.len(), self.config.shuffle, &mut self.rng);
        self.position = 0;
    }

    /// Get the next batch of training data
    ///
    /// # Returns
    ///
    /// - `Some((inputs, targets))` if a batch is available
    /// - `None` if the epoch is complete (starts the next epoch)
    pub fn next_batch(&mut self) -> Option<Batch> {
        let remaining = self.order.len() - self.position;
        let take = remaining.min(self.config.batch_size);

        if take == 0 || (self.config.drop_last && take < self.config.batch_size) {
            // Epoch complete
            self.start_epoch();
            return None;
        }

        let indices = &self.order[self.position..self.position + take];
        let batch = build_batch(self.samples.pairs(), indices);
        self.position += take;

        Some(batch)
    }

    /// Rewind to the start of the current epoch order
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Number of batches per epoch
    pub fn num_batches(&self) -> usize {
        self.config.num_batches(self.samples.len())
    }

    /// Number of sample pairs
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn config(&self) -> LoaderConfig {
        self.config
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sample;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// 10 non-overlapping pairs whose inputs start at 0, 3, 6, ...
    fn ten_pairs() -> SampleSet {
        let tokens: Vec<TokenId> = (0..31).collect();
        sample(&tokens, 3, 3).unwrap()
    }

    fn first_tokens(batch: &Batch) -> Vec<TokenId> {
        batch.0.iter().map(|input| input[0]).collect()
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(LoaderConfig::new(0, false, false)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_collate_preserves_order_without_shuffle() {
        let samples = ten_pairs();
        let config = LoaderConfig::new(4, false, false).unwrap();
        let batches = collate(&samples, config, &mut StdRng::seed_from_u64(0));

        assert_eq!(batches.len(), 3);
        assert_eq!(first_tokens(&batches[0]), vec![0, 3, 6, 9]);
        assert_eq!(first_tokens(&batches[1]), vec![12, 15, 18, 21]);
        assert_eq!(first_tokens(&batches[2]), vec![24, 27]);
    }

    #[test]
    fn test_collate_drop_last() {
        let samples = ten_pairs();
        let config = LoaderConfig::new(4, false, true).unwrap();
        let batches = collate(&samples, config, &mut StdRng::seed_from_u64(0));

        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|(inputs, _)| inputs.len() == 4));
        assert_eq!(config.num_batches(samples.len()), 2);
    }

    #[test]
    fn test_collate_exact_multiple_keeps_every_batch() {
        let samples = ten_pairs();
        let config = LoaderConfig::new(5, false, true).unwrap();
        assert_eq!(collate(&samples, config, &mut rand::rng()).len(), 2);
    }

    #[test]
    fn test_targets_follow_inputs() {
        let samples = ten_pairs();
        let config = LoaderConfig::new(3, true, false).unwrap();

        for (inputs, targets) in collate(&samples, config, &mut StdRng::seed_from_u64(9)) {
            for (input, target) in inputs.iter().zip(&targets) {
                assert_eq!(target[0], input[0] + 1);
                assert_eq!(&input[1..], &target[..2]);
            }
        }
    }

    #[test]
    fn test_shuffle_is_reproducible_and_a_permutation() {
        let samples = ten_pairs();
        let config = LoaderConfig::new(3, true, false).unwrap();

        let a = collate(&samples, config, &mut StdRng::seed_from_u64(7));
        let b = collate(&samples, config, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);

        let mut seen: Vec<TokenId> = a.iter().flat_map(first_tokens).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).map(|i| i * 3).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_changes_order_for_some_seed() {
        let samples = ten_pairs();
        let config = LoaderConfig::new(10, true, false).unwrap();
        let unshuffled: Vec<TokenId> = (0..10).map(|i| i * 3).collect();

        let any_reordered = (0..8u64).any(|seed| {
            let batches = collate(&samples, config, &mut StdRng::seed_from_u64(seed));
            first_tokens(&batches[0]) != unshuffled
        });
        assert!(any_reordered);
    }

    #[test]
    fn test_loader_epoch_cycle() {
        let config = LoaderConfig::new(4, false, false).unwrap();
        let mut loader = DataLoader::new(ten_pairs(), config, StdRng::seed_from_u64(0));

        assert_eq!(loader.num_batches(), 3);
        let sizes: Vec<usize> = std::iter::from_fn(|| loader.next_batch())
            .map(|(inputs, _)| inputs.len())
            .collect();
        assert_eq!(sizes, vec![4, 4, 2]);

        // End of epoch rewinds automatically
        assert_eq!(first_tokens(&loader.next_batch().unwrap()), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_loader_drop_last() {
        let config = LoaderConfig::new(4, false, true).unwrap();
        let mut loader = DataLoader::new(ten_pairs(), config, StdRng::seed_from_u64(0));

        assert!(loader.next_batch().is_some());
        assert!(loader.next_batch().is_some());
        assert!(loader.next_batch().is_none());
        assert_eq!(loader.num_batches(), 2);
    }

    #[test]
    fn test_loader_matches_collate() {
        let samples = ten_pairs();
        let config = LoaderConfig::new(3, true, true).unwrap();

        let expected = collate(&samples, config, &mut StdRng::seed_from_u64(11));

        let mut loader = DataLoader::new(samples, config, StdRng::seed_from_u64(11));
        let actual: Vec<Batch> = std::iter::from_fn(|| loader.next_batch()).collect();

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_loader_first_epoch_is_shuffled() {
        let config = LoaderConfig::new(10, true, false).unwrap();
        let unshuffled: Vec<TokenId> = (0..10).map(|i| i * 3).collect();

        let any_reordered = (0..8u64).any(|seed| {
            let mut loader = DataLoader::new(ten_pairs(), config, StdRng::seed_from_u64(seed));
            first_tokens(&loader.next_batch().unwrap()) != unshuffled
        });
        assert!(any_reordered);
    }

    #[test]
    fn test_loader_reshuffles_each_epoch() {
        let config = LoaderConfig::new(10, true, false).unwrap();

        let any_changed = (0..8u64).any(|seed| {
            let mut loader = DataLoader::new(ten_pairs(), config, StdRng::seed_from_u64(seed));
            let first = loader.next_batch().unwrap();
            assert!(loader.next_batch().is_none());
            let second = loader.next_batch().unwrap();

            let mut seen = first_tokens(&second);
            seen.sort_unstable();
            assert_eq!(seen, (0..10).map(|i| i * 3).collect::<Vec<_>>());

            first != second
        });
        assert!(any_changed);
    }

    #[test]
    fn test_loader_seed_fixes_every_epoch() {
        let config = LoaderConfig::new(4, true, false).unwrap();
        let mut a = DataLoader::new(ten_pairs(), config, StdRng::seed_from_u64(5));
        let mut b = DataLoader::new(ten_pairs(), config, StdRng::seed_from_u64(5));

        // Three epochs of three batches plus the end-of-epoch None
        for _ in 0..12 {
            assert_eq!(a.next_batch(), b.next_batch());
        }
    }

    #[test]
    fn test_loader_reset() {
        let config = LoaderConfig::new(2, false, false).unwrap();
        let mut loader = DataLoader::new(ten_pairs(), config, StdRng::seed_from_u64(0));

        let first = loader.next_batch().unwrap();
        loader.next_batch();
        loader.reset();
        assert_eq!(loader.next_batch().unwrap(), first);
    }

    #[test]
    fn test_empty_loader() {
        let samples = sample(&[1, 2], 4, 1).unwrap();
        let config = LoaderConfig::new(2, true, false).unwrap();
        let mut loader = DataLoader::new(samples, config, StdRng::seed_from_u64(1));

        loader.start_epoch();
        assert!(loader.is_empty());
        assert_eq!(loader.num_batches(), 0);
        assert!(loader.next_batch().is_none());
    }
}
