//! Dataset Configuration
//!
//! Every knob of the sampling pipeline in one serializable struct:
//!
//! | option       | effect                                           |
//! |--------------|--------------------------------------------------|
//! | `max_length` | window width in tokens                           |
//! | `stride`     | offset step between successive windows           |
//! | `batch_size` | pairs per batch                                  |
//! | `shuffle`    | whether pair order is randomized each epoch      |
//! | `drop_last`  | whether a short trailing batch is discarded      |
//! | `seed`       | seed for the shuffling RNG (`None` = from entropy) |
//!
//! Configs are stored as JSON so an experiment can be reproduced later:
//!
//! ```rust,no_run
//! use yorick::DatasetConfig;
//!
//! let config = DatasetConfig::small();
//! config.save("dataset.json")?;
//!
//! let restored = DatasetConfig::load("dataset.json")?;
//! assert_eq!(config, restored);
//! # Ok::<(), yorick::SamplerError>(())
//! ```

use crate::error::{require_positive, Result};
use crate::loader::LoaderConfig;
use crate::sampler::WindowConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Sampling and batching parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Window width in tokens
    pub max_length: usize,
    /// Offset step between windows
    pub stride: usize,
    /// Pairs per batch
    pub batch_size: usize,
    /// Reorder pairs each epoch
    pub shuffle: bool,
    /// Discard a short trailing batch
    pub drop_last: bool,
    /// Seed for shuffling; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            max_length: 256,
            stride: 128,
            batch_size: 4,
            shuffle: true,
            drop_last: true,
            seed: None,
        }
    }
}

impl DatasetConfig {
    /// Short windows for quick experiments and tests
    ///
    /// Non-overlapping 64-token windows, no shuffling, so output is easy to
    /// inspect by eye.
    pub fn tiny() -> Self {
        Self {
            max_length: 64,
            stride: 64,
            batch_size: 8,
            shuffle: false,
            drop_last: false,
            seed: Some(123),
        }
    }

    /// Medium windows with 50% overlap
    pub fn small() -> Self {
        Self {
            max_length: 128,
            stride: 64,
            batch_size: 16,
            shuffle: true,
            drop_last: true,
            seed: Some(123),
        }
    }

    /// Check every size parameter is at least 1
    pub fn validate(&self) -> Result<()> {
        require_positive("max_length", self.max_length)?;
        require_positive("stride", self.stride)?;
        require_positive("batch_size", self.batch_size)?;
        Ok(())
    }

    /// Validated window parameters
    pub fn window(&self) -> Result<WindowConfig> {
        WindowConfig::new(self.max_length, self.stride)
    }

    /// Validated batching parameters
    pub fn loader(&self) -> Result<LoaderConfig> {
        LoaderConfig::new(self.batch_size, self.shuffle, self.drop_last)
    }

    /// Shuffling RNG: seeded when `seed` is set, otherwise from OS entropy
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Validate, then write the config as pretty-printed JSON
    ///
    /// Nothing is written for an invalid config, so every saved file loads.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a config from JSON and validate it
    ///
    /// Missing fields fall back to [`DatasetConfig::default`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: DatasetConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
