//! Error Types
//!
//! Everything that can go wrong while sampling or loading data. Argument
//! checks run before any work is done, so an error always means nothing
//! was produced.
//!
//! A sequence that is too short to form a single pair is *not* an error:
//! sampling returns an empty [`SampleSet`](crate::SampleSet) and callers
//! that need at least one sample check `is_empty()` themselves.

use thiserror::Error;

/// Errors produced by the sampler, the loader, and config I/O
#[derive(Error, Debug)]
pub enum SamplerError {
    /// A size parameter (`max_length`, `stride`, `batch_size`) was zero
    #[error("invalid argument: {name} must be at least 1 (got {value})")]
    InvalidArgument { name: &'static str, value: usize },

    /// Validation fraction outside `[0, 1]`
    #[error("invalid argument: val_fraction must be within [0, 1] (got {0})")]
    InvalidFraction(f32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SamplerError {
    /// True for errors caused by a bad caller-supplied parameter
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            SamplerError::InvalidArgument { .. } | SamplerError::InvalidFraction(_)
        )
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, SamplerError>;

/// Reject a zero-valued size parameter.
pub(crate) fn require_positive(name: &'static str, value: usize) -> Result<()> {
    if value < 1 {
        return Err(SamplerError::InvalidArgument { name, value });
    }
    Ok(())
}
