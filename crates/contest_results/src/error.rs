//! Error types for results exports.

use contest_core::StoreError;
use thiserror::Error;

/// Result type for results exports.
pub type Result<T> = std::result::Result<T, ResultsError>;

/// Errors raised while building results.
#[derive(Error, Debug)]
pub enum ResultsError {
    /// Collation data for the requested locale is unavailable
    #[error("Failed to load collator: {0}")]
    Collation(String),

    /// Reading export settings from the record store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
