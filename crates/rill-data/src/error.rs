//! Error type for data source operations.

use std::time::Duration;

/// Error type for data loads.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Attempts exhausted after {attempts} tries: {last}")]
    Exhausted { attempts: u32, last: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Source error: {0}")]
    Source(#[from] anyhow::Error),
}
