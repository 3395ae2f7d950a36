//! Pipeline error type.

/// Error type for render and streaming operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Shell not sent before body chunks")]
    ShellNotSent,

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Boundary '{0}' already resolved")]
    AlreadyResolved(String),

    #[error("Boundary '{0}' failed: {1}")]
    BoundaryFailed(String, String),

    #[error("Data error: {0}")]
    Data(#[from] anyhow::Error),
}
