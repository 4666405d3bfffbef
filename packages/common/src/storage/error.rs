use thiserror::Error;

/// Errors that can occur during media storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested file was not found.
    #[error("media file not found: {0}")]
    NotFound(String),

    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored name contains path separators or traversal components.
    #[error("invalid media name: {0}")]
    InvalidName(String),

    /// The file exceeds the configured size limit.
    #[error("file exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
