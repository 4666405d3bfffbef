use async_trait::async_trait;

use super::error::StorageError;

/// Opaque storage for uploaded media files.
///
/// The server never inspects or transcodes content; it hands bytes in and
/// gets back a stored name that it turns into a public URL.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store bytes and return the generated stored name.
    ///
    /// The extension of `original_name` is preserved so that serving can
    /// guess a content type later.
    async fn upload(&self, data: &[u8], original_name: &str) -> Result<String, StorageError>;

    /// Retrieve all bytes for a stored file.
    async fn open(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Check whether a stored file exists.
    async fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Delete a stored file.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;
}
