use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::error::StorageError;
use super::traits::MediaStore;

/// Filesystem-backed media store.
///
/// Files are stored flat under `root` with random (UUIDv4) names; the
/// extension of the uploaded file is kept so the serving side can guess a
/// content type. Writes go through a `.tmp` sibling and are renamed into
/// place, so a partially written file is never visible under its final name.
pub struct FilesystemMediaStore {
    root: PathBuf,
    max_size: u64,
}

impl FilesystemMediaStore {
    /// Create a new filesystem media store rooted at `root`.
    pub async fn new(root: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self { root, max_size })
    }

    fn file_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    fn temp_path(&self) -> PathBuf {
        self.root.join(".tmp").join(Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn upload(&self, data: &[u8], original_name: &str) -> Result<String, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let name = match sanitized_extension(original_name) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };

        let tmp = self.temp_path();
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, self.root.join(&name)).await?;

        tracing::debug!(name = %name, size = data.len(), "stored media file");
        Ok(name)
    }

    async fn open(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.file_path(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.file_path(name)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.file_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reject names that could escape the storage root.
fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
    {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Extract a safe, lowercase extension from an uploaded filename.
fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = original_name.rsplit_once('.')?.1;
    if ext.is_empty() || ext.len() > 8 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
