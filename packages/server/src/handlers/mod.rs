pub mod auth;
pub mod category;
pub mod comment;
pub mod media;
pub mod post;
pub mod subcategory;
pub mod tag;
pub mod user;

use axum::extract::Multipart;

use crate::config::AppConfig;
use crate::error::AppError;

/// An uploaded file pulled out of a multipart body.
pub struct FileUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Read the single `file` field from a multipart body, ignoring other
/// fields.
pub(crate) async fn read_file_field(mut multipart: Multipart) -> Result<FileUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
            return Ok(FileUpload {
                bytes: bytes.to_vec(),
                file_name,
            });
        }
    }
    Err(AppError::Validation("Missing 'file' field".into()))
}

/// Build the public URL for a stored media file.
pub(crate) fn public_media_url(config: &AppConfig, stored_name: &str) -> String {
    format!("{}/media/{}", config.media.public_base, stored_name)
}
