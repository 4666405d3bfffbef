use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Serve a stored media file.
///
/// Public (no token): media URLs are embedded in posts and profiles and
/// fetched directly by clients. Name validation lives in the store.
#[instrument(skip(state))]
pub async fn serve_media(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let content = state.media.open(&name).await?;

    let mime = mime_guess::from_path(&name).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(content))
        .map_err(|e| AppError::Internal(e.to_string()))
}
