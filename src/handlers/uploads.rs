//! Event image uploads.
//!
//! The size/type check mirrors the client-side policy; there is no
//! re-validation of the stored object after the upload succeeds.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::db::Store;
use crate::error::ApiError;
use crate::models::UploadResponse;
use crate::storage::StorageClient;
use crate::AppState;

const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;
const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];
const STORAGE_PREFIX: &str = "event-images";

pub struct ImageUpload {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

fn validate_image(size: usize, content_type: &str) -> Result<(), ApiError> {
    if size > MAX_IMAGE_BYTES {
        return Err(ApiError::Validation("File too large (2MB max)".to_string()));
    }
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(ApiError::Validation("Invalid file type".to_string()));
    }
    Ok(())
}

/// Storage object name: upload timestamp plus the display name with each
/// whitespace run collapsed to a single underscore.
fn object_name(name: &str, millis: i64) -> String {
    let mut cleaned = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                cleaned.push('_');
                in_whitespace = true;
            }
        } else {
            cleaned.push(c);
            in_whitespace = false;
        }
    }

    format!("{}-{}", millis, cleaned)
}

/// Validate and upload one event image, returning its public URL.
/// No file at all is not an error; the caller just gets nothing back.
pub async fn upload_event_image(
    storage: &StorageClient,
    file: Option<ImageUpload>,
) -> Result<Option<String>, ApiError> {
    let Some(file) = file else {
        return Ok(None);
    };

    validate_image(file.data.len(), &file.content_type)?;

    let key = format!(
        "{}/{}",
        STORAGE_PREFIX,
        object_name(&file.name, Utc::now().timestamp_millis())
    );
    let url = storage.upload(&key, &file.content_type, file.data).await?;

    Ok(Some(url))
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart payload".to_string()))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("image").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::Validation("Could not read uploaded file".to_string()))?;

            file = Some(ImageUpload {
                name,
                content_type,
                data,
            });
        }
    }

    let url = upload_event_image(&state.storage, file).await?;

    if let Some(url) = &url {
        let _ = state
            .store
            .record_event(
                "event_image_uploaded",
                "event_image",
                None,
                Some(serde_json::json!({ "url": url })),
            )
            .await;
    }

    Ok(Json(UploadResponse { url }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_file() {
        let err = validate_image(3 * 1024 * 1024, "image/png");
        assert!(matches!(err, Err(ApiError::Validation(_))));
    }

    #[test]
    fn rejects_disallowed_content_type() {
        let err = validate_image(1024, "application/pdf");
        assert!(matches!(err, Err(ApiError::Validation(_))));
    }

    #[test]
    fn accepts_png_within_limit() {
        assert!(validate_image(1024 * 1024, "image/png").is_ok());
    }

    #[test]
    fn object_name_collapses_whitespace_runs() {
        assert_eq!(object_name("soiree  poker.png", 1700000000000), "1700000000000-soiree_poker.png");
        assert_eq!(object_name(" table 1.jpg", 42), "42-_table_1.jpg");
    }
}
