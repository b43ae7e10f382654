//! Image upload endpoints.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Serialize;

use crate::server::{ApiError, ApiResult, AppState};
use crate::store::DataStore;
use crate::upload::StoredUpload;

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "image";

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(flatten)]
    pub upload: StoredUpload,
    pub message: String,
}

#[derive(Serialize)]
pub struct RemoveResponse {
    pub success: bool,
    pub message: String,
}

/// Streams the `image` field to disk chunk by chunk. Other fields are ignored.
pub async fn create<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(format!("invalid multipart payload: {err}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let mut pending = {
            let api = state.api.lock().await;
            api.begin_upload(&original_name, &content_type)?
        };

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|err| ApiError::BadRequest(format!("upload interrupted: {err}")))?
        {
            pending.write_chunk(&chunk)?;
        }

        let upload = pending.finish()?;
        return Ok(Json(UploadResponse {
            success: true,
            message: format!("Uploaded {}", upload.filename),
            upload,
        }));
    }

    Err(ApiError::BadRequest(format!(
        "No file in multipart field \"{}\"",
        UPLOAD_FIELD
    )))
}

pub async fn remove<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(filename): Path<String>,
) -> ApiResult<Json<RemoveResponse>> {
    let api = state.api.lock().await;
    api.remove_upload(&filename)?;
    Ok(Json(RemoveResponse {
        success: true,
        message: format!("Deleted {}", filename),
    }))
}
