use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::{FolioError, UploadError};

/// Errors a handler can return. Every variant renders as
/// `{"success": false, "error": "..."}` with a matching status code.
#[derive(Debug)]
pub enum ApiError {
    Folio(FolioError),
    BadRequest(String),
    Unauthorized,
    NotFound(String),
}

impl From<FolioError> for ApiError {
    fn from(e: FolioError) -> Self {
        ApiError::Folio(e)
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        ApiError::Folio(FolioError::Upload(e))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Folio(e) => match e {
                FolioError::ArticleNotFound(_) => StatusCode::NOT_FOUND,
                FolioError::Validation(_) => StatusCode::BAD_REQUEST,
                FolioError::DuplicateSource { .. } => StatusCode::CONFLICT,
                FolioError::Upload(upload) => match upload {
                    UploadError::InvalidType(_)
                    | UploadError::TooLarge { .. }
                    | UploadError::InvalidName(_) => StatusCode::BAD_REQUEST,
                    UploadError::NotFound(_) => StatusCode::NOT_FOUND,
                    UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
                },
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Folio(e) => e.to_string(),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Unauthorized => "Unauthorized: invalid webhook token".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        } else {
            tracing::debug!(%status, error = %message, "request rejected");
        }

        let body = match &self {
            ApiError::Folio(FolioError::DuplicateSource { existing_id, .. }) => json!({
                "success": false,
                "error": message,
                "existingId": existing_id,
            }),
            _ => json!({ "success": false, "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_statuses() {
        let cases = vec![
            (FolioError::ArticleNotFound("1".into()), StatusCode::NOT_FOUND),
            (FolioError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                FolioError::DuplicateSource {
                    source_url: "u".into(),
                    existing_id: "1".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                FolioError::Upload(UploadError::TooLarge { size: 9, limit: 1 }),
                StatusCode::BAD_REQUEST,
            ),
            (FolioError::Store("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }
}
