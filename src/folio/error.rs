use thiserror::Error;

/// Failures raised by the upload service.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Only image uploads are allowed (got {0})")]
    InvalidType(String),

    #[error("Upload exceeds the {limit} byte limit ({size} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("Invalid upload filename: {0}")]
    InvalidName(String),

    #[error("Upload not found: {0}")]
    NotFound(String),

    #[error("Upload IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("An article with source {source_url} already exists ({existing_id})")]
    DuplicateSource {
        source_url: String,
        existing_id: String,
    },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Remote source error: {0}")]
    Remote(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;
