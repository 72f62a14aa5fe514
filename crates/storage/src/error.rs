use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("comment not found: {0}")]
    CommentNotFound(String),
    #[error(transparent)]
    Validation(#[from] domain::ValidationError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("failed to encode engagement data: {0}")]
    Encoding(#[from] serde_json::Error),
}
