pub mod admin;
pub mod challenge;
pub mod comments;

use axum::http::StatusCode;
use storage::StorageError;

/// 引擎的错误原样向上传递，这里统一翻译成 HTTP 响应
pub(crate) fn map_storage_error(err: StorageError) -> (StatusCode, String) {
    match err {
        StorageError::CommentNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        StorageError::Validation(ref e) => {
            (StatusCode::BAD_REQUEST, format!("{}: {}", e.field(), e))
        }
        StorageError::Database(_) | StorageError::Encoding(_) => {
            tracing::error!("storage failure: {:?}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Storage failure".to_string())
        }
    }
}
