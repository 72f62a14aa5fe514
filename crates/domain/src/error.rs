use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("content must be between {min} and {max} characters (got {got})")]
    ContentLength { min: usize, max: usize, got: usize },
    #[error("author name must be between 1 and {max} characters")]
    AuthorName { max: usize },
    #[error("author email is not a valid address")]
    AuthorEmail,
}

impl ValidationError {
    /// 出错的字段名，用于给调用方返回字段级错误详情
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::ContentLength { .. } => "content",
            ValidationError::AuthorName { .. } => "author.name",
            ValidationError::AuthorEmail => "author.email",
        }
    }
}
