mod error;
mod models;
pub mod moderation;
pub mod spam;

pub use error::ValidationError;
pub use models::{
    Comment, CommentAuthor, CommentStatus, CommentSubmission, CommentThread, LikeEntry,
    PendingComment, PostSlug,
};
