use chrono::NaiveDateTime;
use domain::{Comment, CommentAuthor, CommentStatus, PendingComment, PostSlug};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct SqlComment {
    pub id: String,
    pub post_slug: String,
    pub parent_id: Option<String>,
    pub author_name: String,
    pub author_email: String,
    pub author_website: Option<String>,
    pub author_user_id: Option<String>,
    pub content: String,
    pub status: String,
    pub moderator_id: Option<String>,
    pub moderated_at: Option<NaiveDateTime>,
    pub moderation_reason: Option<String>,
    pub spam_score: i64,
    // JSON 文本列
    pub likes: String,
    pub reply_ids: String,
    pub mood: Option<String>,
    pub favorite_flower: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_edited: bool,
    pub edited_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SqlComment> for Comment {
    fn from(sql: SqlComment) -> Self {
        Comment {
            id: sql.id,
            post_slug: PostSlug::new_unchecked(sql.post_slug),
            parent_id: sql.parent_id,
            reply_ids: serde_json::from_str(&sql.reply_ids).unwrap_or_default(),
            author: CommentAuthor {
                name: sql.author_name,
                email: sql.author_email,
                website: sql.author_website,
                user_id: sql.author_user_id,
            },
            content: sql.content,
            status: sql.status.parse().unwrap_or(CommentStatus::Pending),
            moderator_id: sql.moderator_id,
            moderated_at: sql.moderated_at,
            moderation_reason: sql.moderation_reason,
            spam_score: sql.spam_score.clamp(0, 100) as u8,
            likes: serde_json::from_str(&sql.likes).unwrap_or_default(),
            mood: sql.mood,
            favorite_flower: sql.favorite_flower,
            ip_address: sql.ip_address,
            user_agent: sql.user_agent,
            is_edited: sql.is_edited,
            edited_at: sql.edited_at,
            created_at: sql.created_at,
            updated_at: sql.updated_at,
        }
    }
}

/// 审核队列行：评论列 + LEFT JOIN 出来的文章标题
#[derive(FromRow)]
pub struct SqlPendingComment {
    #[sqlx(flatten)]
    pub comment: SqlComment,
    pub post_title: Option<String>,
}

impl From<SqlPendingComment> for PendingComment {
    fn from(sql: SqlPendingComment) -> Self {
        PendingComment {
            comment: sql.comment.into(),
            post_title: sql.post_title,
        }
    }
}
