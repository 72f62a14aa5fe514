use crate::error::ValidationError;
use crate::spam;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CONTENT_MIN_CHARS: usize = 3;
pub const CONTENT_MAX_CHARS: usize = 1000;
pub const AUTHOR_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostSlug(String);

impl PostSlug {
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.contains('_') {
            return Err("Post slug cannot contain underscores ('_'). Please use hyphens ('-') instead.".to_string());
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
        {
            return Err("Post slug contains invalid characters.".to_string());
        }
        if s.is_empty() || s.len() > 64 {
            return Err("Post slug must be 1-64 characters.".to_string());
        }
        Ok(Self(s))
    }

    pub fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Pending,
    Approved,
    Rejected,
    Spam,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Rejected => "rejected",
            CommentStatus::Spam => "spam",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CommentStatus::Pending),
            "approved" => Ok(CommentStatus::Approved),
            "rejected" => Ok(CommentStatus::Rejected),
            "spam" => Ok(CommentStatus::Spam),
            other => Err(format!("unknown comment status: {}", other)),
        }
    }
}

/// 提交时捕获的作者信息，不要求对应注册账号
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub name: String,
    pub email: String,
    pub website: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeEntry {
    pub user_id: String,
    pub liked_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_slug: PostSlug,
    pub parent_id: Option<String>,
    /// 子回复 ID 的反向引用集合（引用，不是所有权）
    pub reply_ids: Vec<String>,
    pub author: CommentAuthor,
    pub content: String,
    pub status: CommentStatus,
    pub moderator_id: Option<String>,
    pub moderated_at: Option<NaiveDateTime>,
    pub moderation_reason: Option<String>,
    pub spam_score: u8,
    pub likes: Vec<LikeEntry>,
    pub mood: Option<String>,
    pub favorite_flower: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_edited: bool,
    pub edited_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// 读侧视图：一条顶层评论加上它已通过审核的回复
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// 审核队列条目，附带最小化的文章引用（slug 在评论里，标题可能未知）
#[derive(Debug, Clone, Serialize)]
pub struct PendingComment {
    pub comment: Comment,
    pub post_title: Option<String>,
}

/// 校验通过之前的原始提交
#[derive(Debug, Clone)]
pub struct CommentSubmission {
    pub post_slug: PostSlug,
    pub author: CommentAuthor,
    pub content: String,
    pub parent_id: Option<String>,
    pub mood: Option<String>,
    pub favorite_flower: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Comment {
    /// 校验提交并构造评论。垃圾分与初始状态只在这里计算一次，
    /// 之后的编辑不会触发重算。
    pub fn new(submission: CommentSubmission) -> Result<Self, ValidationError> {
        validate_content(&submission.content)?;
        validate_author(&submission.author)?;

        let spam_score = spam::score(&submission.content);
        let status = spam::initial_status(spam_score);
        let now = Utc::now().naive_utc();

        Ok(Comment {
            id: format!("{:x}", rand::random::<u128>()),
            post_slug: submission.post_slug,
            parent_id: submission.parent_id,
            reply_ids: Vec::new(),
            author: submission.author,
            content: submission.content,
            status,
            moderator_id: None,
            moderated_at: None,
            moderation_reason: None,
            spam_score,
            likes: Vec::new(),
            mood: submission.mood,
            favorite_flower: submission.favorite_flower,
            ip_address: submission.ip_address,
            user_agent: submission.user_agent,
            is_edited: false,
            edited_at: None,
            created_at: now,
            updated_at: now,
        })
    }
}

pub(crate) fn validate_content(content: &str) -> Result<(), ValidationError> {
    let got = content.chars().count();
    if !(CONTENT_MIN_CHARS..=CONTENT_MAX_CHARS).contains(&got) {
        return Err(ValidationError::ContentLength {
            min: CONTENT_MIN_CHARS,
            max: CONTENT_MAX_CHARS,
            got,
        });
    }
    Ok(())
}

fn validate_author(author: &CommentAuthor) -> Result<(), ValidationError> {
    let name_len = author.name.trim().chars().count();
    if name_len == 0 || name_len > AUTHOR_NAME_MAX_CHARS {
        return Err(ValidationError::AuthorName {
            max: AUTHOR_NAME_MAX_CHARS,
        });
    }

    // 简单格式检查：local@domain 且域名带点，足够挡住明显的垃圾输入
    let mut parts = author.email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.len() < 3 || !domain.contains('.') || domain.contains('@') {
        return Err(ValidationError::AuthorEmail);
    }
    Ok(())
}
