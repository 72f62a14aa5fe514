//! 审核状态机与点赞/回复维护。
//!
//! 所有操作只修改内存中的 `Comment`，落库由 storage 层负责。
//! 持久化失败即视为“迁移未提交”，调用方应丢弃内存对象重新读取。

use crate::error::ValidationError;
use crate::models::{validate_content, Comment, CommentStatus, LikeEntry};
use chrono::Utc;

pub const DEFAULT_REJECT_REASON: &str = "Content violates community guidelines";
pub const DEFAULT_SPAM_REASON: &str = "Detected as spam";

impl Comment {
    /// 任意状态都可以直接批准；每次都覆盖审核人与时间戳。
    pub fn approve(&mut self, moderator_id: &str, reason: Option<String>) {
        self.transition(CommentStatus::Approved, moderator_id);
        if let Some(reason) = reason {
            self.moderation_reason = Some(reason);
        }
    }

    pub fn reject(&mut self, moderator_id: &str, reason: Option<String>) {
        self.transition(CommentStatus::Rejected, moderator_id);
        self.moderation_reason = Some(reason.unwrap_or_else(|| DEFAULT_REJECT_REASON.to_string()));
    }

    pub fn mark_as_spam(&mut self, moderator_id: &str, reason: Option<String>) {
        self.transition(CommentStatus::Spam, moderator_id);
        self.moderation_reason = Some(reason.unwrap_or_else(|| DEFAULT_SPAM_REASON.to_string()));
    }

    fn transition(&mut self, status: CommentStatus, moderator_id: &str) {
        let now = Utc::now().naive_utc();
        self.status = status;
        self.moderator_id = Some(moderator_id.to_string());
        self.moderated_at = Some(now);
        self.updated_at = now;
    }

    /// 幂等：重复添加同一个回复 ID 不产生变化。
    pub fn add_reply(&mut self, reply_id: &str) -> bool {
        if self.reply_ids.iter().any(|id| id == reply_id) {
            return false;
        }
        self.reply_ids.push(reply_id.to_string());
        self.updated_at = Utc::now().naive_utc();
        true
    }

    /// 严格开关：已点赞则取消，未点赞则追加。返回操作后是否处于点赞状态。
    pub fn toggle_like(&mut self, user_id: &str) -> bool {
        let now = Utc::now().naive_utc();
        let before = self.likes.len();
        self.likes.retain(|l| l.user_id != user_id);
        let liked = if self.likes.len() == before {
            self.likes.push(LikeEntry {
                user_id: user_id.to_string(),
                liked_at: now,
            });
            true
        } else {
            false
        };
        self.updated_at = now;
        liked
    }

    /// 创建之后的内容修改。不重新计算垃圾分。
    pub fn edit_content(&mut self, new_content: String) -> Result<(), ValidationError> {
        validate_content(&new_content)?;
        let now = Utc::now().naive_utc();
        self.content = new_content;
        self.is_edited = true;
        self.edited_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommentAuthor, CommentSubmission, PostSlug};

    fn comment() -> Comment {
        Comment::new(CommentSubmission {
            post_slug: PostSlug::new("garden-diary").unwrap(),
            author: CommentAuthor {
                name: "Iris".into(),
                email: "iris@example.org".into(),
                website: None,
                user_id: None,
            },
            content: "these peonies are stunning".into(),
            parent_id: None,
            mood: None,
            favorite_flower: None,
            ip_address: None,
            user_agent: None,
        })
        .unwrap()
    }

    #[test]
    fn approve_sets_moderation_fields() {
        let mut c = comment();
        c.approve("mod-1", None);
        assert_eq!(c.status, CommentStatus::Approved);
        assert_eq!(c.moderator_id.as_deref(), Some("mod-1"));
        assert!(c.moderated_at.is_some());
        // 没给理由就不写理由
        assert!(c.moderation_reason.is_none());
    }

    #[test]
    fn reject_defaults_reason() {
        let mut c = comment();
        c.reject("mod-1", None);
        assert_eq!(c.status, CommentStatus::Rejected);
        assert_eq!(
            c.moderation_reason.as_deref(),
            Some("Content violates community guidelines")
        );

        let mut c = comment();
        c.reject("mod-1", Some("off topic".into()));
        assert_eq!(c.moderation_reason.as_deref(), Some("off topic"));
    }

    #[test]
    fn mark_as_spam_defaults_reason() {
        let mut c = comment();
        c.mark_as_spam("mod-2", None);
        assert_eq!(c.status, CommentStatus::Spam);
        assert_eq!(c.moderation_reason.as_deref(), Some("Detected as spam"));
    }

    #[test]
    fn any_state_reaches_any_state() {
        let mut c = comment();
        c.mark_as_spam("mod-1", None);
        // spam 直接转 approved 必须成功，且覆盖审核人
        c.approve("mod-2", None);
        assert_eq!(c.status, CommentStatus::Approved);
        assert_eq!(c.moderator_id.as_deref(), Some("mod-2"));
        // 其它字段不被清掉
        assert_eq!(c.content, "these peonies are stunning");
        assert_eq!(c.moderation_reason.as_deref(), Some("Detected as spam"));
    }

    #[test]
    fn add_reply_is_idempotent() {
        let mut c = comment();
        assert!(c.add_reply("r1"));
        assert!(!c.add_reply("r1"));
        assert_eq!(c.reply_ids, vec!["r1".to_string()]);
        assert!(c.add_reply("r2"));
        assert_eq!(c.reply_ids.len(), 2);
    }

    #[test]
    fn toggle_like_is_self_inverse() {
        let mut c = comment();
        assert!(c.toggle_like("u1"));
        assert_eq!(c.likes.len(), 1);
        assert!(!c.toggle_like("u1"));
        assert!(c.likes.is_empty());

        assert!(c.toggle_like("u1"));
        assert!(c.toggle_like("u2"));
        assert!(!c.toggle_like("u1"));
        assert_eq!(c.likes.len(), 1);
        assert_eq!(c.likes[0].user_id, "u2");
    }

    #[test]
    fn edit_marks_edited_without_rescoring() {
        let mut c = comment();
        let original_score = c.spam_score;
        c.edit_content("updated remark about the tulip bed".into()).unwrap();
        assert!(c.is_edited);
        assert!(c.edited_at.is_some());
        assert_eq!(c.spam_score, original_score);

        assert!(c.edit_content("x".into()).is_err());
    }
}
