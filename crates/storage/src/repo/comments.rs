use crate::models::{SqlComment, SqlPendingComment};
use crate::{Db, StorageError};
use domain::{Comment, CommentThread, PendingComment};
use std::collections::HashMap;

impl Db {
    /// 写入新评论。评论的分数和初始状态由 domain 在构造时定死，
    /// 这里只负责落库，同时确保文章引用存在。
    pub async fn insert_comment(&self, c: &Comment) -> Result<(), StorageError> {
        let likes = serde_json::to_string(&c.likes)?;
        let reply_ids = serde_json::to_string(&c.reply_ids)?;

        let mut tx = self.pool.begin().await?;

        // 标题在提交时未知，留给 upsert_post 以后补
        sqlx::query("INSERT OR IGNORE INTO posts (slug, title) VALUES (?, NULL)")
            .bind(c.post_slug.as_str())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO comments (
                id, post_slug, parent_id,
                author_name, author_email, author_website, author_user_id,
                content, status,
                moderator_id, moderated_at, moderation_reason, spam_score,
                likes, reply_ids,
                mood, favorite_flower, ip_address, user_agent,
                is_edited, edited_at, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&c.id)
        .bind(c.post_slug.as_str())
        .bind(&c.parent_id)
        .bind(&c.author.name)
        .bind(&c.author.email)
        .bind(&c.author.website)
        .bind(&c.author.user_id)
        .bind(&c.content)
        .bind(c.status.as_str())
        .bind(&c.moderator_id)
        .bind(c.moderated_at)
        .bind(&c.moderation_reason)
        .bind(c.spam_score as i64)
        .bind(likes)
        .bind(reply_ids)
        .bind(&c.mood)
        .bind(&c.favorite_flower)
        .bind(&c.ip_address)
        .bind(&c.user_agent)
        .bind(c.is_edited)
        .bind(c.edited_at)
        .bind(c.created_at)
        .bind(c.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_comment(&self, comment_id: &str) -> Result<Comment, StorageError> {
        let row = sqlx::query_as::<_, SqlComment>("SELECT * FROM comments WHERE id = ?")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Into::into)
            .ok_or_else(|| StorageError::CommentNotFound(comment_id.to_string()))
    }

    pub async fn approve_comment(
        &self,
        comment_id: &str,
        moderator_id: &str,
        reason: Option<String>,
    ) -> Result<Comment, StorageError> {
        let mut c = self.get_comment(comment_id).await?;
        c.approve(moderator_id, reason);
        self.persist_moderation(&c).await?;
        Ok(c)
    }

    pub async fn reject_comment(
        &self,
        comment_id: &str,
        moderator_id: &str,
        reason: Option<String>,
    ) -> Result<Comment, StorageError> {
        let mut c = self.get_comment(comment_id).await?;
        c.reject(moderator_id, reason);
        self.persist_moderation(&c).await?;
        Ok(c)
    }

    pub async fn mark_comment_spam(
        &self,
        comment_id: &str,
        moderator_id: &str,
        reason: Option<String>,
    ) -> Result<Comment, StorageError> {
        let mut c = self.get_comment(comment_id).await?;
        c.mark_as_spam(moderator_id, reason);
        self.persist_moderation(&c).await?;
        Ok(c)
    }

    async fn persist_moderation(&self, c: &Comment) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            UPDATE comments
            SET status = ?, moderator_id = ?, moderated_at = ?,
                moderation_reason = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(c.status.as_str())
        .bind(&c.moderator_id)
        .bind(c.moderated_at)
        .bind(&c.moderation_reason)
        .bind(c.updated_at)
        .bind(&c.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// 读-改-写的点赞开关。并发下是 last-write-wins，没有乐观锁。
    pub async fn toggle_like(
        &self,
        comment_id: &str,
        user_id: &str,
    ) -> Result<(Comment, bool), StorageError> {
        let mut c = self.get_comment(comment_id).await?;
        let liked = c.toggle_like(user_id);

        sqlx::query("UPDATE comments SET likes = ?, updated_at = ? WHERE id = ?")
            .bind(serde_json::to_string(&c.likes)?)
            .bind(c.updated_at)
            .bind(&c.id)
            .execute(&self.pool)
            .await?;

        Ok((c, liked))
    }

    /// 把回复 ID 挂到父评论的反向引用集合上（幂等）
    pub async fn link_reply(&self, parent_id: &str, reply_id: &str) -> Result<(), StorageError> {
        let mut parent = self.get_comment(parent_id).await?;
        if !parent.add_reply(reply_id) {
            return Ok(());
        }

        sqlx::query("UPDATE comments SET reply_ids = ?, updated_at = ? WHERE id = ?")
            .bind(serde_json::to_string(&parent.reply_ids)?)
            .bind(parent.updated_at)
            .bind(&parent.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn update_comment_content(
        &self,
        comment_id: &str,
        new_content: String,
    ) -> Result<Comment, StorageError> {
        let mut c = self.get_comment(comment_id).await?;
        c.edit_content(new_content)?;

        sqlx::query(
            "UPDATE comments SET content = ?, is_edited = ?, edited_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&c.content)
        .bind(c.is_edited)
        .bind(c.edited_at)
        .bind(c.updated_at)
        .bind(&c.id)
        .execute(&self.pool)
        .await?;
        Ok(c)
    }

    /// 公开读取：某篇文章下已通过的顶层评论（新的在前），
    /// 每条只带上它自己已通过的回复（旧的在前）。
    /// 这是读取时的过滤，不是结构约束：未通过的回复仍然存在，只是不展示。
    pub async fn list_approved_for_post(
        &self,
        slug: &str,
    ) -> Result<Vec<CommentThread>, StorageError> {
        let top = sqlx::query_as::<_, SqlComment>(
            r#"
            SELECT * FROM comments
            WHERE post_slug = ? AND status = 'approved' AND parent_id IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(slug)
        .fetch_all(&self.pool)
        .await?;

        let replies = sqlx::query_as::<_, SqlComment>(
            r#"
            SELECT * FROM comments
            WHERE post_slug = ? AND status = 'approved' AND parent_id IS NOT NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(slug)
        .fetch_all(&self.pool)
        .await?;

        let mut by_parent: HashMap<String, Vec<Comment>> = HashMap::new();
        for row in replies {
            let reply: Comment = row.into();
            if let Some(parent_id) = reply.parent_id.clone() {
                by_parent.entry(parent_id).or_default().push(reply);
            }
        }

        Ok(top
            .into_iter()
            .map(|row| {
                let comment: Comment = row.into();
                let replies = by_parent.remove(&comment.id).unwrap_or_default();
                CommentThread { comment, replies }
            })
            .collect())
    }

    /// 审核队列：所有 pending 的评论，新的在前，带最小化文章引用
    pub async fn list_pending(&self) -> Result<Vec<PendingComment>, StorageError> {
        let rows = sqlx::query_as::<_, SqlPendingComment>(
            r#"
            SELECT c.*, p.title AS post_title
            FROM comments c
            LEFT JOIN posts p ON c.post_slug = p.slug
            WHERE c.status = 'pending'
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
