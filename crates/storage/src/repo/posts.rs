use crate::{Db, StorageError};

impl Db {
    /// 博客同步文章标题，让审核队列有上下文可看
    pub async fn upsert_post(&self, slug: &str, title: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO posts (slug, title) VALUES (?, ?)
            ON CONFLICT(slug) DO UPDATE SET title = excluded.title
            "#,
        )
        .bind(slug)
        .bind(title)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
