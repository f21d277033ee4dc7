use chrono::Utc;

use super::schema::Database;
use super::types::{is_unique_violation, NewPost, Post, PostInsert, StoreError};

impl Database {
    // ========================================================================
    // Post Operations
    // ========================================================================

    /// Insert-if-absent on the post URL. A uniqueness violation is the
    /// expected signal that this item was already ingested on an earlier
    /// cycle; anything else is a real store failure.
    pub async fn insert_post(&self, post: &NewPost) -> Result<PostInsert, StoreError> {
        let now = Utc::now().timestamp();
        let result = sqlx::query(
            r#"
            INSERT INTO posts (created_at, feed_id, url, title, description, published_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#,
        )
        .bind(now)
        .bind(post.feed_id)
        .bind(&post.url)
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.published_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(PostInsert::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(PostInsert::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    /// The most recent posts across the feeds a user follows, newest
    /// published first; posts with no publish date sort last, then by
    /// discovery time.
    pub async fn posts_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<Post>, StoreError> {
        Ok(sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.created_at, p.feed_id, p.url, p.title, p.description, p.published_at
            FROM posts p
            JOIN feed_follows ff ON ff.feed_id = p.feed_id
            WHERE ff.user_id = ?
            ORDER BY p.published_at DESC, p.created_at DESC
            LIMIT ?
        "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}
