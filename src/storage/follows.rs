use chrono::Utc;

use super::schema::Database;
use super::types::{is_unique_violation, Feed, FollowInsert, StoreError};

impl Database {
    // ========================================================================
    // Follow Operations
    // ========================================================================

    /// Follow a feed. Following the same feed twice reports `Duplicate`.
    pub async fn create_follow(
        &self,
        user_id: i64,
        feed_id: i64,
    ) -> Result<FollowInsert, StoreError> {
        let now = Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO feed_follows (created_at, user_id, feed_id) VALUES (?, ?, ?)",
        )
        .bind(now)
        .bind(user_id)
        .bind(feed_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(FollowInsert::Created),
            Err(e) if is_unique_violation(&e) => Ok(FollowInsert::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    /// Feeds the user follows, in follow order.
    pub async fn feeds_followed_by(&self, user_id: i64) -> Result<Vec<Feed>, StoreError> {
        Ok(sqlx::query_as::<_, Feed>(
            r#"
            SELECT f.id, f.created_at, f.name, f.url, f.user_id, f.last_fetched_at
            FROM feeds f
            JOIN feed_follows ff ON ff.feed_id = f.id
            WHERE ff.user_id = ?
            ORDER BY ff.id
        "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Drop the user's follow of the feed at `url`. Returns the number of
    /// follows removed; zero means they were not following it.
    pub async fn delete_follow_by_url(
        &self,
        user_id: i64,
        url: &str,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM feed_follows
            WHERE user_id = ?
              AND feed_id IN (SELECT id FROM feeds WHERE url = ?)
        "#,
        )
        .bind(user_id)
        .bind(url)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
