use chrono::Utc;

use super::schema::Database;
use super::types::{is_unique_violation, Feed, FeedInsert, FeedWithOwner, StoreError};

const FEED_COLUMNS: &str = "id, created_at, name, url, user_id, last_fetched_at";

impl Database {
    // ========================================================================
    // Feed Operations
    // ========================================================================

    /// Register a feed. The URL is globally unique; a second registration of
    /// the same URL reports `DuplicateUrl` instead of failing.
    pub async fn create_feed(
        &self,
        name: &str,
        url: &str,
        user_id: i64,
    ) -> Result<FeedInsert, StoreError> {
        let now = Utc::now().timestamp();
        let result = sqlx::query_as::<_, Feed>(&format!(
            "INSERT INTO feeds (created_at, name, url, user_id) VALUES (?, ?, ?, ?) \
             RETURNING {FEED_COLUMNS}"
        ))
        .bind(now)
        .bind(name)
        .bind(url)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(feed) => Ok(FeedInsert::Created(feed)),
            Err(e) if is_unique_violation(&e) => Ok(FeedInsert::DuplicateUrl),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_feed_by_url(&self, url: &str) -> Result<Option<Feed>, StoreError> {
        Ok(
            sqlx::query_as::<_, Feed>(&format!("SELECT {FEED_COLUMNS} FROM feeds WHERE url = ?"))
                .bind(url)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// All feeds with the name of the user who registered each one.
    pub async fn list_feeds_with_owners(&self) -> Result<Vec<FeedWithOwner>, StoreError> {
        Ok(sqlx::query_as::<_, FeedWithOwner>(
            r#"
            SELECT f.name AS name, f.url AS url, u.name AS owner
            FROM feeds f
            JOIN users u ON u.id = f.user_id
            ORDER BY f.name
        "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    // ========================================================================
    // Collection Scheduling
    // ========================================================================

    /// The single most-overdue feed: never-fetched feeds first (NULL sorts
    /// before any timestamp), then oldest fetch first, ties broken by id so
    /// selection is deterministic. `None` means no feeds are registered.
    pub async fn next_due_feed(&self) -> Result<Option<Feed>, StoreError> {
        Ok(sqlx::query_as::<_, Feed>(&format!(
            "SELECT {FEED_COLUMNS} FROM feeds \
             ORDER BY last_fetched_at ASC NULLS FIRST, id ASC \
             LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Record that a feed was picked for collection. The caller bumps this
    /// *before* fetching, so a hanging fetch cannot starve the other feeds.
    pub async fn mark_feed_fetched(
        &self,
        feed_id: i64,
        fetched_at: i64,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE feeds SET last_fetched_at = ? WHERE id = ?")
            .bind(fetched_at)
            .bind(feed_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
