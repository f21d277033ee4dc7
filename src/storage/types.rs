use sqlx::FromRow;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Storage-layer errors. Duplicate rows on unique columns are *not* errors;
/// they surface as the `Duplicate*` variants of the insert outcome enums
/// below, because the callers treat them as ordinary control flow.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Migration failed while opening the database
    #[error("database migration failed: {0}")]
    Migration(String),

    /// Any other database error
    #[error("database error: {0}")]
    Other(#[from] sqlx::Error),
}

/// True when `err` is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

// ============================================================================
// Rows
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub created_at: i64,
    pub name: String,
}

/// A followed syndication source. `last_fetched_at` is NULL until the first
/// collection cycle picks the feed up; NULL sorts as "most overdue".
#[derive(Debug, Clone, FromRow)]
pub struct Feed {
    pub id: i64,
    pub created_at: i64,
    pub name: String,
    pub url: String,
    pub user_id: i64,
    pub last_fetched_at: Option<i64>,
}

/// Feed joined with the name of the user who registered it, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct FeedWithOwner {
    pub name: String,
    pub url: String,
    pub owner: String,
}

/// One article discovered in a feed. The URL is unique across all posts and
/// is the only dedup key; title, description, and publish date are
/// best-effort and may be NULL.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub created_at: i64,
    pub feed_id: i64,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<i64>,
}

/// A candidate post, normalized but not yet persisted.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub feed_id: i64,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<i64>,
}

// ============================================================================
// Insert Outcomes
// ============================================================================

/// Outcome of an insert-if-absent on the posts table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostInsert {
    Inserted,
    /// A post with this URL is already stored; the item was seen before.
    Duplicate,
}

#[derive(Debug)]
pub enum UserInsert {
    Created(User),
    DuplicateName,
}

#[derive(Debug)]
pub enum FeedInsert {
    Created(Feed),
    DuplicateUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowInsert {
    Created,
    Duplicate,
}
