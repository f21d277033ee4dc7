use anyhow::Result;
use chrono::DateTime;

use super::require_user;
use crate::config::Config;
use crate::storage::Database;

/// Print the most recent posts across the active user's followed feeds.
/// Store failures propagate; an empty listing always means "no posts",
/// never a swallowed error.
pub async fn browse(db: &Database, config: &Config, limit: i64) -> Result<()> {
    let user = require_user(db, config).await?;
    let posts = db.posts_for_user(user.id, limit).await?;

    if posts.is_empty() {
        println!("no posts yet; run `graze agg <interval>` to start collecting");
        return Ok(());
    }

    for post in posts {
        println!("{}", post.title.as_deref().unwrap_or("(untitled)"));
        if let Some(dt) = post.published_at.and_then(|ts| DateTime::from_timestamp(ts, 0)) {
            println!("  published {}", dt.format("%Y-%m-%d %H:%M UTC"));
        }
        println!("  {}", post.url);
        if let Some(description) = &post.description {
            println!("  {description}");
        }
        println!();
    }
    Ok(())
}
