use anyhow::{bail, Result};

use super::require_user;
use crate::config::Config;
use crate::storage::{Database, FeedInsert, FollowInsert};
use crate::util::validate_feed_url;

/// Register a new feed under the active user and follow it. The URL is
/// validated but stored exactly as given, since it is the feed's identity.
pub async fn add_feed(db: &Database, config: &Config, name: &str, url: &str) -> Result<()> {
    let user = require_user(db, config).await?;
    validate_feed_url(url)?;

    match db.create_feed(name, url, user.id).await? {
        FeedInsert::Created(feed) => {
            db.create_follow(user.id, feed.id).await?;
            println!("feed {} registered; {} now follows it", feed.name, user.name);
            Ok(())
        }
        FeedInsert::DuplicateUrl => {
            bail!("a feed with this URL already exists; `graze follow {url}` to follow it")
        }
    }
}

pub async fn list_feeds(db: &Database) -> Result<()> {
    let feeds = db.list_feeds_with_owners().await?;
    if feeds.is_empty() {
        println!("no feeds registered yet");
        return Ok(());
    }
    for feed in feeds {
        println!("{}  {}  (added by {})", feed.name, feed.url, feed.owner);
    }
    Ok(())
}

pub async fn follow(db: &Database, config: &Config, url: &str) -> Result<()> {
    let user = require_user(db, config).await?;

    let Some(feed) = db.get_feed_by_url(url).await? else {
        bail!("no feed registered with this URL; `graze addfeed <name> {url}` to add it");
    };

    match db.create_follow(user.id, feed.id).await? {
        FollowInsert::Created => {
            println!("{} now follows {}", user.name, feed.name);
            Ok(())
        }
        FollowInsert::Duplicate => bail!("you already follow {}", feed.name),
    }
}

pub async fn following(db: &Database, config: &Config) -> Result<()> {
    let user = require_user(db, config).await?;
    let feeds = db.feeds_followed_by(user.id).await?;
    if feeds.is_empty() {
        println!("{} does not follow any feeds yet", user.name);
        return Ok(());
    }
    for feed in feeds {
        println!("{}  {}", feed.name, feed.url);
    }
    Ok(())
}

pub async fn unfollow(db: &Database, config: &Config, url: &str) -> Result<()> {
    let user = require_user(db, config).await?;
    let removed = db.delete_follow_by_url(user.id, url).await?;
    if removed == 0 {
        println!("you were not following {url}");
    } else {
        println!("unfollowed {url}");
    }
    Ok(())
}
