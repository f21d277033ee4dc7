//! The command shell: thin handlers over the stores, the config, and the
//! poller. Errors here are user-facing `anyhow` messages; typed errors live
//! in the library layers underneath.

mod agg;
mod feeds;
mod posts;
mod users;

pub use agg::aggregate;
pub use feeds::{add_feed, follow, following, list_feeds, unfollow};
pub use posts::browse;
pub use users::{login, register, reset, users};

use anyhow::{bail, Result};

use crate::config::Config;
use crate::storage::{Database, User};

/// Resolve the active user for handlers that need a login.
pub(crate) async fn require_user(db: &Database, config: &Config) -> Result<User> {
    let Some(name) = config.current_user.as_deref() else {
        bail!("no active user; run `graze register <name>` or `graze login <name>` first");
    };
    match db.get_user_by_name(name).await? {
        Some(user) => Ok(user),
        None => bail!("active user {name:?} is not in the database; run `graze register {name}`"),
    }
}
