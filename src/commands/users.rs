use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::Config;
use crate::storage::{Database, UserInsert};

pub async fn register(
    db: &Database,
    config: &mut Config,
    config_path: &Path,
    name: &str,
) -> Result<()> {
    match db.create_user(name).await? {
        UserInsert::Created(user) => {
            config.set_user(&user.name, config_path)?;
            println!("user {} created and set as the active user", user.name);
            Ok(())
        }
        UserInsert::DuplicateName => {
            bail!("user {name} already exists; use `graze login {name}`")
        }
    }
}

pub async fn login(
    db: &Database,
    config: &mut Config,
    config_path: &Path,
    name: &str,
) -> Result<()> {
    match db.get_user_by_name(name).await? {
        Some(user) => {
            config.set_user(&user.name, config_path)?;
            println!("active user set to {}", user.name);
            Ok(())
        }
        None => bail!("user {name} is not registered yet"),
    }
}

pub async fn users(db: &Database, config: &Config) -> Result<()> {
    let names = db.list_user_names().await?;
    if names.is_empty() {
        println!("no users registered yet");
        return Ok(());
    }
    for name in names {
        if config.current_user.as_deref() == Some(name.as_str()) {
            println!("{name} (current)");
        } else {
            println!("{name}");
        }
    }
    Ok(())
}

/// Wipe every user; feeds, follows, and posts cascade away. Interactive
/// unless `--yes` was passed.
pub async fn reset(db: &Database, assume_yes: bool) -> Result<()> {
    if !assume_yes && !confirm("this deletes every user, feed, and post; continue (y/n)?")? {
        println!("nothing deleted");
        return Ok(());
    }
    let removed = db.delete_all_users().await?;
    println!("{removed} users deleted");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}
