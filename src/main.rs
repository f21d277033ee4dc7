use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use graze::commands;
use graze::config::{self, Config};
use graze::feed;
use graze::storage::Database;
use graze::util::parse_duration;

#[derive(Parser, Debug)]
#[command(
    name = "graze",
    version,
    about = "Personal RSS aggregator: follow feeds, collect posts on an interval, browse them later"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a user and make it the active one
    Register { name: String },
    /// Switch the active user
    Login { name: String },
    /// List registered users
    Users,
    /// Delete every user, feed, and post
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Register a new feed and follow it
    #[command(name = "addfeed")]
    AddFeed { name: String, url: String },
    /// List every registered feed
    Feeds,
    /// Follow an already-registered feed
    Follow { url: String },
    /// List the feeds the active user follows
    Following,
    /// Stop following a feed
    Unfollow { url: String },
    /// Show recent posts from followed feeds
    Browse {
        #[arg(default_value_t = 2)]
        limit: i64,
    },
    /// Run the collector loop (e.g. `graze agg 5m`)
    Agg {
        /// Time between collection cycles; one minute at minimum
        #[arg(value_parser = parse_duration)]
        interval: Duration,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("graze=info")),
        )
        .init();

    let cli = Cli::parse();

    let config_dir = config::config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("failed to create config directory")?;
    }
    let config_path = config_dir.join("config.toml");
    let mut config = Config::load(&config_path)?;

    let db_path: PathBuf = config.database_path(&config_dir);
    let db_path = db_path
        .to_str()
        .context("database path is not valid UTF-8")?;
    let db = Database::open(db_path)
        .await
        .context("failed to open database")?;

    let client = feed::build_client().context("failed to build HTTP client")?;

    match cli.command {
        Command::Register { name } => {
            commands::register(&db, &mut config, &config_path, &name).await
        }
        Command::Login { name } => commands::login(&db, &mut config, &config_path, &name).await,
        Command::Users => commands::users(&db, &config).await,
        Command::Reset { yes } => commands::reset(&db, yes).await,
        Command::AddFeed { name, url } => commands::add_feed(&db, &config, &name, &url).await,
        Command::Feeds => commands::list_feeds(&db).await,
        Command::Follow { url } => commands::follow(&db, &config, &url).await,
        Command::Following => commands::following(&db, &config).await,
        Command::Unfollow { url } => commands::unfollow(&db, &config, &url).await,
        Command::Browse { limit } => commands::browse(&db, &config, limit).await,
        Command::Agg { interval } => commands::aggregate(&db, &client, interval).await,
    }
}
