use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::poller;
use crate::storage::Database;

/// Run the collector loop until Ctrl-C. The interval floor is enforced by
/// the scheduler itself, before the first cycle runs.
pub async fn aggregate(db: &Database, client: &reqwest::Client, interval: Duration) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(()).await;
        }
    });

    poller::run_forever(db, client, interval, shutdown_rx).await?;
    Ok(())
}
