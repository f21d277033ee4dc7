//! The ingestion core: one cycle of pick-fetch-store work, and the
//! scheduler loop that drives it.
//!
//! Cycles are strictly sequential: one feed, one request, one item loop at
//! a time. The only concurrency device in play is the selection contract:
//! the most-overdue feed is picked and its timestamp bumped *before* any
//! network I/O, so a slow fetch can never cause the same feed to be picked
//! again on the next tick.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::feed::{fetch_feed, normalize_item, FetchError};
use crate::storage::{Database, NewPost, PostInsert, StoreError};

/// Floor for the collection interval. Anything shorter is a configuration
/// error, rejected before the first cycle runs.
pub const MIN_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("collection interval {0:?} is shorter than the one-minute floor")]
    IntervalTooShort(Duration),
}

/// A failed cycle. A fetch failure abandons the feed until it is the most
/// overdue again; a store failure abandons the remaining items of this
/// cycle. Neither stops the scheduler loop.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub enum CycleOutcome {
    /// No feeds are registered; nothing to do until the next tick.
    Idle,
    Completed(CycleSummary),
}

#[derive(Debug)]
pub struct CycleSummary {
    pub feed_name: String,
    pub items: usize,
    pub inserted: usize,
    pub duplicates: usize,
}

impl fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "collected {}: {} items, {} new, {} already seen",
            self.feed_name, self.items, self.inserted, self.duplicates
        )
    }
}

/// One feed's worth of work: select the most-overdue feed, bump its
/// timestamp, fetch and decode the document, then insert each item in
/// document order, skipping URLs that are already stored.
pub async fn run_one_cycle(
    db: &Database,
    client: &reqwest::Client,
) -> Result<CycleOutcome, CycleError> {
    let Some(feed) = db.next_due_feed().await? else {
        tracing::info!("no feeds registered, nothing to collect");
        return Ok(CycleOutcome::Idle);
    };

    tracing::debug!(feed = %feed.name, url = %feed.url, "collecting feed");

    // Bumped before the fetch: a hanging request must not leave this feed
    // the most overdue one on the next tick. The cost is that a failed
    // fetch waits a full rotation before being retried.
    db.mark_feed_fetched(feed.id, Utc::now().timestamp())
        .await?;

    let document = fetch_feed(client, &feed.url).await?;

    let mut inserted = 0usize;
    let mut duplicates = 0usize;
    let items = &document.channel.items;

    for item in items {
        let candidate = normalize_item(item);
        let post = NewPost {
            feed_id: feed.id,
            url: candidate.link,
            title: candidate.title,
            description: candidate.description,
            published_at: candidate.published_at.map(|dt| dt.timestamp()),
        };
        match db.insert_post(&post).await? {
            PostInsert::Inserted => inserted += 1,
            PostInsert::Duplicate => {
                tracing::debug!(url = %post.url, "post already stored, skipping");
                duplicates += 1;
            }
        }
    }

    let summary = CycleSummary {
        feed_name: feed.name,
        items: items.len(),
        inserted,
        duplicates,
    };
    tracing::info!(
        feed = %summary.feed_name,
        items = summary.items,
        new = summary.inserted,
        duplicates = summary.duplicates,
        "cycle finished"
    );
    Ok(CycleOutcome::Completed(summary))
}

/// Drive cycles on a fixed interval until `shutdown` yields a message or its
/// sender is dropped, whichever comes first.
///
/// Per-cycle errors are logged and swallowed; only the interval floor check
/// can make this return an error, and it does so before the first cycle.
/// The first cycle runs immediately, then one per tick.
pub async fn run_forever(
    db: &Database,
    client: &reqwest::Client,
    interval: Duration,
    mut shutdown: mpsc::Receiver<()>,
) -> Result<(), SchedulerError> {
    if interval < MIN_INTERVAL {
        return Err(SchedulerError::IntervalTooShort(interval));
    }

    tracing::info!(interval = ?interval, "collecting feeds");

    // A tick that lands while a cycle is still running is delivered as soon
    // as the cycle finishes and the schedule re-anchors from there; overdue
    // ticks are coalesced, never bursted.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("collector stopped");
                return Ok(());
            }
            _ = ticker.tick() => {
                match run_one_cycle(db, client).await {
                    Ok(CycleOutcome::Idle) => {}
                    Ok(CycleOutcome::Completed(summary)) => {
                        tracing::info!(summary = %summary, "tick complete");
                    }
                    Err(e) => tracing::error!(error = %e, "cycle failed"),
                }
            }
        }
    }
}
