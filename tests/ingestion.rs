//! End-to-end ingestion tests: a mock feed server, an in-memory store, and
//! the collection cycle driving them.
//!
//! Each test creates its own in-memory SQLite database for isolation.

use graze::feed::build_client;
use graze::poller::{run_one_cycle, CycleError, CycleOutcome, CycleSummary};
use graze::storage::{Database, Feed, FeedInsert, NewPost, PostInsert, User, UserInsert};
use pretty_assertions::assert_eq;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const TWO_ITEM_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Example</title>
  <link>https://example.com</link>
  <description>Example feed</description>
  <item>
    <title>First &amp; foremost</title>
    <link>https://example.com/posts/1</link>
    <description>Opening post</description>
    <pubDate>Wed, 15 Jan 2025 10:30:00 GMT</pubDate>
  </item>
  <item>
    <title>Second</title>
    <link>https://example.com/posts/2</link>
    <description>Another post</description>
    <pubDate>not-a-date</pubDate>
  </item>
</channel></rss>"#;

async fn test_db() -> Database {
    Database::open(":memory:").await.unwrap()
}

async fn create_user(db: &Database, name: &str) -> User {
    match db.create_user(name).await.unwrap() {
        UserInsert::Created(user) => user,
        other => panic!("expected user to be created, got {:?}", other),
    }
}

async fn create_feed(db: &Database, name: &str, url: &str, user_id: i64) -> Feed {
    match db.create_feed(name, url, user_id).await.unwrap() {
        FeedInsert::Created(feed) => feed,
        other => panic!("expected feed to be created, got {:?}", other),
    }
}

/// One user following one feed pointed at `url`.
async fn setup_followed_feed(url: &str) -> (Database, User, Feed) {
    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let feed = create_feed(&db, "Example", url, user.id).await;
    db.create_follow(user.id, feed.id).await.unwrap();
    (db, user, feed)
}

fn completed(outcome: CycleOutcome) -> CycleSummary {
    match outcome {
        CycleOutcome::Completed(summary) => summary,
        CycleOutcome::Idle => panic!("expected a completed cycle, got Idle"),
    }
}

// ============================================================================
// Cycle Behavior
// ============================================================================

#[tokio::test]
async fn cycle_inserts_new_posts_and_skips_known_urls() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_ITEM_RSS))
        .mount(&mock_server)
        .await;

    let (db, _user, feed) = setup_followed_feed(&format!("{}/feed", mock_server.uri())).await;

    // The first item's URL is already stored from an earlier run
    let existing = NewPost {
        feed_id: feed.id,
        url: "https://example.com/posts/1".to_string(),
        title: Some("First & foremost".to_string()),
        description: None,
        published_at: None,
    };
    assert_eq!(db.insert_post(&existing).await.unwrap(), PostInsert::Inserted);

    let summary = completed(run_one_cycle(&db, &build_client().unwrap()).await.unwrap());
    assert_eq!(summary.feed_name, "Example");
    assert_eq!(summary.items, 2);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.duplicates, 1);
}

#[tokio::test]
async fn reingesting_the_same_document_adds_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_ITEM_RSS))
        .mount(&mock_server)
        .await;

    let (db, _user, _feed) = setup_followed_feed(&format!("{}/feed", mock_server.uri())).await;
    let client = build_client().unwrap();

    let first = completed(run_one_cycle(&db, &client).await.unwrap());
    assert_eq!(first.inserted, 2);
    assert_eq!(first.duplicates, 0);

    // The only feed is immediately the most overdue one again
    let second = completed(run_one_cycle(&db, &client).await.unwrap());
    assert_eq!(second.inserted, 0);
    assert_eq!(second.duplicates, 2);
}

#[tokio::test]
async fn stored_posts_are_normalized() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_ITEM_RSS))
        .mount(&mock_server)
        .await;

    let (db, user, _feed) = setup_followed_feed(&format!("{}/feed", mock_server.uri())).await;
    run_one_cycle(&db, &build_client().unwrap()).await.unwrap();

    let posts = db.posts_for_user(user.id, 10).await.unwrap();
    assert_eq!(posts.len(), 2);

    // Dated post sorts first; its title has the entity decoded
    let dated = &posts[0];
    assert_eq!(dated.title.as_deref(), Some("First & foremost"));
    assert_eq!(dated.url, "https://example.com/posts/1");
    // Wed, 15 Jan 2025 10:30:00 GMT
    assert_eq!(dated.published_at, Some(1736937000));

    // The unparsable pubDate degraded to null without dropping the item
    let undated = &posts[1];
    assert_eq!(undated.title.as_deref(), Some("Second"));
    assert_eq!(undated.published_at, None);
}

#[tokio::test]
async fn empty_store_is_an_idle_cycle() {
    let db = test_db().await;
    let outcome = run_one_cycle(&db, &build_client().unwrap()).await.unwrap();
    assert!(matches!(outcome, CycleOutcome::Idle));
}

// ============================================================================
// Fetch Failures
// ============================================================================

#[tokio::test]
async fn fetch_failure_is_reported_but_timestamp_stays_bumped() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let url = format!("{}/feed", mock_server.uri());
    let (db, _user, _feed) = setup_followed_feed(&url).await;

    let err = run_one_cycle(&db, &build_client().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, CycleError::Fetch(_)));

    // Bumped before the fetch, so the failure does not reset it
    let feed = db.get_feed_by_url(&url).await.unwrap().unwrap();
    assert!(feed.last_fetched_at.is_some());
}

#[tokio::test]
async fn failed_feed_waits_its_turn_behind_other_feeds() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let broken = create_feed(&db, "Broken", &format!("{}/feed", mock_server.uri()), user.id).await;
    let waiting = create_feed(&db, "Waiting", "https://example.org/other", user.id).await;

    // Lower id, both never fetched: the broken feed goes first and fails
    let err = run_one_cycle(&db, &build_client().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, CycleError::Fetch(_)));

    // The next pick is the other feed, not an immediate retry
    let next = db.next_due_feed().await.unwrap().unwrap();
    assert_eq!(next.id, waiting.id);
    assert_ne!(next.id, broken.id);
}

#[tokio::test]
async fn malformed_document_is_a_fetch_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a feed</html>"))
        .mount(&mock_server)
        .await;

    let (db, _user, _feed) = setup_followed_feed(&format!("{}/feed", mock_server.uri())).await;
    let err = run_one_cycle(&db, &build_client().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, CycleError::Fetch(_)));
}

// ============================================================================
// Most-Overdue Selection
// ============================================================================

#[tokio::test]
async fn never_fetched_feeds_are_most_overdue() {
    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let a = create_feed(&db, "A", "https://a.example/feed", user.id).await;
    let b = create_feed(&db, "B", "https://b.example/feed", user.id).await;
    let c = create_feed(&db, "C", "https://c.example/feed", user.id).await;

    db.mark_feed_fetched(b.id, 100).await.unwrap();
    db.mark_feed_fetched(c.id, 200).await.unwrap();

    // NULL beats any timestamp
    assert_eq!(db.next_due_feed().await.unwrap().unwrap().id, a.id);

    // Once fetched, the oldest timestamp wins
    db.mark_feed_fetched(a.id, 300).await.unwrap();
    assert_eq!(db.next_due_feed().await.unwrap().unwrap().id, b.id);

    db.mark_feed_fetched(b.id, 400).await.unwrap();
    assert_eq!(db.next_due_feed().await.unwrap().unwrap().id, c.id);
}

#[tokio::test]
async fn ties_break_by_feed_id() {
    let db = test_db().await;
    let user = create_user(&db, "ana").await;
    let first = create_feed(&db, "First", "https://1.example/feed", user.id).await;
    let second = create_feed(&db, "Second", "https://2.example/feed", user.id).await;

    // Both never fetched
    assert_eq!(db.next_due_feed().await.unwrap().unwrap().id, first.id);

    // Both fetched at the same instant
    db.mark_feed_fetched(first.id, 500).await.unwrap();
    db.mark_feed_fetched(second.id, 500).await.unwrap();
    assert_eq!(db.next_due_feed().await.unwrap().unwrap().id, first.id);
}
