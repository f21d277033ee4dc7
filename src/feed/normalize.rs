//! Item normalization: raw wire items become candidate posts.
//!
//! Titles and descriptions arrive with HTML entities baked in, and publish
//! dates arrive in whatever layout the feed author chose. Both are cleaned
//! up here; neither failure mode is ever fatal for the item.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::parser::RawItem;

/// A normalized item, ready for the post store.
///
/// The link is copied verbatim from the wire; it is the dedup key and must
/// never be rewritten.
#[derive(Debug, Clone)]
pub struct CandidatePost {
    pub title: Option<String>,
    pub link: String,
    pub description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

pub fn normalize_item(item: &RawItem) -> CandidatePost {
    let published_at = parse_pub_date(&item.pub_date);
    if published_at.is_none() && !item.pub_date.trim().is_empty() {
        tracing::warn!(
            pub_date = %item.pub_date,
            link = %item.link,
            "unrecognized pubDate layout, storing null"
        );
    }

    CandidatePost {
        title: clean_text(&item.title),
        link: item.link.clone(),
        description: clean_text(&item.description),
        published_at,
    }
}

/// Entity-decode free text. An empty result becomes `None` rather than an
/// empty string column.
fn clean_text(raw: &str) -> Option<String> {
    let decoded = html_escape::decode_html_entities(raw);
    if decoded.is_empty() {
        None
    } else {
        Some(decoded.into_owned())
    }
}

/// Best-effort publish date parsing. Layouts are tried in a fixed order and
/// the first hit wins:
///
/// 1. RFC 2822, which covers the RFC 1123 and RFC 822 forms, with numeric
///    or named zones, that RSS feeds overwhelmingly use
/// 2. RFC 3339
/// 3. `YYYY-MM-DD HH:MM:SS`, taken as UTC
/// 4. `YYYY-MM-DD`, taken as midnight UTC
///
/// `None` for anything else; the caller stores a null timestamp.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }

    None
}
