//! Raw syndication XML decoding.
//!
//! The document is kept deliberately raw: `pubDate` stays free text so the
//! normalizer can run its own layout chain over it, and nothing here touches
//! HTML entities beyond the XML-level unescaping the decoder performs.

use serde::Deserialize;

/// A decoded RSS document. Transient: it lives between fetch and
/// normalization and is never persisted.
#[derive(Debug, Deserialize)]
pub struct RawFeedDocument {
    pub channel: RawChannel,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawChannel {
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(rename = "item")]
    pub items: Vec<RawItem>,
}

/// One `<item>` as it appears on the wire. Missing children decode as empty
/// strings; unknown children are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

pub fn parse_document(bytes: &[u8]) -> Result<RawFeedDocument, quick_xml::DeError> {
    quick_xml::de::from_reader(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_channel_and_items_in_order() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Example</title>
  <link>https://example.com</link>
  <description>An example feed</description>
  <item>
    <title>First</title>
    <link>https://example.com/1</link>
    <description>one</description>
    <pubDate>Wed, 15 Jan 2025 10:30:00 GMT</pubDate>
  </item>
  <item>
    <title>Second</title>
    <link>https://example.com/2</link>
    <description>two</description>
    <pubDate>2025-01-16</pubDate>
  </item>
</channel></rss>"#;

        let doc = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(doc.channel.title, "Example");
        assert_eq!(doc.channel.items.len(), 2);
        assert_eq!(doc.channel.items[0].title, "First");
        assert_eq!(doc.channel.items[0].pub_date, "Wed, 15 Jan 2025 10:30:00 GMT");
        assert_eq!(doc.channel.items[1].link, "https://example.com/2");
        assert_eq!(doc.channel.items[1].pub_date, "2025-01-16");
    }

    #[test]
    fn missing_item_children_decode_as_empty() {
        let xml = r#"<rss version="2.0"><channel>
  <title>Sparse</title>
  <item><link>https://example.com/only-link</link></item>
</channel></rss>"#;

        let doc = parse_document(xml.as_bytes()).unwrap();
        let item = &doc.channel.items[0];
        assert_eq!(item.title, "");
        assert_eq!(item.description, "");
        assert_eq!(item.pub_date, "");
        assert_eq!(item.link, "https://example.com/only-link");
    }

    #[test]
    fn unknown_channel_children_are_ignored() {
        let xml = r#"<rss version="2.0"><channel>
  <title>Extras</title>
  <language>en-us</language>
  <lastBuildDate>Mon, 06 Sep 2021 00:01:00 +0000</lastBuildDate>
  <item><title>Post</title><link>https://example.com/p</link></item>
</channel></rss>"#;

        let doc = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(doc.channel.items.len(), 1);
    }

    #[test]
    fn empty_channel_has_no_items() {
        let xml = r#"<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
        let doc = parse_document(xml.as_bytes()).unwrap();
        assert!(doc.channel.items.is_empty());
    }

    #[test]
    fn xml_entities_are_unescaped_by_the_decoder() {
        let xml = r#"<rss version="2.0"><channel>
  <item><title>Q &amp; A</title><link>https://example.com/qa?a=1&amp;b=2</link></item>
</channel></rss>"#;

        let doc = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(doc.channel.items[0].title, "Q & A");
        assert_eq!(doc.channel.items[0].link, "https://example.com/qa?a=1&b=2");
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_document(b"<not really xml").is_err());
    }

    #[test]
    fn document_without_channel_is_an_error() {
        assert!(parse_document(b"<feed><entry/></feed>").is_err());
    }
}
