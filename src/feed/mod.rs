mod fetcher;
mod normalize;
mod parser;

pub use fetcher::{build_client, fetch_feed, FetchError, USER_AGENT};
pub use normalize::{normalize_item, parse_pub_date, CandidatePost};
pub use parser::{parse_document, RawChannel, RawFeedDocument, RawItem};
