//! Small shared helpers: feed-URL validation and interval parsing.

use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

// ============================================================================
// Feed URL Validation
// ============================================================================

#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid URL: {0}")]
    Invalid(#[from] url::ParseError),
    #[error("unsupported scheme {0:?} (only http and https)")]
    UnsupportedScheme(String),
    #[error("refusing loopback or private host {0:?}")]
    PrivateHost(String),
}

/// Check that a string is usable as a feed source before it is stored:
/// http/https only, and not pointed at this machine or a private network.
/// The caller stores the string exactly as given; this never rewrites it.
pub fn validate_feed_url(raw: &str) -> Result<(), UrlError> {
    let url = Url::parse(raw)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_owned())),
    }

    if let Some(host) = url.host_str() {
        // Strip brackets from IPv6 hosts before parsing
        let bare = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if bare == "localhost" {
            return Err(UrlError::PrivateHost(host.to_owned()));
        }
        if let Ok(ip) = bare.parse::<IpAddr>() {
            if is_private_ip(&ip) {
                return Err(UrlError::PrivateHost(host.to_owned()));
            }
        }
    }

    Ok(())
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            v6.is_loopback()
                || v6.is_unspecified()
                || (segments[0] & 0xfe00) == 0xfc00 // unique local
                || (segments[0] & 0xffc0) == 0xfe80 // link local
        }
    }
}

// ============================================================================
// Interval Parsing
// ============================================================================

#[derive(Debug, Clone, Error)]
#[error("invalid duration {0:?}; use forms like 90s, 5m or 2h")]
pub struct DurationParseError(String);

/// Parse the interval grammar the CLI accepts: an integer with an optional
/// `s`, `m`, or `h` suffix. A bare number is seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, DurationParseError> {
    let raw = raw.trim();
    let (value, unit) = match raw.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => raw.split_at(idx),
        None => (raw, "s"),
    };

    let value: u64 = value
        .parse()
        .map_err(|_| DurationParseError(raw.to_owned()))?;

    let seconds = match unit {
        "s" => value,
        "m" => value * 60,
        "h" => value * 3600,
        _ => return Err(DurationParseError(raw.to_owned())),
    };

    Ok(Duration::from_secs(seconds))
}
