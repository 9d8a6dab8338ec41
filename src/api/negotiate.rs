//! Accept header negotiation between plain JSON and Mason.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

use crate::api::error::ApiError;
use crate::hypermedia::{JSON, MASON};

/// The two representations every readable resource offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Json,
    Mason,
}

impl MediaType {
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Json => JSON,
            MediaType::Mason => MASON,
        }
    }

    /// Prefix of response cache keys for this variant.
    pub fn cache_prefix(self) -> &'static str {
        match self {
            MediaType::Json => "json-view",
            MediaType::Mason => "mason-view",
        }
    }
}

/// One `type/subtype;q=...` entry of an Accept header.
#[derive(Debug, Clone, PartialEq)]
struct MediaRange<'a> {
    essence: &'a str,
    quality: f32,
}

fn parse_ranges(accept: &str) -> Vec<MediaRange<'_>> {
    accept
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let essence = parts.next()?.trim();
            if essence.is_empty() {
                return None;
            }
            let quality = parts
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0)
                .clamp(0.0, 1.0);
            Some(MediaRange { essence, quality })
        })
        .collect()
}

/// Quality the client assigns to `mime`, taken from the most specific
/// matching range. `None` when nothing matches.
fn quality_of(ranges: &[MediaRange<'_>], mime: &str) -> Option<f32> {
    let (kind, _) = mime.split_once('/')?;
    let exact = ranges.iter().find(|r| r.essence.eq_ignore_ascii_case(mime));
    let partial = || {
        ranges.iter().find(|r| {
            r.essence
                .strip_suffix("/*")
                .is_some_and(|k| k.eq_ignore_ascii_case(kind))
        })
    };
    let any = || ranges.iter().find(|r| r.essence == "*/*");
    exact.or_else(partial).or_else(any).map(|r| r.quality)
}

/// Pick a representation for an Accept header value.
///
/// Mason must be asked for by name; wildcards only ever select JSON.
pub fn negotiate(accept: Option<&str>) -> Option<MediaType> {
    let accept = match accept.map(str::trim) {
        None | Some("") => return Some(MediaType::Json),
        Some(accept) => accept,
    };
    let ranges = parse_ranges(accept);
    let json = quality_of(&ranges, JSON).unwrap_or(0.0);
    let mason = ranges
        .iter()
        .find(|r| r.essence.eq_ignore_ascii_case(MASON))
        .map(|r| r.quality)
        .unwrap_or(0.0);

    if mason > 0.0 && mason >= json {
        Some(MediaType::Mason)
    } else if json > 0.0 {
        Some(MediaType::Json)
    } else {
        None
    }
}

fn accept_header(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    headers
        .get(header::ACCEPT)
        .map(|v| {
            v.to_str()
                .map_err(|_| ApiError::BadRequest("Accept header is not valid text".into()))
        })
        .transpose()
}

/// Extractor resolving the representation a GET should return.
#[derive(Debug, Clone, Copy)]
pub struct Negotiated(pub MediaType);

impl<S> FromRequestParts<S> for Negotiated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = accept_header(&parts.headers)?;
        negotiate(accept).map(Negotiated).ok_or_else(|| {
            ApiError::NotAcceptable(format!(
                "Supported media types are {JSON} and {MASON}"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_json() {
        assert_eq!(negotiate(None), Some(MediaType::Json));
        assert_eq!(negotiate(Some("")), Some(MediaType::Json));
        assert_eq!(negotiate(Some("*/*")), Some(MediaType::Json));
        assert_eq!(negotiate(Some("application/*")), Some(MediaType::Json));
        assert_eq!(negotiate(Some("application/json")), Some(MediaType::Json));
    }

    #[test]
    fn test_mason_by_name() {
        assert_eq!(negotiate(Some(MASON)), Some(MediaType::Mason));
        assert_eq!(
            negotiate(Some("application/json, application/vnd.mason+json")),
            Some(MediaType::Mason)
        );
        assert_eq!(
            negotiate(Some("application/vnd.mason+json;q=0.9, */*;q=0.1")),
            Some(MediaType::Mason)
        );
    }

    #[test]
    fn test_quality_ordering() {
        assert_eq!(
            negotiate(Some("application/vnd.mason+json;q=0.5, application/json")),
            Some(MediaType::Json)
        );
        assert_eq!(
            negotiate(Some("application/vnd.mason+json;q=0, application/json;q=0.2")),
            Some(MediaType::Json)
        );
    }

    #[test]
    fn test_not_acceptable() {
        assert_eq!(negotiate(Some("text/html")), None);
        assert_eq!(negotiate(Some("application/xml, text/*")), None);
        assert_eq!(negotiate(Some("application/json;q=0")), None);
    }

    #[test]
    fn test_cache_prefixes() {
        assert_eq!(MediaType::Json.cache_prefix(), "json-view");
        assert_eq!(MediaType::Mason.cache_prefix(), "mason-view");
        assert_eq!(MediaType::Mason.mime(), "application/vnd.mason+json");
    }
}
