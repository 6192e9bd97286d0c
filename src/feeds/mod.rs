pub mod json;
pub mod xml;

pub use json::normalize_json_items;
pub use xml::parse_xml_feed;

use crate::models::{SourceDescriptor, UpdateItem};

/// Detected shape of a feed response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Json,
    Xml,
}

impl FeedFormat {
    /// Sniff the body: a leading `{` or `[` means JSON, anything else is markup
    pub fn sniff(body: &str) -> Self {
        match body.trim_start().chars().next() {
            Some('{') | Some('[') => FeedFormat::Json,
            _ => FeedFormat::Xml,
        }
    }
}

/// Turn a feed response body into update items.
///
/// Invalid JSON is an error; markup extraction is best effort and never fails.
pub fn parse_feed_body(
    body: &str,
    source: &SourceDescriptor,
) -> Result<Vec<UpdateItem>, serde_json::Error> {
    let body = body.trim();
    match FeedFormat::sniff(body) {
        FeedFormat::Json => {
            let data: serde_json::Value = serde_json::from_str(body)?;
            Ok(normalize_json_items(&data, source))
        }
        FeedFormat::Xml => Ok(parse_xml_feed(body, source)),
    }
}
