use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{SourceDescriptor, UpdateItem, DEFAULT_TITLE};

static ITEM_BLOCK: Lazy<Regex> = Lazy::new(|| block_regex("item"));
static ENTRY_BLOCK: Lazy<Regex> = Lazy::new(|| block_regex("entry"));

static TITLE: Lazy<Regex> = Lazy::new(|| tag_regex("title"));
static PUB_DATE: Lazy<Regex> = Lazy::new(|| tag_regex("pubDate"));
static UPDATED: Lazy<Regex> = Lazy::new(|| tag_regex("updated"));
static DC_DATE: Lazy<Regex> = Lazy::new(|| tag_regex("dc:date"));
static LINK: Lazy<Regex> = Lazy::new(|| tag_regex("link"));

static LINK_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<link[^>]*href=["']([^"']+)["'][^>]*>"#).expect("valid link pattern")
});

fn block_regex(tag: &str) -> Regex {
    let tag = regex::escape(tag);
    Regex::new(&format!(r"(?is)<{tag}(?:\s[^>]*)?>.*?</{tag}>")).expect("valid block pattern")
}

fn tag_regex(tag: &str) -> Regex {
    let tag = regex::escape(tag);
    Regex::new(&format!(r"(?is)<{tag}[^>]*>(.*?)</{tag}>")).expect("valid tag pattern")
}

/// Extract update items from RSS or Atom markup.
///
/// RSS `<item>` blocks win; `<entry>` blocks are only considered when the
/// document has no items at all.
pub fn parse_xml_feed(xml: &str, source: &SourceDescriptor) -> Vec<UpdateItem> {
    let mut blocks: Vec<&str> = ITEM_BLOCK.find_iter(xml).map(|m| m.as_str()).collect();
    if blocks.is_empty() {
        blocks = ENTRY_BLOCK.find_iter(xml).map(|m| m.as_str()).collect();
    }

    blocks
        .into_iter()
        .map(|block| {
            let title = extract(&TITLE, block);
            let date = [&*PUB_DATE, &*UPDATED, &*DC_DATE]
                .into_iter()
                .map(|re| extract(re, block))
                .find(|d| !d.is_empty())
                .unwrap_or_default();
            let url = extract_link(block);

            UpdateItem {
                source: source.name.clone(),
                title: non_empty_or(title, DEFAULT_TITLE),
                date,
                url: non_empty_or(url, &source.site),
            }
        })
        .collect()
}

/// First occurrence of a tag's content, cleaned and trimmed
fn extract(re: &Regex, block: &str) -> String {
    re.captures(block)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .unwrap_or_default()
}

/// Atom-style `href` attribute first, then RSS-style element content
fn extract_link(block: &str) -> String {
    if let Some(href) = LINK_HREF.captures(block).and_then(|c| c.get(1)) {
        let href = clean_text(href.as_str());
        if !href.is_empty() {
            return href;
        }
    }
    extract(&LINK, block)
}

fn clean_text(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .unwrap_or(trimmed);
    html_escape::decode_html_entities(inner).trim().to_string()
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
