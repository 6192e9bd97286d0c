use html_escape::{encode_double_quoted_attribute, encode_text};

use super::locale::Locale;
use crate::dates::parse_timestamp;
use crate::models::Snapshot;

/// Month-year label for a stored date, or the locale's "Recent" label
pub fn display_date(raw: &str, locale: Locale) -> String {
    match parse_timestamp(raw) {
        Some(dt) => locale.month_year(dt),
        None => locale.recent_label().to_string(),
    }
}

/// HTML list entries for the first `limit` snapshot items, in stored order.
///
/// An empty snapshot renders nothing so the page keeps its fallback markup.
pub fn render_updates(snapshot: &Snapshot, locale: Locale, limit: usize) -> String {
    snapshot
        .items
        .iter()
        .take(limit)
        .map(|item| {
            format!(
                "<li><a href=\"{}\">{}</a> <span class=\"update-meta\">{} · {}</span></li>",
                encode_double_quoted_attribute(&item.url),
                encode_text(&item.title),
                encode_text(&item.source),
                display_date(&item.date, locale),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
