use serde_json::{Map, Value};

use crate::models::{SourceDescriptor, UpdateItem, DEFAULT_TITLE};

const SOURCE_FIELDS: &[&str] = &["source"];
const TITLE_FIELDS: &[&str] = &["title", "summary"];
const DATE_FIELDS: &[&str] = &["date", "published", "updated"];
const URL_FIELDS: &[&str] = &["url", "link"];

/// Keys under which an object-shaped feed may expose its item list
const LIST_KEYS: &[&str] = &["items", "entries"];

/// Normalize a JSON feed document.
///
/// Accepts a bare array of item objects or an object carrying the array under
/// `items` (preferred) or `entries`. Anything else yields no items.
pub fn normalize_json_items(data: &Value, source: &SourceDescriptor) -> Vec<UpdateItem> {
    let Some(raw_items) = item_list(data) else {
        return Vec::new();
    };

    raw_items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| UpdateItem {
            source: first_non_empty(obj, SOURCE_FIELDS).unwrap_or_else(|| source.name.clone()),
            title: first_non_empty(obj, TITLE_FIELDS).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            date: first_non_empty(obj, DATE_FIELDS).unwrap_or_default(),
            url: first_non_empty(obj, URL_FIELDS).unwrap_or_else(|| source.site.clone()),
        })
        .collect()
}

fn item_list(data: &Value) -> Option<&Vec<Value>> {
    match data {
        Value::Array(items) => Some(items),
        Value::Object(obj) => LIST_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

/// First candidate field holding a non-empty string (or a number)
fn first_non_empty(obj: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match obj.get(*field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> SourceDescriptor {
        SourceDescriptor::new("Notes", "https://notes.example")
    }

    #[test]
    fn test_bare_array() {
        let data = json!([
            { "title": "One", "date": "2024-01-01", "url": "https://notes.example/1" },
            { "summary": "Two", "published": "2024-01-02", "link": "https://notes.example/2" }
        ]);

        let items = normalize_json_items(&data, &source());
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            UpdateItem::new("Notes", "One", "2024-01-01", "https://notes.example/1")
        );
        assert_eq!(
            items[1],
            UpdateItem::new("Notes", "Two", "2024-01-02", "https://notes.example/2")
        );
    }

    #[test]
    fn test_items_and_entries_keys() {
        let with_items = json!({ "items": [{ "title": "a" }] });
        let with_entries = json!({ "entries": [{ "title": "b" }, { "title": "c" }] });

        assert_eq!(normalize_json_items(&with_items, &source())[0].title, "a");
        assert_eq!(normalize_json_items(&with_entries, &source()).len(), 2);
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let data = json!([{ "updated": "" , "title": "" }]);
        let items = normalize_json_items(&data, &source());

        assert_eq!(items[0].source, "Notes");
        assert_eq!(items[0].title, DEFAULT_TITLE);
        assert_eq!(items[0].date, "");
        assert_eq!(items[0].url, "https://notes.example");
    }

    #[test]
    fn test_explicit_source_wins() {
        let data = json!([{ "source": "Guest", "title": "t", "date": "2024-05-01" }]);
        assert_eq!(normalize_json_items(&data, &source())[0].source, "Guest");
    }

    #[test]
    fn test_date_priority() {
        let data = json!([{ "published": "2024-01-02", "updated": "2024-03-03" }]);
        assert_eq!(normalize_json_items(&data, &source())[0].date, "2024-01-02");
    }

    #[test]
    fn test_unexpected_shapes() {
        assert!(normalize_json_items(&json!({ "data": [] }), &source()).is_empty());
        assert!(normalize_json_items(&json!("text"), &source()).is_empty());
        assert!(normalize_json_items(&json!({ "items": "nope" }), &source()).is_empty());
    }
}
