use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::warn;

use crate::render::Locale;

/// Display values for the two profile statistics widgets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileWidgets {
    pub contributions: Option<String>,
    pub as_of: Option<String>,
}

/// Derive widget values from a profile statistics document
pub fn profile_widgets(data: &Value, locale: Locale) -> ProfileWidgets {
    let github = &data["github"];

    let contributions = match &github["contributions_last_year"] {
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };

    let as_of = github["as_of"]
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| locale.long_date(naive.and_utc()));

    ProfileWidgets {
        contributions,
        as_of,
    }
}

fn read_profile(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile stats: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse profile stats: {}", path.display()))
}

/// Load widget values; an unreadable document leaves both widgets empty
pub fn load_profile_widgets(path: impl AsRef<Path>, locale: Locale) -> ProfileWidgets {
    match read_profile(path.as_ref()) {
        Ok(data) => profile_widgets(&data, locale),
        Err(e) => {
            warn!(error = %e, "Keeping fallback profile content");
            ProfileWidgets::default()
        }
    }
}
