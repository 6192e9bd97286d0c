use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Title used when an origin provides nothing usable
pub const DEFAULT_TITLE: &str = "Update";

/// One configured origin of update items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

impl SourceDescriptor {
    pub fn new(name: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            site: site.into(),
            feed: None,
            repo: None,
        }
    }

    pub fn with_feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = Some(feed.into());
        self
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    /// Feed URL, ignoring blank values
    pub fn feed_url(&self) -> Option<&str> {
        self.feed.as_deref().map(str::trim).filter(|f| !f.is_empty())
    }

    /// Repository identifier (`owner/name`), ignoring blank values
    pub fn repo_id(&self) -> Option<&str> {
        self.repo.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }
}

/// The `sources` document read at the start of every run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceList {
    pub sources: Vec<SourceDescriptor>,
}

/// A normalized update record prior to ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub source: String,
    pub title: String,
    /// Timestamp exactly as the origin provided it; may be empty
    pub date: String,
    pub url: String,
}

impl UpdateItem {
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            date: date.into(),
            url: url.into(),
        }
    }

    /// Items without any date cannot be ranked
    pub fn has_date(&self) -> bool {
        !self.date.is_empty()
    }
}

/// The persisted, ranked and capped document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generated_at: String,
    pub items: Vec<UpdateItem>,
}

impl Snapshot {
    pub fn new(items: Vec<UpdateItem>) -> Self {
        Self::generated(Utc::now(), items)
    }

    pub fn generated(at: DateTime<Utc>, items: Vec<UpdateItem>) -> Self {
        Self {
            generated_at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            items,
        }
    }
}
