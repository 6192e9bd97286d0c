use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::{FetchConfig, ResolutionPolicy};
use crate::feeds::parse_feed_body;
use crate::github::CommitClient;
use crate::models::{SourceDescriptor, UpdateItem};

/// Why a single fetch produced nothing
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(StatusCode),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Resolves the update items of one source; never fails
#[async_trait]
pub trait UpdateFetcher: Send + Sync {
    async fn fetch(&self, source: &SourceDescriptor) -> Vec<UpdateItem>;
}

/// Fetcher backed by HTTP feed requests and the commit API
pub struct HttpFetcher {
    client: Client,
    commits: CommitClient,
    commits_per_repo: u32,
    policy: ResolutionPolicy,
}

/// Shared HTTP client carrying the identifying User-Agent
pub fn http_client(config: &FetchConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to create HTTP client")
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = http_client(config)?;
        let commits = CommitClient::from_config(client.clone(), config);

        Ok(Self {
            client,
            commits,
            commits_per_repo: config.commits_per_repo,
            policy: config.policy,
        })
    }

    /// Feed strategy: GET the feed URL and extract items from the body
    #[instrument(skip(self, source), fields(source = %source.name))]
    pub async fn feed_updates(
        &self,
        source: &SourceDescriptor,
    ) -> Result<Vec<UpdateItem>, FetchError> {
        let Some(url) = source.feed_url() else {
            return Ok(Vec::new());
        };

        debug!(url, "Fetching feed");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let items = parse_feed_body(&body, source)?;

        debug!(url, count = items.len(), "Parsed feed");

        Ok(items)
    }

    /// Commit-log strategy for the descriptor's repository
    #[instrument(skip(self, source), fields(source = %source.name))]
    pub async fn commit_updates(
        &self,
        source: &SourceDescriptor,
    ) -> Result<Vec<UpdateItem>, FetchError> {
        self.commits
            .commit_updates(source, self.commits_per_repo)
            .await
    }
}

/// Discard a failed strategy's reason, counting it as zero items
fn absorb(
    source: &SourceDescriptor,
    strategy: &'static str,
    outcome: Result<Vec<UpdateItem>, FetchError>,
) -> Vec<UpdateItem> {
    match outcome {
        Ok(items) => items,
        Err(e) => {
            warn!(source = %source.name, strategy, error = %e, "Source strategy failed, skipping");
            Vec::new()
        }
    }
}

#[async_trait]
impl UpdateFetcher for HttpFetcher {
    async fn fetch(&self, source: &SourceDescriptor) -> Vec<UpdateItem> {
        let mut items = absorb(source, "feed", self.feed_updates(source).await);

        let wants_commits = match self.policy {
            ResolutionPolicy::Fallback => items.is_empty(),
            ResolutionPolicy::Both => true,
        };
        if wants_commits {
            items.extend(absorb(source, "commits", self.commit_updates(source).await));
        }

        debug!(source = %source.name, count = items.len(), "Resolved source");

        items
    }
}
