use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::fetcher::FetchError;
use crate::models::{SourceDescriptor, UpdateItem, DEFAULT_TITLE};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Read-only client for a repository's commit history
#[derive(Debug, Clone)]
pub struct CommitClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

/// The fields of a commit record the pipeline cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub message: String,
    pub date: String,
    pub html_url: Option<String>,
}

impl CommitClient {
    /// Create a client against the given API root; no token means anonymous requests
    pub fn new(client: Client, api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(client: Client, config: &FetchConfig) -> Self {
        Self::new(
            client,
            config.github_api_base.clone(),
            config.github_token.clone(),
        )
    }

    /// Fetch up to `per_page` most recent commits of `owner/name`
    pub async fn recent_commits(
        &self,
        repo: &str,
        per_page: u32,
    ) -> Result<Vec<CommitSummary>, FetchError> {
        let url = format!("{}/repos/{}/commits", self.api_base, repo);
        info!(repo, per_page, authenticated = self.token.is_some(), "Fetching commits");

        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", per_page)])
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let commits = parse_commit_list(&body)?;

        debug!(repo, count = commits.len(), "Fetched commits");

        Ok(commits)
    }

    /// Commit-log strategy: recent commits of the descriptor's repository as update items
    pub async fn commit_updates(
        &self,
        source: &SourceDescriptor,
        per_page: u32,
    ) -> Result<Vec<UpdateItem>, FetchError> {
        let Some(repo) = source.repo_id() else {
            return Ok(Vec::new());
        };

        let commits = self.recent_commits(repo, per_page).await?;

        Ok(commits
            .into_iter()
            .map(|c| UpdateItem {
                source: source.name.clone(),
                title: clean_message(&c.message),
                date: c.date,
                url: c
                    .html_url
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| source.site.clone()),
            })
            .collect())
    }
}

/// Parse a commit list response; anything but an array is malformed
pub fn parse_commit_list(body: &str) -> Result<Vec<CommitSummary>, FetchError> {
    let data: Value = serde_json::from_str(body)?;
    let Value::Array(records) = data else {
        return Err(FetchError::Malformed("commit list is not an array".to_string()));
    };

    Ok(records.iter().filter_map(commit_summary).collect())
}

/// Records without a `commit` object are skipped
fn commit_summary(record: &Value) -> Option<CommitSummary> {
    let commit = record.get("commit").filter(|c| c.is_object())?;
    let date = [&commit["author"]["date"], &commit["committer"]["date"]]
        .into_iter()
        .filter_map(Value::as_str)
        .find(|d| !d.is_empty())
        .unwrap_or_default()
        .to_string();

    Some(CommitSummary {
        message: commit["message"].as_str().unwrap_or_default().to_string(),
        date,
        html_url: record["html_url"].as_str().map(str::to_string),
    })
}

/// First line of a commit message with runs of whitespace collapsed
pub fn clean_message(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or_default();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        collapsed
    }
}
