use std::cmp::Reverse;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use futures::future::join_all;
use html_escape::{encode_double_quoted_attribute, encode_text};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::dates::sort_key;
use crate::github::{clean_message, CommitClient};
use crate::render::{display_date, Locale};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)YOUR-GITHUB-ORG|YOUR-USERNAME|YOUR-REPO").expect("valid placeholder pattern")
});

/// A project card listed in the projects document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
}

impl Project {
    /// Repository to query, unless missing or still a template value
    pub fn queryable_repo(&self) -> Option<&str> {
        self.repo
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty() && !PLACEHOLDER.is_match(r))
    }
}

/// Latest commit of one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUpdate {
    pub name: String,
    pub url: Option<String>,
    pub date: String,
    pub message: String,
}

/// Parse the projects document; a non-array `projects` value means no projects
pub fn parse_projects(data: &Value) -> Vec<Project> {
    data["projects"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|p| serde_json::from_value(p.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

pub fn load_projects(path: impl AsRef<Path>) -> Result<Vec<Project>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read projects: {}", path.display()))?;
    let data: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse projects: {}", path.display()))?;
    Ok(parse_projects(&data))
}

async fn latest_commit(client: &CommitClient, project: &Project) -> Option<ProjectUpdate> {
    let repo = project.queryable_repo()?;

    let commits = match client.recent_commits(repo, 1).await {
        Ok(commits) => commits,
        Err(e) => {
            warn!(project = %project.name, repo, error = %e, "Skipping project");
            return None;
        }
    };

    commits.into_iter().next().map(|c| ProjectUpdate {
        name: project.name.clone(),
        url: project.url.clone(),
        date: c.date,
        message: clean_message(&c.message),
    })
}

/// One request per project, all in flight together, newest first
pub async fn latest_project_updates(
    client: &CommitClient,
    projects: &[Project],
) -> Vec<ProjectUpdate> {
    let results = join_all(projects.iter().map(|p| latest_commit(client, p))).await;

    let mut updates: Vec<ProjectUpdate> = results.into_iter().flatten().collect();
    updates.sort_by_cached_key(|u| Reverse(sort_key(&u.date)));

    debug!(projects = projects.len(), updates = updates.len(), "Collected project commits");

    updates
}

pub fn render_project_updates(updates: &[ProjectUpdate], locale: Locale, limit: usize) -> String {
    updates
        .iter()
        .take(limit)
        .map(|u| {
            let label = format!(
                "{} — {}: {}",
                display_date(&u.date, locale),
                u.name,
                u.message
            );
            let href = u.url.as_deref().filter(|s| !s.is_empty()).unwrap_or("/");
            format!(
                "<li><a href=\"{}\">{}</a></li>",
                encode_double_quoted_attribute(href),
                encode_text(&label),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
