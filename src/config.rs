use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Location read when no `--config` is given
pub const DEFAULT_CONFIG_PATH: &str = ".site-updates/config.yml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub fetch: FetchConfig,
    pub ranking: RankingConfig,
    pub render: RenderConfig,
}

/// Input and output document locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub sources: PathBuf,
    pub updates: PathBuf,
    pub profile: PathBuf,
    pub projects: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources: PathBuf::from("data/sources.json"),
            updates: PathBuf::from("data/updates.json"),
            profile: PathBuf::from("data/profile.json"),
            projects: PathBuf::from("data/projects.json"),
        }
    }
}

/// How a source resolves its items across the two strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Commit log only when the feed produced nothing
    #[default]
    Fallback,
    /// Feed items followed by commit log items
    Both,
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub github_api_base: String,
    pub commits_per_repo: u32,
    pub policy: ResolutionPolicy,
    /// Sources fetched at once; 1 keeps the run sequential
    pub concurrency: usize,
    pub timeout_secs: Option<u64>,
    /// Bearer credential for the commit API, supplied at runtime only
    #[serde(skip)]
    pub github_token: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "site-updates (+https://github.com)".to_string(),
            github_api_base: "https://api.github.com".to_string(),
            commits_per_repo: 5,
            policy: ResolutionPolicy::Fallback,
            concurrency: 1,
            timeout_secs: None,
            github_token: None,
        }
    }
}

/// Caps applied while pooling and ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub per_source_cap: usize,
    pub max_items: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            per_source_cap: 3,
            max_items: 10,
        }
    }
}

/// Display settings for the rendered widgets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub max_items: usize,
    pub projects_max_items: usize,
    pub default_lang: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_items: 5,
            projects_max_items: 6,
            default_lang: "en".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Load configuration from the default location (.site-updates/config.yml)
    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// Attach the commit API credential; blank values mean unauthenticated
    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.fetch.github_token = token.filter(|t| !t.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.paths.sources, PathBuf::from("data/sources.json"));
        assert_eq!(config.paths.updates, PathBuf::from("data/updates.json"));
        assert_eq!(config.fetch.commits_per_repo, 5);
        assert_eq!(config.fetch.policy, ResolutionPolicy::Fallback);
        assert_eq!(config.fetch.concurrency, 1);
        assert_eq!(config.ranking.per_source_cap, 3);
        assert_eq!(config.ranking.max_items, 10);
        assert_eq!(config.render.max_items, 5);
        assert!(config.fetch.github_token.is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
paths:
  updates: public/data/updates.json

fetch:
  policy: both
  concurrency: 4
  github_api_base: http://localhost:9000

ranking:
  max_items: 20
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.paths.updates, PathBuf::from("public/data/updates.json"));
        assert_eq!(config.paths.sources, PathBuf::from("data/sources.json"));
        assert_eq!(config.fetch.policy, ResolutionPolicy::Both);
        assert_eq!(config.fetch.concurrency, 4);
        assert_eq!(config.fetch.github_api_base, "http://localhost:9000");
        assert_eq!(config.fetch.commits_per_repo, 5);
        assert_eq!(config.ranking.max_items, 20);
        assert_eq!(config.ranking.per_source_cap, 3);
    }

    #[test]
    fn test_token_is_never_read_from_file() {
        let yaml = "fetch:\n  github_token: secret\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.fetch.github_token.is_none());
    }

    #[test]
    fn test_blank_token_is_unauthenticated() {
        let config = Config::default().with_github_token(Some("  ".to_string()));
        assert!(config.fetch.github_token.is_none());

        let config = Config::default().with_github_token(Some("ghp_x".to_string()));
        assert_eq!(config.fetch.github_token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/site-updates.yml").unwrap();
        assert_eq!(config.ranking.max_items, 10);
    }

    #[test]
    fn test_load_default_without_file() {
        assert!(!Path::new(DEFAULT_CONFIG_PATH).exists());
        let config = Config::load_default().unwrap();
        assert_eq!(config.paths.updates, PathBuf::from("data/updates.json"));
        assert_eq!(config.fetch.policy, ResolutionPolicy::Fallback);
    }
}
