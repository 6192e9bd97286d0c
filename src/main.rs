use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use site_updates::fetcher::http_client;
use site_updates::profile::load_profile_widgets;
use site_updates::projects::{latest_project_updates, load_projects, render_project_updates};
use site_updates::render::render_updates;
use site_updates::{
    load_sources, Aggregator, CommitClient, Config, HttpFetcher, JsonSnapshotStore, Locale,
    ResolutionPolicy, SnapshotStore,
};

#[derive(Parser)]
#[command(name = "site-updates")]
#[command(about = "Aggregate recent activity from feeds and commit logs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file (defaults to .site-updates/config.yml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Token for the commit API (unauthenticated when absent)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every source and write a fresh updates snapshot
    Build {
        /// Source list document
        #[arg(long)]
        sources: Option<PathBuf>,

        /// Snapshot destination
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of sources fetched at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// How feed and commit strategies combine
        #[arg(long, value_enum)]
        policy: Option<ResolutionPolicy>,
    },

    /// Print the snapshot as a localized HTML list
    Render {
        /// Snapshot to read
        #[arg(long)]
        input: Option<PathBuf>,

        /// Page language tag
        #[arg(long)]
        lang: Option<String>,

        /// Maximum number of entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the profile statistics widget values
    Profile {
        /// Profile statistics document
        #[arg(long)]
        input: Option<PathBuf>,

        /// Page language tag
        #[arg(long)]
        lang: Option<String>,
    },

    /// Print the latest commit of each listed project
    Projects {
        /// Projects document
        #[arg(long)]
        input: Option<PathBuf>,

        /// Page language tag
        #[arg(long)]
        lang: Option<String>,

        /// Maximum number of entries
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("site_updates=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    }
    .with_github_token(cli.github_token);

    match cli.command {
        Commands::Build {
            sources,
            output,
            concurrency,
            policy,
        } => {
            run_build(config, sources, output, concurrency, policy).await?;
        }
        Commands::Render { input, lang, limit } => {
            run_render(&config, input, lang, limit)?;
        }
        Commands::Profile { input, lang } => {
            run_profile(&config, input, lang);
        }
        Commands::Projects { input, lang, limit } => {
            run_projects(&config, input, lang, limit).await?;
        }
    }

    Ok(())
}

async fn run_build(
    mut config: Config,
    sources: Option<PathBuf>,
    output: Option<PathBuf>,
    concurrency: Option<usize>,
    policy: Option<ResolutionPolicy>,
) -> Result<()> {
    if let Some(n) = concurrency {
        config.fetch.concurrency = n;
    }
    if let Some(p) = policy {
        config.fetch.policy = p;
    }
    let sources_path = sources.unwrap_or(config.paths.sources.clone());
    let output_path = output.unwrap_or(config.paths.updates.clone());

    let sources = load_sources(&sources_path)?;

    let fetcher = HttpFetcher::new(&config.fetch)?;
    let store = JsonSnapshotStore::new(&output_path);
    let aggregator = Aggregator::new(fetcher, store, config.ranking.clone())
        .with_concurrency(config.fetch.concurrency);

    let snapshot = aggregator.run(&sources).await?;

    println!(
        "Wrote {} updates to {}",
        snapshot.items.len(),
        output_path.display()
    );

    Ok(())
}

fn locale_for(config: &Config, lang: Option<String>) -> Locale {
    Locale::from_tag(lang.as_deref().unwrap_or(&config.render.default_lang))
}

fn run_render(
    config: &Config,
    input: Option<PathBuf>,
    lang: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let path = input.unwrap_or(config.paths.updates.clone());
    let store = JsonSnapshotStore::new(&path);

    let Some(snapshot) = store.load()? else {
        warn!(path = %path.display(), "No snapshot to render");
        return Ok(());
    };

    let html = render_updates(
        &snapshot,
        locale_for(config, lang),
        limit.unwrap_or(config.render.max_items),
    );
    if !html.is_empty() {
        println!("{}", html);
    }

    Ok(())
}

fn run_profile(config: &Config, input: Option<PathBuf>, lang: Option<String>) {
    let path = input.unwrap_or(config.paths.profile.clone());
    let widgets = load_profile_widgets(&path, locale_for(config, lang));

    if let Some(contributions) = widgets.contributions {
        println!("contributions_last_year: {}", contributions);
    }
    if let Some(as_of) = widgets.as_of {
        println!("as_of: {}", as_of);
    }
}

async fn run_projects(
    config: &Config,
    input: Option<PathBuf>,
    lang: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let path = input.unwrap_or(config.paths.projects.clone());
    let projects = match load_projects(&path) {
        Ok(projects) => projects,
        Err(e) => {
            warn!(error = %e, "Keeping fallback project list");
            return Ok(());
        }
    };

    let client = http_client(&config.fetch).context("Failed to set up commit client")?;
    let commits = CommitClient::from_config(client, &config.fetch);
    let updates = latest_project_updates(&commits, &projects).await;

    info!(count = updates.len(), "Resolved project commits");

    let html = render_project_updates(
        &updates,
        locale_for(config, lang),
        limit.unwrap_or(config.render.projects_max_items),
    );
    if !html.is_empty() {
        println!("{}", html);
    }

    Ok(())
}
