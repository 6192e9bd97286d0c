pub mod aggregator;
pub mod config;
pub mod dates;
pub mod feeds;
pub mod fetcher;
pub mod github;
pub mod models;
pub mod profile;
pub mod projects;
pub mod ranking;
pub mod render;
pub mod sources;
pub mod store;

pub use aggregator::Aggregator;
pub use config::{Config, ResolutionPolicy};
pub use fetcher::{FetchError, HttpFetcher, UpdateFetcher};
pub use github::CommitClient;
pub use models::*;
pub use render::Locale;
pub use sources::load_sources;
pub use store::{JsonSnapshotStore, SnapshotStore};
