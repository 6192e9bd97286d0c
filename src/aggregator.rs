use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::config::RankingConfig;
use crate::fetcher::UpdateFetcher;
use crate::models::{Snapshot, SourceDescriptor, UpdateItem};
use crate::ranking::{cap_per_source, rank};
use crate::store::SnapshotStore;

/// Runs the fetch, pool, rank and persist pipeline
pub struct Aggregator<F: UpdateFetcher, S: SnapshotStore> {
    fetcher: F,
    store: S,
    ranking: RankingConfig,
    concurrency: usize,
}

impl<F: UpdateFetcher, S: SnapshotStore> Aggregator<F, S> {
    pub fn new(fetcher: F, store: S, ranking: RankingConfig) -> Self {
        Self {
            fetcher,
            store,
            ranking,
            concurrency: 1,
        }
    }

    /// Fetch up to `n` sources at once; results keep configuration order
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Per-source items, each capped, concatenated in source order
    pub async fn collect(&self, sources: &[SourceDescriptor]) -> Vec<UpdateItem> {
        let cap = self.ranking.per_source_cap;

        let per_source: Vec<Vec<UpdateItem>> = stream::iter(sources)
            .map(|source| async move {
                let items = self.fetcher.fetch(source).await;
                debug!(source = %source.name, fetched = items.len(), "Pooling source");
                cap_per_source(items, cap)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        per_source.into_iter().flatten().collect()
    }

    /// Build a fresh snapshot without persisting it
    pub async fn aggregate(&self, sources: &[SourceDescriptor]) -> Snapshot {
        info!(
            sources = sources.len(),
            concurrency = self.concurrency,
            "Starting aggregation"
        );

        let pool = self.collect(sources).await;
        let pooled = pool.len();
        let items = rank(pool, self.ranking.max_items);

        debug!(pooled, ranked = items.len(), "Ranked pooled items");

        Snapshot::new(items)
    }

    /// Build a snapshot and overwrite the stored one with it
    pub async fn run(&self, sources: &[SourceDescriptor]) -> Result<Snapshot> {
        let snapshot = self.aggregate(sources).await;
        self.store.save(&snapshot)?;

        info!(count = snapshot.items.len(), "Aggregation complete");

        Ok(snapshot)
    }

    /// Get the store for direct access
    pub fn store(&self) -> &S {
        &self.store
    }
}
