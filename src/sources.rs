use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::{SourceDescriptor, SourceList};

/// Read the configured source list. Without it no run can proceed.
pub fn load_sources(path: impl AsRef<Path>) -> Result<Vec<SourceDescriptor>> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source list: {}", path.display()))?;

    let list: SourceList = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse source list: {}", path.display()))?;

    info!(path = %path.display(), count = list.sources.len(), "Loaded sources");

    Ok(list.sources)
}
