use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::SnapshotStore;
use crate::models::Snapshot;

/// Single pretty-printed JSON document on disk
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Two-space indented JSON with a trailing newline
pub fn to_document(snapshot: &Snapshot) -> Result<String> {
    let mut content =
        serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
    content.push('\n');
    Ok(content)
}

impl SnapshotStore for JsonSnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot directory: {}", dir.display()))?;

        let content = to_document(snapshot)?;

        // Written beside the target so the rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(content.as_bytes())
            .context("Failed to write snapshot")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace snapshot: {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            count = snapshot.items.len(),
            "Saved snapshot"
        );

        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No snapshot on disk");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snapshot: {}", self.path.display()))?;

        let snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", self.path.display()))?;

        Ok(Some(snapshot))
    }
}
