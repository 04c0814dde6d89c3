use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::DataError;
use super::loader::load_file;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Dataset cache keyed by source identity
// ---------------------------------------------------------------------------

struct CacheEntry {
    modified: Option<SystemTime>,
    dataset: Arc<Dataset>,
}

/// Memoizes loaded datasets by canonical path and modification time, so
/// reopening an unchanged file never re-parses it.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it when absent or stale.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, DataError> {
        let canonical = path.canonicalize()?;
        let modified = std::fs::metadata(&canonical)?.modified().ok();

        if let Some(entry) = self.entries.get(&canonical) {
            if entry.modified == modified {
                log::debug!("Dataset cache hit for {}", canonical.display());
                return Ok(Arc::clone(&entry.dataset));
            }
            log::info!("{} changed on disk, reloading", canonical.display());
        }

        let dataset = Arc::new(load_file(&canonical)?);
        self.entries.insert(
            canonical,
            CacheEntry {
                modified,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Forget `path`; returns whether it was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
