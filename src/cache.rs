//! Explicit memoization of loaded dataset pairs.
//!
//! Snapshots are keyed by the `(yield path, measures path)` pair and shared
//! read-only behind an `Arc`. Nothing is reloaded unless a caller asks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info};

use crate::data::loader::load_datasets;
use crate::data::model::{MeasuresTable, YieldTable};
use crate::error::Result;

/// One immutable snapshot of both datasets.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub yields: YieldTable,
    pub measures: MeasuresTable,
}

impl Datasets {
    /// Read both files. See [`load_datasets`].
    ///
    /// # Errors
    ///
    /// `DatasetLoad` if either file is unreadable or malformed.
    pub fn load(yield_path: &Path, measures_path: &Path) -> Result<Self> {
        let (yields, measures) = load_datasets(yield_path, measures_path)?;
        Ok(Self { yields, measures })
    }
}

type CacheKey = (PathBuf, PathBuf);

/// Cache of dataset snapshots keyed by file path pair.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<CacheKey, Arc<Datasets>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot for the pair, loading it on first use.
    /// Failed loads are not cached.
    ///
    /// # Errors
    ///
    /// `DatasetLoad` if the pair is not cached and loading fails.
    pub fn get_or_load(&self, yield_path: &Path, measures_path: &Path) -> Result<Arc<Datasets>> {
        let key = key(yield_path, measures_path);
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            debug!("dataset cache hit for {}", yield_path.display());
            return Ok(Arc::clone(hit));
        }

        let loaded = Arc::new(Datasets::load(yield_path, measures_path)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // another caller may have raced us; keep whichever landed first
        let entry = entries.entry(key).or_insert(loaded);
        Ok(Arc::clone(entry))
    }

    /// Re-read the pair unconditionally. On failure the previous snapshot,
    /// if any, stays in place.
    ///
    /// # Errors
    ///
    /// `DatasetLoad` if loading fails.
    pub fn reload(&self, yield_path: &Path, measures_path: &Path) -> Result<Arc<Datasets>> {
        let loaded = Arc::new(Datasets::load(yield_path, measures_path)?);
        info!(
            "reloaded datasets {} / {}",
            yield_path.display(),
            measures_path.display()
        );
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key(yield_path, measures_path), Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Drop the snapshot for the pair. Returns whether one was cached.
    pub fn invalidate(&self, yield_path: &Path, measures_path: &Path) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key(yield_path, measures_path))
            .is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn key(yield_path: &Path, measures_path: &Path) -> CacheKey {
    (yield_path.to_path_buf(), measures_path.to_path_buf())
}
