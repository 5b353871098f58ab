use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Context;

use super::loader::load_file;
use super::model::ReportTable;
use crate::config::LoadOptions;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Identity of a source file: canonical path plus modification time, so an
/// edited file is read again while an untouched one is served from memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

impl SourceKey {
    pub fn for_path(path: &Path) -> Result<Self, DashboardError> {
        let path = path
            .canonicalize()
            .with_context(|| format!("resolving {}", path.display()))
            .map_err(|e| DashboardError::data_unavailable(path, &e))?;
        let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok();
        Ok(SourceKey { path, modified })
    }
}

// ---------------------------------------------------------------------------
// DatasetCache
// ---------------------------------------------------------------------------

/// Loaded tables memoized by [`SourceKey`]. Owned by the application state;
/// failed loads are never cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    options: LoadOptions,
    entries: HashMap<SourceKey, Arc<ReportTable>>,
}

impl DatasetCache {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            entries: HashMap::new(),
        }
    }

    /// Return the table for `path`, reading the file only if this exact
    /// version of it has not been loaded before.
    pub fn load(&mut self, path: &Path) -> Result<Arc<ReportTable>, DashboardError> {
        let key = SourceKey::for_path(path)?;
        if let Some(table) = self.entries.get(&key) {
            log::debug!("Serving {} from cache", key.path.display());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load_file(&key.path, &self.options)?);
        // Older versions of the same file are dead weight.
        self.entries.retain(|k, _| k.path != key.path);
        self.entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Number of cached sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
