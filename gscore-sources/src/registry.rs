use std::path::Path;

use fxhash::FxHashMap;
use log::{debug, info};

use crate::bam::BamSource;
use crate::error::{Result, SourceError};
use crate::traits::SourceHandle;

///
/// Open a score source, choosing the reader from the file extension.
///
/// Only indexed BAM files are read from disk. In-memory sources are placed in
/// a [`SourceRegistry`] with [`SourceRegistry::insert`] instead.
///
pub fn open_source(path: &str) -> Result<SourceHandle> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("bam") => Ok(Box::new(BamSource::open(path)?)),
        _ => Err(SourceError::SourceOpenError {
            path: path.to_string(),
            reason: "unsupported source type".to_string(),
        }),
    }
}

///
/// Owned cache of open score sources keyed by path.
///
/// Repeated queries against the same path reuse one handle. Handles live until
/// they are invalidated, [`SourceRegistry::close_all`] is called, or the
/// registry is dropped.
///
#[derive(Default)]
pub struct SourceRegistry {
    handles: FxHashMap<String, SourceHandle>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Get the cached handle for `path`, opening it on first use.
    ///
    pub fn open(&mut self, path: &str) -> Result<&mut SourceHandle> {
        if !self.handles.contains_key(path) {
            let handle = open_source(path)?;
            info!("Caching score source {}", path);
            self.handles.insert(path.to_string(), handle);
        }

        self.handles
            .get_mut(path)
            .ok_or_else(|| SourceError::SourceOpenError {
                path: path.to_string(),
                reason: "handle vanished from registry".to_string(),
            })
    }

    ///
    /// Register an already open handle under its own path, replacing any
    /// handle cached for that path.
    ///
    pub fn insert(&mut self, handle: SourceHandle) {
        let key = handle.path().to_string();
        self.handles.insert(key, handle);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.handles.contains_key(path)
    }

    /// Close and forget the handle cached for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &str) -> bool {
        let removed = self.handles.remove(path).is_some();
        if removed {
            debug!("Closed score source {}", path);
        }
        removed
    }

    pub fn close_all(&mut self) {
        if !self.handles.is_empty() {
            debug!("Closing {} score sources", self.handles.len());
        }
        self.handles.clear();
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for SourceRegistry {
    fn drop(&mut self) {
        self.close_all();
    }
}
