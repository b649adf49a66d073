//! Append-only identifier set persisted as a JSON file.
//!
//! The file is rewritten in full on every mutation:
//!
//! ```json
//! { "timestamp": "2024-01-01T00:00:00Z", "count": 2, "ids": ["a", "b"] }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk representation.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    timestamp: DateTime<Utc>,
    count: usize,
    ids: Vec<String>,
}

/// Identifier set backed by a JSON file.
pub struct IdSet {
    name: &'static str,
    path: PathBuf,
    ids: Mutex<HashSet<String>>,
}

impl IdSet {
    /// Open the set at `path`.
    ///
    /// A missing file yields an empty set. An unreadable or malformed file is
    /// logged and also yields an empty set.
    pub async fn open(name: &'static str, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = match read_record(&path).await {
            Ok(Some(record)) => record.ids.into_iter().collect(),
            Ok(None) => HashSet::new(),
            Err(e) => {
                warn!("Could not load {} set, starting empty: {}", name, e);
                HashSet::new()
            }
        };

        debug!("Loaded {} set with {} ids", name, ids.len());

        Self {
            name,
            path,
            ids: Mutex::new(ids),
        }
    }

    /// Insert `id`. Returns `true` if it was not present before.
    ///
    /// The new id stays in memory even if persisting it fails.
    pub async fn insert(&self, id: &str) -> bool {
        let mut ids = self.ids.lock().await;
        if !ids.insert(id.to_string()) {
            return false;
        }

        if let Err(e) = write_record(&self.path, &ids).await {
            warn!("Failed to persist {} set: {}", self.name, e);
        }
        true
    }

    #[cfg(test)]
    pub async fn contains(&self, id: &str) -> bool {
        self.ids.lock().await.contains(id)
    }

    pub async fn len(&self) -> usize {
        self.ids.lock().await.len()
    }

    /// Snapshot of all ids, sorted.
    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.lock().await.iter().cloned().collect();
        ids.sort();
        ids
    }
}

async fn read_record(path: &Path) -> Result<Option<Record>, StoreError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })
}

async fn write_record(path: &Path, ids: &HashSet<String>) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut sorted: Vec<String> = ids.iter().cloned().collect();
    sorted.sort();
    let record = Record {
        timestamp: Utc::now(),
        count: sorted.len(),
        ids: sorted,
    };

    let json = serde_json::to_vec_pretty(&record).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}
