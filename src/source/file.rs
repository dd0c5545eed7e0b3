//! File-based snapshot source.
//!
//! Reads a dashboard payload (the same JSON the service returns) from disk.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use pulsewatch_client::wire::DashboardPayload;
use pulsewatch_types::DashboardSnapshot;

use super::{FetchError, FetchOptions, SnapshotSource};

/// A source that reads dashboard payloads from a JSON file.
///
/// The source tracks the file's modification time and serves the cached
/// snapshot until the file changes. A forced fetch always re-reads.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    cache: Mutex<Option<CachedSnapshot>>,
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    modified: SystemTime,
    user_id: u64,
    snapshot: DashboardSnapshot,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            cache: Mutex::new(None),
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, source: std::io::Error) -> FetchError {
        FetchError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn cached(&self, user_id: u64, modified: Option<SystemTime>) -> Option<DashboardSnapshot> {
        let cache = self.cache.lock();
        let cached = cache.as_ref()?;
        (Some(cached.modified) == modified && cached.user_id == user_id)
            .then(|| cached.snapshot.clone())
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(
        &self,
        user_id: u64,
        options: FetchOptions,
    ) -> Result<DashboardSnapshot, FetchError> {
        let modified = tokio::fs::metadata(&self.path)
            .await
            .ok()
            .and_then(|m| m.modified().ok());

        if !options.force_fresh {
            if let Some(snapshot) = self.cached(user_id, modified) {
                tracing::debug!(path = %self.path.display(), "file unchanged, serving cached snapshot");
                return Ok(snapshot);
            }
        }

        let content = tokio::fs::read(&self.path).await.map_err(|e| self.read_error(e))?;
        let payload =
            DashboardPayload::from_slice(&content).map_err(|e| FetchError::Parse(e.to_string()))?;
        let snapshot = payload.into_snapshot(user_id, Utc::now());

        if let Some(modified) = modified {
            *self.cache.lock() = Some(CachedSnapshot {
                modified,
                user_id,
                snapshot: snapshot.clone(),
            });
        }

        Ok(snapshot)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
