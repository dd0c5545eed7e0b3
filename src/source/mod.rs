//! Snapshot source abstraction.
//!
//! A source produces one [`DashboardSnapshot`] per fetch. The dashboard
//! service is the normal source; a JSON file and a synthetic generator are
//! available for offline use and demos.

mod file;
mod http;
mod synthetic;

pub use file::FileSource;
pub use http::HttpSource;
pub use pulsewatch_client::FetchOptions;
pub use synthetic::{synthesize, SyntheticSource};

use std::fmt::Debug;
use std::path::PathBuf;

use async_trait::async_trait;
use pulsewatch_client::ClientError;
use pulsewatch_types::DashboardSnapshot;
use thiserror::Error;

/// Errors returned by a [`SnapshotSource`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The dashboard service could not be reached or answered with an error.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A snapshot file could not be read.
    #[error("Read error: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot file did not contain a valid payload.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The fetch task died before producing a result.
    #[error("Fetch aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    /// HTTP status behind the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Client(e) => e.status(),
            _ => None,
        }
    }
}

/// Trait for fetching dashboard snapshots.
///
/// # Example
///
/// ```no_run
/// use pulsewatch::source::{FetchOptions, FileSource, SnapshotSource};
///
/// # tokio_test::block_on(async {
/// let source = FileSource::new("dashboard.json");
/// let snapshot = source.fetch(1, FetchOptions::default()).await.unwrap();
/// println!("score inputs: {:?}", snapshot.summary);
/// # });
/// ```
#[async_trait]
pub trait SnapshotSource: Send + Sync + Debug {
    /// Fetch the current snapshot for a user.
    ///
    /// With `options.force_fresh` any cache the source keeps is bypassed.
    async fn fetch(
        &self,
        user_id: u64,
        options: FetchOptions,
    ) -> Result<DashboardSnapshot, FetchError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;
}
