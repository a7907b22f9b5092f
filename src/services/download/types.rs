//! Download service types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::models::QueueStats;
use crate::scrapers::http_client::DEFAULT_TIMEOUT;

/// Errors raised while fetching a single URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a queued record did not become ready.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The file is on disk but the queue row is still pending.
    #[error("saved to {path} but could not mark ready")]
    MarkReady { path: String },
}

/// Configuration for download services.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Output folder holding the queue, the run log and one directory per user.
    pub folder: PathBuf,
    pub request_timeout: Duration,
    /// None for a browser user agent, "impersonate", or a custom string.
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
}

impl DownloadConfig {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            request_timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            proxy: None,
        }
    }
}

/// Result of a download worker batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Queue totals after the batch.
    pub stats: QueueStats,
}
