//! Download worker.
//!
//! Drains pending records from the download queue, saves each file under its
//! user's directory, sorts it into `images/` or `videos/` and marks the record
//! ready. Separated from UI concerns - emits progress events instead.

mod fetch;
mod filename;
mod types;

pub use fetch::{HttpFetcher, CHUNK_SIZE};
pub use filename::{filename_from_url, final_filename, repair_extension, resolve_filename};
pub use types::{DownloadConfig, DownloadSummary, FetchError, WorkerError};

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::models::DownloadRecord;
use crate::repository::DownloadQueue;
use crate::services::organize::{move_into_kind_dir, organize};
use crate::services::progress::ProgressReporter;
use crate::services::run_log::RunLog;
use crate::utils::{relative_path, user_dir_name};

/// Service for downloading pending records from the queue.
pub struct DownloadService {
    queue: Arc<DownloadQueue>,
    fetcher: HttpFetcher,
    folder: PathBuf,
}

impl DownloadService {
    pub fn new(queue: Arc<DownloadQueue>, fetcher: HttpFetcher, folder: impl Into<PathBuf>) -> Self {
        Self {
            queue,
            fetcher,
            folder: folder.into(),
        }
    }

    /// Build the service and its HTTP client from settings.
    pub fn from_config(queue: Arc<DownloadQueue>, config: &DownloadConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::from_config(config)?;
        Ok(Self::new(queue, fetcher, config.folder.clone()))
    }

    /// Download up to `limit` pending records, one at a time in queue order.
    ///
    /// Failed records stay pending for the next run.
    pub async fn run(&self, limit: Option<usize>, progress: ProgressReporter) -> DownloadSummary {
        let log = RunLog::in_folder(&self.folder);
        log.start("Download worker");

        let pending = self.queue.list_pending(limit);
        let total = pending.len();
        let mut summary = DownloadSummary {
            total,
            ..Default::default()
        };

        if pending.is_empty() {
            info!("No pending downloads");
            log.write("No pending downloads");
        }

        let mut touched_users: BTreeSet<PathBuf> = BTreeSet::new();

        for (i, record) in pending.iter().enumerate() {
            let index = i + 1;
            let user_dir = self.folder.join(user_dir_name(&record.username));
            touched_users.insert(user_dir.clone());

            progress
                .started(
                    i,
                    total,
                    &record.username,
                    format!("Downloading ({}/{}): {}", index, total, record.url),
                )
                .await;

            match self.download_one(record, index, &log).await {
                Ok(rel) => {
                    summary.succeeded += 1;
                    log.write(&format!("OK ID={}, {}: {}", record.id, record.username, rel));
                    progress.succeeded(index, total, &record.username, rel).await;
                }
                Err(e) => {
                    summary.failed += 1;
                    log.write(&format!("FAILED ID={}, {}: {}", record.id, record.username, e));
                    progress
                        .failed(index, total, &record.username, format!("{}: {}", record.url, e))
                        .await;
                }
            }
        }

        for user_dir in touched_users.iter().filter(|d| d.is_dir()) {
            if let Err(e) = organize(user_dir) {
                warn!("Failed to organize {}: {}", user_dir.display(), e);
                log.write(&format!("Could not organize {}: {}", user_dir.display(), e));
            }
        }

        summary.stats = self.queue.stats();
        log.write(&format!(
            "Result: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        ));
        log.finish(Some(summary.stats));

        info!(
            "Download batch finished: {} succeeded, {} failed ({})",
            summary.succeeded, summary.failed, summary.stats
        );
        progress
            .finished(total, summary.succeeded, summary.failed)
            .await;

        summary
    }

    /// Fetch, sort and mark one record. Returns the stored relative path.
    async fn download_one(
        &self,
        record: &DownloadRecord,
        index: usize,
        log: &RunLog,
    ) -> Result<String, WorkerError> {
        let user_dir = self.folder.join(user_dir_name(&record.username));

        let saved = self
            .fetcher
            .fetch(&record.url, &user_dir, Some(record.file_name()), index)
            .await
            .inspect_err(|e| warn!("Download failed for {}: {}", record.url, e))?;

        let final_path = match move_into_kind_dir(&saved, &user_dir) {
            Ok(path) => path,
            Err(e) => {
                warn!("Could not move {}: {}", saved.display(), e);
                log.write(&format!(
                    "ID={}, {}: could not move file: {}",
                    record.id, record.username, e
                ));
                saved
            }
        };

        let rel = relative_path(&final_path, &self.folder);
        if !self.queue.mark_ready(record.id, &rel) {
            return Err(WorkerError::MarkReady { path: rel });
        }

        Ok(rel)
    }
}
