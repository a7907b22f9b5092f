//! Direct downloads of pasted links, bypassing the queue.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::services::download::HttpFetcher;
use crate::services::organize::{organize, OrganizeReport};
use crate::services::progress::ProgressReporter;
use crate::services::run_log::RunLog;

/// Counts for a direct link batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDownloadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub saved: Vec<PathBuf>,
    /// Present when the destination was organized afterwards.
    pub organized: Option<OrganizeReport>,
}

/// Downloads a list of URLs straight into one directory.
pub struct LinkDownloadService {
    fetcher: HttpFetcher,
    /// Where the run log is written.
    folder: PathBuf,
    dest_dir: PathBuf,
}

impl LinkDownloadService {
    pub fn new(fetcher: HttpFetcher, folder: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            folder: folder.into(),
            dest_dir: dest_dir.into(),
        }
    }

    /// Fetch every link in order, then sort the destination by media type.
    pub async fn run(&self, links: &[String], progress: ProgressReporter) -> LinkDownloadSummary {
        let log = RunLog::in_folder(&self.folder);
        log.start("Link download");

        let total = links.len();
        let mut summary = LinkDownloadSummary {
            total,
            ..Default::default()
        };

        for (i, url) in links.iter().enumerate() {
            let index = i + 1;
            progress
                .started(i, total, url, format!("Downloading ({}/{})", index, total))
                .await;

            match self.fetcher.fetch(url, &self.dest_dir, None, index).await {
                Ok(path) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    summary.succeeded += 1;
                    log.write(&format!("OK {} -> {}", url, name));
                    progress
                        .succeeded(index, total, url, format!("Saved {}", name))
                        .await;
                    summary.saved.push(path);
                }
                Err(e) => {
                    warn!("Download failed for {}: {}", url, e);
                    summary.failed += 1;
                    log.write(&format!("FAILED {}: {}", url, e));
                    progress.failed(index, total, url, e.to_string()).await;
                }
            }
        }

        if self.dest_dir.is_dir() {
            match organize(&self.dest_dir) {
                Ok(report) => summary.organized = Some(report),
                Err(e) => {
                    warn!("Failed to organize {}: {}", self.dest_dir.display(), e);
                    log.write(&format!("Could not organize: {}", e));
                }
            }
        }

        log.write(&format!(
            "Result: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        ));
        log.finish(None);
        info!(
            "Link batch finished: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        );
        progress
            .finished(total, summary.succeeded, summary.failed)
            .await;

        summary
    }
}
