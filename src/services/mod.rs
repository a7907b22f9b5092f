//! Service layer: the batch pipelines behind each command.
//!
//! Services are separated from UI concerns and report through
//! [`progress::ProgressReporter`], so the CLI (or anything else) owns
//! presentation.

pub mod download;
pub mod links;
pub mod organize;
pub mod progress;
pub mod run_log;
pub mod scrape;

pub use download::{
    DownloadConfig, DownloadService, DownloadSummary, FetchError, HttpFetcher, WorkerError,
};
pub use links::{LinkDownloadService, LinkDownloadSummary};
pub use organize::{organize, OrganizeReport};
pub use progress::{EventKind, Phase, ProgressEvent, ProgressReporter};
pub use run_log::RunLog;
pub use scrape::{ScrapeService, ScrapeSummary};
