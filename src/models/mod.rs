//! Data models for mediaferry.

mod download;
mod media;

pub use download::{DownloadRecord, DownloadStatus, QueueStats};
pub use media::MediaRecord;
