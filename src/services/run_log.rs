//! Human-readable batch log kept next to the downloads.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::warn;

use crate::models::QueueStats;

const BANNER_WIDTH: usize = 50;

/// Append-only log at `<folder>/log.txt`.
///
/// Lines are `[YYYY-MM-DD HH:MM:SS] message`. Write failures are reported
/// through tracing and otherwise ignored.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub const FILE_NAME: &'static str = "log.txt";

    pub fn in_folder(folder: &Path) -> Self {
        Self {
            path: folder.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn now() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Append one timestamped line.
    pub fn write(&self, message: &str) {
        let line = format!("[{}] {}\n", Self::now(), message);
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(line.as_bytes()));

        if let Err(e) = result {
            warn!("Could not write run log {}: {}", self.path.display(), e);
        }
    }

    fn banner(&self) {
        self.write(&"=".repeat(BANNER_WIDTH));
    }

    /// Opening banner for a batch.
    pub fn start(&self, what: &str) {
        self.banner();
        self.write(&format!("{} started at {}", what, Self::now()));
        self.banner();
    }

    /// Queue totals followed by the closing banner.
    pub fn finish(&self, stats: Option<QueueStats>) {
        if let Some(stats) = stats {
            self.write(&format!("DB stats: {}", stats));
        }
        self.banner();
        self.write(&format!("Finished at {}", Self::now()));
        self.banner();
    }
}
