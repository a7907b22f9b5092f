//! Insertion of newly scraped work items.

use chrono::Utc;
use rusqlite::params;
use tracing::{debug, error};

use super::{DownloadQueue, Result};
use crate::models::DownloadStatus;

/// Result of queueing a media item.
///
/// `Ignored` means an equal `file_path` (or `url`) was already queued; it is
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Ignored,
    Failed,
}

impl InsertOutcome {
    /// The attempt completed without a storage error.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed)
    }

    /// A new row was created.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted)
    }
}

impl DownloadQueue {
    /// Insert a pending record unless its file path or URL is already queued.
    ///
    /// Returns whether a new row was created.
    pub fn try_insert_pending(
        &self,
        username: &str,
        url: &str,
        timestamp: Option<&str>,
        file_path: &str,
    ) -> Result<bool> {
        let conn = self.connect()?;
        let now = Utc::now().to_rfc3339();

        let changed = conn.execute(
            r#"
            INSERT OR IGNORE INTO downloads (
                username, url, timestamp, file_path, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
            params![
                username,
                url,
                timestamp,
                file_path,
                DownloadStatus::Pending.as_str(),
                now,
            ],
        )?;

        Ok(changed > 0)
    }

    /// Queue a media item as pending. Storage errors are logged and reported as `Failed`.
    pub fn insert_pending(
        &self,
        username: &str,
        url: &str,
        timestamp: Option<&str>,
        file_path: &str,
    ) -> InsertOutcome {
        match self.try_insert_pending(username, url, timestamp, file_path) {
            Ok(true) => InsertOutcome::Inserted,
            Ok(false) => {
                debug!("Already queued: {}", file_path);
                InsertOutcome::Ignored
            }
            Err(e) => {
                error!("Failed to queue {} ({}): {}", file_path, url, e);
                InsertOutcome::Failed
            }
        }
    }
}
