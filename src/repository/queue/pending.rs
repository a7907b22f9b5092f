//! Pending record lookup and the pending -> ready transition.

use chrono::Utc;
use rusqlite::params;
use tracing::error;

use super::helpers::{row_to_record, RECORD_COLUMNS};
use super::{DownloadQueue, Result};
use crate::models::{DownloadRecord, DownloadStatus};

impl DownloadQueue {
    /// Pending records in insertion order, optionally limited.
    pub fn try_list_pending(&self, limit: Option<usize>) -> Result<Vec<DownloadRecord>> {
        let conn = self.connect()?;
        // SQLite treats a negative LIMIT as unlimited.
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM downloads WHERE status = ?1 ORDER BY id ASC LIMIT ?2",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(
                params![DownloadStatus::Pending.as_str(), limit],
                row_to_record,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Pending records; empty on storage errors.
    pub fn list_pending(&self, limit: Option<usize>) -> Vec<DownloadRecord> {
        self.try_list_pending(limit).unwrap_or_else(|e| {
            error!("Failed to list pending downloads: {}", e);
            Vec::new()
        })
    }

    /// Look up a record by id.
    pub fn try_get(&self, id: i64) -> Result<Option<DownloadRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM downloads WHERE id = ?1",
            RECORD_COLUMNS
        ))?;
        super::super::to_option(stmt.query_row(params![id], row_to_record))
    }

    /// Record by id; `None` when missing or on storage errors.
    pub fn get(&self, id: i64) -> Option<DownloadRecord> {
        self.try_get(id).unwrap_or_else(|e| {
            error!("Failed to load download {}: {}", id, e);
            None
        })
    }

    /// Mark a record ready and store its final relative path.
    ///
    /// Returns whether a row was updated.
    pub fn try_mark_ready(&self, id: i64, relative_path: &str) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn.execute(
            r#"
            UPDATE downloads
            SET status = ?1, file_path = ?2, updated_at = ?3
            WHERE id = ?4
            "#,
            params![
                DownloadStatus::Ready.as_str(),
                relative_path,
                Utc::now().to_rfc3339(),
                id
            ],
        )?;
        Ok(changed > 0)
    }

    /// Mark a record ready; `false` when nothing was updated or on storage errors.
    pub fn mark_ready(&self, id: i64, relative_path: &str) -> bool {
        self.try_mark_ready(id, relative_path).unwrap_or_else(|e| {
            error!("Failed to mark download {} ready: {}", id, e);
            false
        })
    }
}
