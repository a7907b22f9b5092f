//! Aggregate queue statistics.

use tracing::error;

use super::{DownloadQueue, Result};
use crate::models::QueueStats;

impl DownloadQueue {
    /// Count records by status.
    pub fn try_stats(&self) -> Result<QueueStats> {
        let conn = self.connect()?;

        let (total, pending, ready): (i64, i64, i64) = conn.query_row(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'ready' THEN 1 ELSE 0 END), 0)
            FROM downloads
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(QueueStats {
            total: total as u64,
            pending: pending as u64,
            ready: ready as u64,
        })
    }

    /// Queue statistics; all zero on storage errors.
    pub fn stats(&self) -> QueueStats {
        self.try_stats().unwrap_or_else(|e| {
            error!("Failed to read queue stats: {}", e);
            QueueStats::default()
        })
    }
}
