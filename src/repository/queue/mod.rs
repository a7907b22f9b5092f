//! SQLite-backed download queue.

mod helpers;
mod insert;
mod pending;
mod stats;

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::warn;

use super::Result;

pub use insert::InsertOutcome;

/// Durable table of pending and ready downloads, keyed by relative file path.
#[derive(Debug, Clone)]
pub struct DownloadQueue {
    db_path: PathBuf,
}

impl DownloadQueue {
    /// Database filename used inside an output folder.
    pub const FILE_NAME: &'static str = "downloads.db";

    /// Open (and create if needed) the queue at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let queue = Self {
            db_path: db_path.to_path_buf(),
        };
        queue.init_schema()?;
        Ok(queue)
    }

    /// Open the queue stored in an output folder.
    pub fn in_folder(folder: &Path) -> Result<Self> {
        Self::open(&folder.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub(crate) fn connect(&self) -> Result<Connection> {
        super::connect(&self.db_path)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS downloads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                url TEXT NOT NULL UNIQUE,
                timestamp TEXT,
                file_path TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'ready')),
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_downloads_status
                ON downloads(status);
            "#,
        )?;

        // file_path is the dedup key. Older databases may hold duplicate
        // paths, in which case the queue still works without the index.
        if let Err(e) = conn.execute_batch(
            "CREATE UNIQUE INDEX IF NOT EXISTS ux_downloads_file_path ON downloads(file_path)",
        ) {
            warn!(
                "Could not create unique index on file_path in {}: {}",
                self.db_path.display(),
                e
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DownloadStatus;
    use tempfile::tempdir;

    fn queue() -> (DownloadQueue, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let queue = DownloadQueue::in_folder(dir.path()).unwrap();
        (queue, dir)
    }

    #[test]
    fn test_open_creates_database_file() {
        let dir = tempdir().unwrap();
        let queue = DownloadQueue::open(&dir.path().join("nested").join("q.db")).unwrap();
        assert!(queue.path().exists());

        // Reopening an existing database is fine.
        DownloadQueue::open(queue.path()).unwrap();
    }

    #[test]
    fn test_insert_is_idempotent_on_file_path() {
        let (queue, _dir) = queue();

        let first = queue.insert_pending(
            "testuser",
            "https://example.com/photo1.jpg",
            Some("2025-01-28, 10:00:00"),
            "testuser/2025-01-28_10-00-00.bin",
        );
        assert_eq!(first, InsertOutcome::Inserted);

        // Same file_path with a different URL is ignored.
        let dup = queue.insert_pending(
            "testuser",
            "https://example.com/photo1_alt.jpg",
            Some("2025-01-28, 10:00:00"),
            "testuser/2025-01-28_10-00-00.bin",
        );
        assert_eq!(dup, InsertOutcome::Ignored);
        assert!(dup.is_ok());
        assert!(!dup.is_inserted());

        assert_eq!(queue.stats().total, 1);
    }

    #[test]
    fn test_insert_same_tuple_twice_yields_one_row() {
        let (queue, _dir) = queue();
        for _ in 0..2 {
            queue.insert_pending("u", "https://example.com/x", None, "u/file.bin");
        }
        assert_eq!(queue.list_pending(None).len(), 1);
    }

    #[test]
    fn test_insert_duplicate_url_is_ignored() {
        let (queue, _dir) = queue();
        queue.insert_pending("u", "https://example.com/x", None, "u/a.bin");
        let outcome = queue.insert_pending("u", "https://example.com/x", None, "u/b.bin");
        assert_eq!(outcome, InsertOutcome::Ignored);
        assert_eq!(queue.stats().total, 1);
    }

    #[test]
    fn test_mark_ready_round_trip() {
        let (queue, _dir) = queue();
        queue.insert_pending("testuser", "https://example.com/1.jpg", None, "testuser/a.bin");
        queue.insert_pending("testuser", "https://example.com/2.jpg", None, "testuser/b.bin");

        let pending = queue.list_pending(None);
        assert_eq!(pending.len(), 2);
        let first = &pending[0];
        assert_eq!(first.status, DownloadStatus::Pending);

        assert!(queue.mark_ready(first.id, "testuser/images/a.jpg"));

        let fetched = queue.get(first.id).unwrap();
        assert_eq!(fetched.status, DownloadStatus::Ready);
        assert_eq!(fetched.file_path, "testuser/images/a.jpg");
        assert!(fetched.updated_at >= fetched.created_at);

        let still_pending = queue.list_pending(None);
        assert_eq!(still_pending.len(), 1);
        assert!(still_pending.iter().all(|r| r.id != first.id));
    }

    #[test]
    fn test_mark_ready_unknown_id() {
        let (queue, _dir) = queue();
        assert!(!queue.mark_ready(42, "nobody/x.jpg"));
    }

    #[test]
    fn test_list_pending_limit_and_order() {
        let (queue, _dir) = queue();
        for i in 0..5 {
            queue.insert_pending(
                "u",
                &format!("https://example.com/{}", i),
                None,
                &format!("u/{}.bin", i),
            );
        }

        let limited = queue.list_pending(Some(2));
        assert_eq!(limited.len(), 2);
        assert!(limited[0].id < limited[1].id);
        assert_eq!(limited[0].file_path, "u/0.bin");
        assert_eq!(queue.list_pending(None).len(), 5);
    }

    #[test]
    fn test_stats_total_is_pending_plus_ready() {
        let (queue, _dir) = queue();
        assert_eq!(queue.stats(), Default::default());

        for i in 0..4 {
            queue.insert_pending(
                "u",
                &format!("https://example.com/{}", i),
                Some("7/6/2025, 8:46:19 AM"),
                &format!("u/{}.bin", i),
            );
        }
        let pending = queue.list_pending(None);
        queue.mark_ready(pending[0].id, "u/images/0.jpg");
        queue.mark_ready(pending[1].id, "u/videos/1.mp4");

        let stats = queue.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.ready, 2);
        assert_eq!(stats.total, stats.pending + stats.ready);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (queue, _dir) = queue();
        assert!(queue.get(7).is_none());
    }

    #[test]
    fn test_storage_errors_degrade_to_defaults() {
        let (queue, dir) = queue();
        queue.insert_pending("u", "https://example.com/1", None, "u/1.bin");

        // Replace the database with a directory so every connection fails.
        std::fs::remove_file(queue.path()).unwrap();
        let _ = std::fs::remove_file(dir.path().join("downloads.db-wal"));
        let _ = std::fs::remove_file(dir.path().join("downloads.db-shm"));
        std::fs::create_dir(queue.path()).unwrap();

        assert!(queue.list_pending(None).is_empty());
        assert_eq!(queue.stats(), Default::default());
        assert!(!queue.mark_ready(1, "u/1.jpg"));
        assert_eq!(
            queue.insert_pending("u", "https://example.com/2", None, "u/2.bin"),
            InsertOutcome::Failed
        );
        assert!(queue.get(1).is_none());
    }
}
