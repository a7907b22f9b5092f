//! Download queue models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a queued download. Records only ever move from pending to ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    Pending,
    Ready,
}

impl DownloadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "ready" => Some(Self::Ready),
            _ => None,
        }
    }
}

impl std::fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted download work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRecord {
    pub id: i64,
    pub username: String,
    pub url: String,
    pub timestamp: Option<String>,
    /// Path relative to the output folder, `/`-separated. Unique across the queue.
    pub file_path: String,
    pub status: DownloadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DownloadRecord {
    /// Last component of the stored relative path.
    pub fn file_name(&self) -> &str {
        self.file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_path)
    }

    pub fn is_pending(&self) -> bool {
        self.status == DownloadStatus::Pending
    }
}

/// Aggregate queue counts. `total == pending + ready`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub total: u64,
    pub pending: u64,
    pub ready: u64,
}

impl std::fmt::Display for QueueStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total={}, Pending={}, Ready={}",
            self.total, self.pending, self.ready
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file_path: &str) -> DownloadRecord {
        DownloadRecord {
            id: 1,
            username: "alice".to_string(),
            url: "https://example.com/a.jpg".to_string(),
            timestamp: None,
            file_path: file_path.to_string(),
            status: DownloadStatus::Pending,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [DownloadStatus::Pending, DownloadStatus::Ready] {
            assert_eq!(DownloadStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(DownloadStatus::from_str("failed"), None);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(record("alice/images/a.jpg").file_name(), "a.jpg");
        assert_eq!(record("a.jpg").file_name(), "a.jpg");
        assert_eq!(record("alice\\b.bin").file_name(), "b.bin");
    }

    #[test]
    fn test_stats_display() {
        let stats = QueueStats {
            total: 3,
            pending: 1,
            ready: 2,
        };
        assert_eq!(stats.to_string(), "Total=3, Pending=1, Ready=2");
    }
}
