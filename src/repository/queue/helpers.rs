//! Row mapping for the download queue.

use rusqlite::types::Type;
use rusqlite::Row;

use crate::models::{DownloadRecord, DownloadStatus};
use crate::repository::parse_datetime;

/// Columns selected by every record query, in `row_to_record` order.
pub(super) const RECORD_COLUMNS: &str =
    "id, username, url, timestamp, file_path, status, created_at, updated_at";

#[derive(Debug, thiserror::Error)]
#[error("unknown download status: {0}")]
struct UnknownStatus(String);

/// Parse a queue row into a DownloadRecord.
pub(super) fn row_to_record(row: &Row) -> rusqlite::Result<DownloadRecord> {
    let status_str: String = row.get(5)?;
    let status = DownloadStatus::from_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(UnknownStatus(status_str)))
    })?;

    Ok(DownloadRecord {
        id: row.get(0)?,
        username: row.get(1)?,
        url: row.get(2)?,
        timestamp: row.get(3)?,
        file_path: row.get(4)?,
        status,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
        updated_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}
