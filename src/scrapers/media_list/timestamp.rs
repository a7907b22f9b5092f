//! Deterministic filenames from displayed post timestamps.

use chrono::NaiveDateTime;

use crate::utils::sanitize_filename;

/// Timestamp layouts shown by mirror sites, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y, %I:%M:%S %p",
    "%d/%m/%Y, %H:%M:%S",
    "%Y-%m-%d, %H:%M:%S",
];

/// Name used when an entry carries no timestamp.
pub const FALLBACK_FILENAME: &str = "file.bin";

/// Placeholder extension until the download reveals the real type.
pub const PLACEHOLDER_EXTENSION: &str = ".bin";

/// Parse a displayed timestamp with the known layouts.
pub fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    let timestamp = timestamp.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(timestamp, fmt).ok())
}

/// Map a timestamp to `YYYY-MM-DD_HH-MM-SS.bin`.
///
/// Unparseable values are sanitized and used verbatim.
pub fn timestamp_to_filename(timestamp: Option<&str>) -> String {
    let timestamp = match timestamp {
        Some(t) if !t.trim().is_empty() => t,
        _ => return FALLBACK_FILENAME.to_string(),
    };

    match parse_timestamp(timestamp) {
        Some(dt) => format!("{}{}", dt.format("%Y-%m-%d_%H-%M-%S"), PLACEHOLDER_EXTENSION),
        None => format!("{}{}", sanitize_filename(timestamp), PLACEHOLDER_EXTENSION),
    }
}
