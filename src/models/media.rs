//! Media records produced by the link extractor.

use serde::Serialize;

/// One media entry found on a rendered media list.
///
/// `filename` is unique within the batch it was extracted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRecord {
    pub url: String,
    /// Display timestamp as shown by the source site.
    pub timestamp: Option<String>,
    pub filename: String,
}

impl MediaRecord {
    pub fn new(url: String, timestamp: Option<String>, filename: String) -> Self {
        Self {
            url,
            timestamp,
            filename,
        }
    }
}
