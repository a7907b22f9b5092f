//! Media list extraction, one parser per mirror site.

mod gramsnap;
mod timestamp;

pub use gramsnap::GramsnapParser;
pub use timestamp::{parse_timestamp, timestamp_to_filename, FALLBACK_FILENAME};

use std::collections::{HashMap, HashSet};

use crate::models::MediaRecord;
use crate::scrapers::browser::SiteProfile;
use crate::utils::with_suffix;

/// Source used when none is configured.
pub const DEFAULT_SOURCE: &str = GramsnapParser::SOURCE_ID;

/// Turns a rendered media list into media records.
///
/// Implementations never fail: markup they cannot make sense of yields an
/// empty list.
pub trait MediaListParser: Send + Sync {
    /// Identifier used on the command line and in configuration.
    fn source_id(&self) -> &'static str;

    /// Where the renderer finds this source's media list.
    fn site_profile(&self) -> SiteProfile;

    /// Extract records with batch-unique filenames.
    fn extract_media(&self, html: &str) -> Vec<MediaRecord>;
}

/// Identifiers of every known source.
pub fn available_sources() -> &'static [&'static str] {
    &[GramsnapParser::SOURCE_ID]
}

/// Look up the parser for a source id (case-insensitive).
pub fn parser_for(source_id: &str) -> Option<Box<dyn MediaListParser>> {
    match source_id.trim().to_lowercase().as_str() {
        GramsnapParser::SOURCE_ID => Some(Box::new(GramsnapParser::new())),
        _ => None,
    }
}

/// Make filenames unique within a batch.
///
/// The first occurrence keeps its name; later ones become `name_2.ext`,
/// `name_3.ext`, ... in encounter order, skipping names already taken.
pub fn resolve_collisions(records: &mut [MediaRecord]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();

    for record in records.iter_mut() {
        let base = record.filename.clone();
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;

        let mut name = if *count == 1 {
            base.clone()
        } else {
            with_suffix(&base, *count)
        };

        while taken.contains(&name) {
            *count += 1;
            name = with_suffix(&base, *count);
        }

        taken.insert(name.clone());
        record.filename = name;
    }
}
