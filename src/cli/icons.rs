//! Console icons shared by every command.

use console::{style, StyledObject};

use crate::services::EventKind;

/// Green check.
pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

/// Cyan arrow for progress lines.
pub fn info() -> StyledObject<&'static str> {
    style("→").cyan()
}

/// Yellow bang.
pub fn warn() -> StyledObject<&'static str> {
    style("!").yellow()
}

/// Red cross.
pub fn error() -> StyledObject<&'static str> {
    style("✗").red()
}

/// Dim arrow for secondary info.
pub fn dim_arrow() -> StyledObject<&'static str> {
    style("→").dim()
}

/// Icon for a progress event outcome.
pub fn for_event(kind: EventKind) -> StyledObject<&'static str> {
    match kind {
        EventKind::Succeeded => success(),
        EventKind::Skipped => warn(),
        EventKind::Failed => error(),
        EventKind::Started | EventKind::Info => info(),
    }
}
