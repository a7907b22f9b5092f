//! Organize command.

use std::path::Path;

use anyhow::Context;

use crate::cli::icons::{dim_arrow, success, warn};
use crate::services::organize;

/// Sort one user directory by media type.
pub fn cmd_organize(dir: &Path) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let report =
        organize(dir).with_context(|| format!("Failed to organize {}", dir.display()))?;

    println!(
        "{} Moved {} image(s) and {} video(s)",
        success(),
        report.moved_images,
        report.moved_videos
    );
    if report.skipped_existing > 0 {
        println!(
            "  {} {} file(s) left in place: destination already exists",
            warn(),
            report.skipped_existing
        );
    }
    if report.failed > 0 {
        println!("  {} {} file(s) could not be moved", warn(), report.failed);
    }
    if report.untouched > 0 {
        println!("  {} {} other file(s) untouched", dim_arrow(), report.untouched);
    }

    Ok(())
}
