//! Sorting a user's downloads into `images/` and `videos/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::utils::{unique_path, MediaKind};

/// Outcome of organizing one user directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeReport {
    pub moved_images: usize,
    pub moved_videos: usize,
    /// Left in place because the destination already had a file of that name.
    pub skipped_existing: usize,
    /// Files that are neither images nor videos.
    pub untouched: usize,
    pub failed: usize,
}

impl OrganizeReport {
    pub fn moved(&self) -> usize {
        self.moved_images + self.moved_videos
    }
}

/// Move a file, falling back to copy and delete across filesystems.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            debug!(
                "rename {} -> {} failed ({}), copying instead",
                from.display(),
                to.display(),
                rename_err
            );
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

/// Move a freshly downloaded file into its kind directory under `user_dir`.
///
/// Picks a unique name when the destination is taken. Returns the final
/// location, which is `path` itself for files that are neither images nor
/// videos.
pub fn move_into_kind_dir(path: &Path, user_dir: &Path) -> io::Result<PathBuf> {
    let Some(subdir) = MediaKind::from_path(path).subdir() else {
        return Ok(path.to_path_buf());
    };

    let dest_dir = user_dir.join(subdir);
    fs::create_dir_all(&dest_dir)?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "file has no name"))?;

    if path.parent() == Some(dest_dir.as_path()) {
        return Ok(path.to_path_buf());
    }

    let dest = unique_path(&dest_dir, file_name);
    move_file(path, &dest)?;
    Ok(dest)
}

/// Move top-level image and video files of `user_dir` into `images/` and `videos/`.
///
/// Subdirectories are not descended into. A file whose destination already
/// exists stays where it is. Per-file failures are logged and counted.
pub fn organize(user_dir: &Path) -> io::Result<OrganizeReport> {
    let images_dir = user_dir.join("images");
    let videos_dir = user_dir.join("videos");
    fs::create_dir_all(&images_dir)?;
    fs::create_dir_all(&videos_dir)?;

    let mut entries: Vec<PathBuf> = fs::read_dir(user_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    let mut report = OrganizeReport::default();

    for path in entries {
        let kind = MediaKind::from_path(&path);
        let dest_dir = match kind {
            MediaKind::Image => &images_dir,
            MediaKind::Video => &videos_dir,
            MediaKind::Other => {
                report.untouched += 1;
                continue;
            }
        };

        let Some(file_name) = path.file_name() else {
            report.untouched += 1;
            continue;
        };
        let dest = dest_dir.join(file_name);

        if dest.exists() {
            warn!(
                "Not moving {}: {} already exists",
                path.display(),
                dest.display()
            );
            report.skipped_existing += 1;
            continue;
        }

        match move_file(&path, &dest) {
            Ok(()) => match kind {
                MediaKind::Image => report.moved_images += 1,
                _ => report.moved_videos += 1,
            },
            Err(e) => {
                warn!("Failed to move {}: {}", path.display(), e);
                report.failed += 1;
            }
        }
    }

    info!(
        "Organized {}: {} images, {} videos, {} skipped",
        user_dir.display(),
        report.moved_images,
        report.moved_videos,
        report.skipped_existing
    );

    Ok(report)
}
