//! Media kind classification.

use std::path::Path;

/// Extensions sorted into `images/`.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Extensions sorted into `videos/`.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "flv"];

/// Media kinds used to sort downloaded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    /// Subdirectory this kind is sorted into, if any.
    pub fn subdir(&self) -> Option<&'static str> {
        match self {
            Self::Image => Some("images"),
            Self::Video => Some("videos"),
            Self::Other => None,
        }
    }

    /// Classify an extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Video
        } else {
            Self::Other
        }
    }

    /// Classify a file by its extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Other)
    }
}

/// Extension (with dot) for the media content types we know how to name.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let ct = content_type.to_lowercase();

    if ct.contains("image/jpeg") || ct.contains("image/jpg") {
        Some(".jpg")
    } else if ct.contains("image/png") {
        Some(".png")
    } else if ct.contains("video/mp4") {
        Some(".mp4")
    } else if ct.contains("image/gif") {
        Some(".gif")
    } else {
        None
    }
}
