//! Shared utility functions.
//!
//! This module contains reusable utilities used across the codebase:
//! - `filename`: filename sanitizing, extension handling and collision-free paths
//! - `html`: HTML entity decoding for scraped attribute values
//! - `mime`: media kind classification and content-type extensions

mod filename;
mod html;
mod mime;

pub use filename::{
    relative_path, sanitize_filename, split_extension, unique_path, user_dir_name, with_suffix,
};
pub use html::html_unescape;
pub use mime::{extension_for_content_type, MediaKind, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
