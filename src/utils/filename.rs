//! Filename helpers shared by the extractor, the fetcher and the organizer.

use std::path::{Path, PathBuf};

/// Replace characters that are invalid in filenames with underscores.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect()
}

/// Split a filename into stem and extension (the extension keeps its dot).
///
/// Leading dots belong to the stem, so `.profile` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(pos) => name.split_at(stem_start + pos),
        None => (name, ""),
    }
}

/// Insert `_<n>` between stem and extension.
pub fn with_suffix(name: &str, n: usize) -> String {
    let (stem, ext) = split_extension(name);
    format!("{}_{}{}", stem, n, ext)
}

/// First path in `dir` named `filename`, `filename_1`, `filename_2`, ... that does not exist.
pub fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let mut counter = 1;
    loop {
        let candidate = dir.join(with_suffix(filename, counter));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Directory name used for a username inside the output folder.
pub fn user_dir_name(username: &str) -> String {
    let name = sanitize_filename(username.trim());
    match name.as_str() {
        "" | "." | ".." => "_".repeat(name.len().max(1)),
        _ => name,
    }
}

/// Path of `path` relative to `base`, always joined with `/`.
///
/// Paths outside `base` are returned whole.
pub fn relative_path(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
