//! Filename resolution for downloaded media.

use url::Url;

use crate::utils::{extension_for_content_type, sanitize_filename};

const PLACEHOLDER_EXTENSION: &str = ".bin";

/// Name derived from the URL alone.
///
/// Uses the `filename` query parameter, then the last path segment when it
/// has an extension, then `file_<index>.bin`.
pub fn filename_from_url(url: &str, index: usize) -> String {
    if let Ok(parsed) = Url::parse(url) {
        if let Some((_, name)) = parsed
            .query_pairs()
            .find(|(k, v)| k == "filename" && !v.is_empty())
        {
            return name.into_owned();
        }

        if let Some(segment) = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
        {
            let decoded = urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string());
            if decoded.contains('.') {
                return decoded;
            }
        }
    }

    format!("file_{}{}", index, PLACEHOLDER_EXTENSION)
}

/// Prefer a non-empty hint, otherwise derive the name from the URL.
pub fn resolve_filename(hint: Option<&str>, url: &str, index: usize) -> String {
    match hint.map(str::trim) {
        Some(h) if !h.is_empty() => h.to_string(),
        _ => filename_from_url(url, index),
    }
}

/// Give extensionless or `.bin` names a real extension from the content type.
pub fn repair_extension(name: &str, content_type: Option<&str>) -> String {
    let needs_repair = !name.contains('.') || name.ends_with(PLACEHOLDER_EXTENSION);
    if !needs_repair {
        return name.to_string();
    }

    match content_type.and_then(extension_for_content_type) {
        Some(ext) => {
            let stem = name.strip_suffix(PLACEHOLDER_EXTENSION).unwrap_or(name);
            format!("{}{}", stem, ext)
        }
        None => name.to_string(),
    }
}

/// Full resolution: hint or URL, extension repair, sanitizing.
pub fn final_filename(
    hint: Option<&str>,
    url: &str,
    index: usize,
    content_type: Option<&str>,
) -> String {
    let name = resolve_filename(hint, url, index);
    sanitize_filename(&repair_extension(&name, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_query_parameter_wins() {
        assert_eq!(
            filename_from_url("https://cdn.example.com/dl/abc.jpg?filename=holiday.jpg", 1),
            "holiday.jpg"
        );
        // Empty parameter falls through to the path.
        assert_eq!(
            filename_from_url("https://cdn.example.com/dl/abc.jpg?filename=", 1),
            "abc.jpg"
        );
    }

    #[test]
    fn test_filename_from_path_segment() {
        assert_eq!(
            filename_from_url("https://cdn.example.com/v/t51/my%20clip.mp4?x=1", 3),
            "my clip.mp4"
        );
        assert_eq!(
            filename_from_url("https://cdn.example.com/media/12345", 4),
            "file_4.bin"
        );
        assert_eq!(filename_from_url("https://cdn.example.com/", 5), "file_5.bin");
        assert_eq!(filename_from_url("not a url", 6), "file_6.bin");
    }

    #[test]
    fn test_hint_takes_precedence() {
        assert_eq!(
            resolve_filename(
                Some("2025-07-06_08-46-19.bin"),
                "https://x.com/a.jpg?filename=b.jpg",
                1
            ),
            "2025-07-06_08-46-19.bin"
        );
        assert_eq!(
            resolve_filename(Some("  "), "https://x.com/a.jpg", 1),
            "a.jpg"
        );
        assert_eq!(resolve_filename(None, "https://x.com/a.jpg", 1), "a.jpg");
    }

    #[test]
    fn test_repair_extension() {
        assert_eq!(repair_extension("x.bin", Some("image/jpeg")), "x.jpg");
        assert_eq!(repair_extension("x.bin", Some("image/jpg")), "x.jpg");
        assert_eq!(repair_extension("x", Some("video/mp4")), "x.mp4");
        assert_eq!(repair_extension("x.bin", Some("image/png; charset=binary")), "x.png");
        assert_eq!(repair_extension("x.bin", Some("IMAGE/GIF")), "x.gif");
        assert_eq!(repair_extension("x.bin", Some("text/html")), "x.bin");
        assert_eq!(repair_extension("x.bin", None), "x.bin");
        assert_eq!(repair_extension("x.webp", Some("image/jpeg")), "x.webp");
    }

    #[test]
    fn test_final_filename_sanitizes() {
        assert_eq!(
            final_filename(None, "https://x.com/d?filename=a%3Ab%2Fc.bin", 1, Some("image/png")),
            "a_b_c.png"
        );
    }
}
