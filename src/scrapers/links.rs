//! Free-text link extraction for direct downloads.
//!
//! Accepts anything a user might paste (raw URLs, HTML snippets, copied page
//! source) and returns the http(s) links in first-seen order.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::utils::html_unescape;

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)(?:href|src)=["'](.*?)["']"#).unwrap())
}

fn absolute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)https?://[^\s"'<>]+"#).unwrap())
}

fn protocol_relative_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"//[^\s"'<>]+"#).unwrap())
}

/// Clean up a candidate URL. Returns `None` unless it is http(s).
///
/// Entities are expected to be decoded already; see [`normalize_raw_url`].
pub fn normalize_url(candidate: &str) -> Option<String> {
    let mut url = candidate.trim().to_string();
    if url.starts_with("//") {
        url = format!("https:{}", url);
    }

    let url = url
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_end_matches(|c| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')' | '"' | '\''));

    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(url.to_string())
    } else {
        None
    }
}

/// Decode HTML entities, then [`normalize_url`].
pub fn normalize_raw_url(candidate: &str) -> Option<String> {
    normalize_url(&html_unescape(candidate))
}

/// Extract unique http(s) links from free text.
///
/// Candidates come from `href`/`src` attribute values first, then bare
/// absolute URLs, then protocol-relative `//host/...` runs.
pub fn parse_links(text: &str) -> Vec<String> {
    let mut candidates: Vec<&str> = Vec::new();

    candidates.extend(
        attr_regex()
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str())),
    );
    candidates.extend(absolute_regex().find_iter(text).map(|m| m.as_str()));

    // `https://host` contains `//host`; only take runs not preceded by a scheme colon.
    candidates.extend(
        protocol_relative_regex()
            .find_iter(text)
            .filter(|m| !text[..m.start()].ends_with(':'))
            .map(|m| m.as_str()),
    );

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(normalize_raw_url)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
