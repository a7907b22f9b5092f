//! HTML entity decoding.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn entity_regex() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| {
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap()
    })
}

/// Decode the character references that show up in scraped markup.
///
/// Unknown named entities are left untouched.
pub fn html_unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    entity_regex()
        .replace_all(s, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_unescape_basic() {
        assert_eq!(html_unescape("hello"), "hello");
        assert_eq!(html_unescape("a &amp; b"), "a & b");
        assert_eq!(html_unescape("&lt;p&gt;"), "<p>");
        assert_eq!(html_unescape("&quot;x&quot;"), "\"x\"");
    }

    #[test]
    fn test_html_unescape_numeric() {
        assert_eq!(html_unescape("it&#39;s"), "it's");
        assert_eq!(html_unescape("&#x2F;path"), "/path");
    }

    #[test]
    fn test_html_unescape_query_string() {
        assert_eq!(
            html_unescape("https://cdn.example.com/v.mp4?a=1&amp;b=2"),
            "https://cdn.example.com/v.mp4?a=1&b=2"
        );
    }

    #[test]
    fn test_html_unescape_unknown_entity_kept() {
        assert_eq!(html_unescape("&bogus; &amp"), "&bogus; &amp");
    }
}
