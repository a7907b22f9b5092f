//! Parser for gramsnap.com media lists.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::timestamp::timestamp_to_filename;
use super::{resolve_collisions, MediaListParser};
use crate::models::MediaRecord;
use crate::scrapers::browser::SiteProfile;
use crate::scrapers::links::normalize_url;

const CONTAINER_SELECTOR: &str = "div.media-content__info";
const LINK_SELECTOR: &str = "a, img, video, source";
const TIME_SELECTOR: &str = "p.media-content__meta-time";

/// Attributes that may carry the media URL, in priority order.
const URL_ATTRIBUTES: &[&str] = &["href", "src", "data-src"];

/// Extracts media entries from gramsnap's `ul.profile-media-list` markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct GramsnapParser;

impl GramsnapParser {
    pub const SOURCE_ID: &'static str = "gramsnap";

    pub fn new() -> Self {
        Self
    }

    /// First usable http(s) URL among the container's link-bearing descendants.
    fn extract_url(container: ElementRef<'_>, links: &Selector) -> Option<String> {
        container.select(links).find_map(|el| {
            let value = URL_ATTRIBUTES
                .iter()
                .filter_map(|attr| el.value().attr(attr))
                .find(|v| !v.is_empty())?;
            normalize_url(value)
        })
    }

    fn extract_timestamp(container: ElementRef<'_>, time: &Selector) -> Option<String> {
        container
            .select(time)
            .next()
            .and_then(|p| p.value().attr("title"))
            .map(|t| t.to_string())
            .filter(|t| !t.trim().is_empty())
    }
}

impl MediaListParser for GramsnapParser {
    fn source_id(&self) -> &'static str {
        Self::SOURCE_ID
    }

    fn site_profile(&self) -> SiteProfile {
        SiteProfile::gramsnap()
    }

    fn extract_media(&self, html: &str) -> Vec<MediaRecord> {
        if html.trim().is_empty() {
            return Vec::new();
        }

        let (containers, links, time) = match (
            Selector::parse(CONTAINER_SELECTOR),
            Selector::parse(LINK_SELECTOR),
            Selector::parse(TIME_SELECTOR),
        ) {
            (Ok(c), Ok(l), Ok(t)) => (c, l, t),
            _ => {
                warn!("Invalid media list selectors");
                return Vec::new();
            }
        };

        let document = Html::parse_fragment(html);
        let mut records = Vec::new();

        for container in document.select(&containers) {
            let Some(url) = Self::extract_url(container, &links) else {
                debug!("Skipping media entry without a usable URL");
                continue;
            };

            let timestamp = Self::extract_timestamp(container, &time);
            let filename = timestamp_to_filename(timestamp.as_deref());
            records.push(MediaRecord::new(url, timestamp, filename));
        }

        resolve_collisions(&mut records);
        debug!("Extracted {} media records", records.len());
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(inner: &str) -> String {
        format!(
            r#"<li><div class="media-content"><div class="media-content__info">{}</div></div></li>"#,
            inner
        )
    }

    fn timed(url: &str, title: &str) -> String {
        entry(&format!(
            r#"<p class="media-content__meta-time" title="{}">1 day ago</p>
               <a class="button" href="{}">Download</a>"#,
            title, url
        ))
    }

    #[test]
    fn test_extracts_one_record_per_container() {
        let html = [
            timed("https://cdn.example.com/1.jpg", "7/6/2025, 8:46:19 AM"),
            timed("https://cdn.example.com/2.mp4", "7/7/2025, 9:00:00 PM"),
            timed("https://cdn.example.com/3.jpg", "2025-01-28, 10:00:00"),
        ]
        .concat();

        let records = GramsnapParser.extract_media(&html);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].url, "https://cdn.example.com/1.jpg");
        assert_eq!(records[0].filename, "2025-07-06_08-46-19.bin");
        assert_eq!(records[0].timestamp.as_deref(), Some("7/6/2025, 8:46:19 AM"));
        assert_eq!(records[1].filename, "2025-07-07_21-00-00.bin");
        assert_eq!(records[2].filename, "2025-01-28_10-00-00.bin");
    }

    #[test]
    fn test_duplicate_names_get_numbered_suffixes() {
        let html = [
            timed("https://cdn.example.com/a", "7/6/2025, 8:46:19 AM"),
            timed("https://cdn.example.com/b", "7/6/2025, 8:46:19 AM"),
            timed("https://cdn.example.com/c", "7/6/2025, 8:46:19 AM"),
        ]
        .concat();

        let names: Vec<_> = GramsnapParser
            .extract_media(&html)
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(
            names,
            vec![
                "2025-07-06_08-46-19.bin",
                "2025-07-06_08-46-19_2.bin",
                "2025-07-06_08-46-19_3.bin",
            ]
        );
    }

    #[test]
    fn test_url_attribute_priority_and_fallthrough() {
        // Relative href is rejected, so the scan moves on to the img data-src.
        let html = entry(
            r#"<a href="/p/abc">post</a>
               <img src="" data-src="//cdn.example.com/thumb.jpg">
               <video src="https://cdn.example.com/late.mp4"></video>"#,
        );

        let records = GramsnapParser.extract_media(&html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://cdn.example.com/thumb.jpg");
        assert_eq!(records[0].timestamp, None);
        assert_eq!(records[0].filename, "file.bin");
    }

    #[test]
    fn test_entities_and_trailing_punctuation() {
        let html = entry(r#"<a href=" https://cdn.example.com/x.jpg?a=1&amp;b=2). ">x</a>"#);
        let records = GramsnapParser.extract_media(&html);
        assert_eq!(records[0].url, "https://cdn.example.com/x.jpg?a=1&b=2");
    }

    #[test]
    fn test_container_without_url_is_skipped() {
        let html = [
            entry(r#"<a href="javascript:void(0)">nope</a>"#),
            timed("https://cdn.example.com/ok.jpg", "7/6/2025, 8:46:19 AM"),
        ]
        .concat();

        let records = GramsnapParser.extract_media(&html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://cdn.example.com/ok.jpg");
    }

    #[test]
    fn test_source_element_inside_video() {
        let html = entry(
            r#"<video controls><source src="https://cdn.example.com/clip.mp4" type="video/mp4"></video>"#,
        );
        let records = GramsnapParser.extract_media(&html);
        assert_eq!(records[0].url, "https://cdn.example.com/clip.mp4");
    }

    #[test]
    fn test_malformed_or_empty_html_yields_nothing() {
        assert!(GramsnapParser.extract_media("").is_empty());
        assert!(GramsnapParser.extract_media("   ").is_empty());
        assert!(GramsnapParser
            .extract_media("<div class=\"media-content__info\"><a href=")
            .is_empty());
        assert!(GramsnapParser
            .extract_media("<<<>>> not html at all </ul></li>")
            .is_empty());
    }
}
