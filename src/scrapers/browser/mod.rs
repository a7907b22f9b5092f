//! Headless browser rendering of a mirror site's media list.
//!
//! The media list on mirror sites is built client-side and lazy-loads more
//! entries while the page scrolls, so a plain HTTP fetch only sees an empty
//! shell. `BrowserRenderer` drives Chromium through the search form and a
//! scripted scroll sequence, then hands back the rendered list fragment.

mod config;
#[cfg(feature = "browser")]
mod renderer;
mod stealth;

pub use config::{BrowserEngineConfig, SiteProfile};
#[cfg(feature = "browser")]
pub use renderer::BrowserRenderer;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while rendering a media list.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    #[error("Timed out while {0}")]
    Timeout(String),
    #[error("Browser error: {0}")]
    Browser(String),
    #[error("Browser support not compiled. Rebuild with: cargo build --features browser")]
    NotCompiled,
}

/// Number of End-key scroll cycles performed before reading the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollIterations(u32);

impl ScrollIterations {
    pub const DEFAULT: u32 = 5;

    /// Zero falls back to the default.
    pub fn new(count: u32) -> Self {
        if count == 0 {
            Self(Self::DEFAULT)
        } else {
            Self(count)
        }
    }

    /// Parse user input; anything that is not a positive integer yields the default.
    pub fn parse(value: &str) -> Self {
        value
            .trim()
            .parse::<u32>()
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for ScrollIterations {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<Option<u32>> for ScrollIterations {
    fn from(value: Option<u32>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }
}

/// Produces the rendered media list HTML for a username.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render_media_list(
        &self,
        username: &str,
        scroll_iterations: ScrollIterations,
    ) -> Result<String, RenderError>;
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
pub struct BrowserRenderer {
    #[allow(dead_code)]
    config: BrowserEngineConfig,
    #[allow(dead_code)]
    profile: SiteProfile,
}

#[cfg(not(feature = "browser"))]
impl BrowserRenderer {
    pub fn new(config: BrowserEngineConfig, profile: SiteProfile) -> Self {
        Self { config, profile }
    }
}

#[cfg(not(feature = "browser"))]
#[async_trait]
impl PageRenderer for BrowserRenderer {
    async fn render_media_list(
        &self,
        _username: &str,
        _scroll_iterations: ScrollIterations,
    ) -> Result<String, RenderError> {
        Err(RenderError::NotCompiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_iterations_defaults() {
        assert_eq!(ScrollIterations::new(0).get(), 5);
        assert_eq!(ScrollIterations::new(3).get(), 3);
        assert_eq!(ScrollIterations::default().get(), 5);
        assert_eq!(ScrollIterations::from(None).get(), 5);
        assert_eq!(ScrollIterations::from(Some(12)).get(), 12);
    }

    #[test]
    fn test_scroll_iterations_parse() {
        assert_eq!(ScrollIterations::parse("8").get(), 8);
        assert_eq!(ScrollIterations::parse(" 2 ").get(), 2);
        assert_eq!(ScrollIterations::parse("0").get(), 5);
        assert_eq!(ScrollIterations::parse("-3").get(), 5);
        assert_eq!(ScrollIterations::parse("many").get(), 5);
        assert_eq!(ScrollIterations::parse("").get(), 5);
    }
}
