//! Scraping building blocks: page rendering, media list parsing, HTTP.

pub mod browser;
pub mod http_client;
pub mod links;
pub mod media_list;

pub use browser::{
    BrowserEngineConfig, BrowserRenderer, PageRenderer, RenderError, ScrollIterations, SiteProfile,
};
pub use http_client::HttpClient;
pub use links::{normalize_url, parse_links};
pub use media_list::{available_sources, parser_for, MediaListParser, DEFAULT_SOURCE};
