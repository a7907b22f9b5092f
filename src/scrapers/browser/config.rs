//! Browser engine and site profile configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    /// Set to false to watch the scroll sequence while debugging.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Proxy server URL (e.g., "socks5://127.0.0.1:1080").
    #[serde(default)]
    pub proxy: Option<String>,

    /// Per-step timeout in seconds (launch, element lookup, load waits).
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to existing browser instead of launching one.
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Inject the stealth evasion scripts after navigation.
    #[serde(default = "default_stealth")]
    pub stealth: bool,
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            proxy: None,
            timeout: default_timeout(),
            chrome_args: Vec::new(),
            remote_url: None,
            stealth: default_stealth(),
        }
    }
}

impl BrowserEngineConfig {
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.max(1))
    }
}

pub fn default_headless() -> bool {
    true
}

pub fn default_timeout() -> u64 {
    30
}

pub fn default_stealth() -> bool {
    true
}

/// Where and how a mirror site exposes a user's media list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Page holding the username search form.
    pub search_url: String,
    /// Text input receiving the username.
    pub input_selector: String,
    /// Search button, tried before falling back to `button_text`.
    pub button_selector: String,
    /// Visible text of the search button.
    pub button_text: String,
    /// Container whose inner HTML is returned.
    pub media_list_selector: String,
    /// Pause between scripted steps, in milliseconds.
    pub step_delay_ms: u64,
    /// Pause before reading the media list, in milliseconds.
    pub settle_delay_ms: u64,
}

impl SiteProfile {
    pub fn gramsnap() -> Self {
        Self {
            search_url: "https://gramsnap.com/en/".to_string(),
            input_selector: r#"input[placeholder="@username or link"]"#.to_string(),
            button_selector: r#"button[type="submit"]"#.to_string(),
            button_text: "Search".to_string(),
            media_list_selector: "ul.profile-media-list".to_string(),
            step_delay_ms: 1_000,
            settle_delay_ms: 5_000,
        }
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::gramsnap()
    }
}
