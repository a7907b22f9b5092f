//! Configuration file handling.
//!
//! The file is a flat JSON object so configurations written by earlier
//! versions keep loading. Counts may be numbers, numeric strings, empty
//! strings or null. Pipeline code never reads the file; it receives a
//! [`RunConfig`] built here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::scrapers::http_client::DEFAULT_TIMEOUT;
use crate::scrapers::{BrowserEngineConfig, ScrollIterations, DEFAULT_SOURCE};
use crate::services::DownloadConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "MEDIAFERRY_CONFIG";

/// Errors raised while reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No output folder configured (pass --folder or set \"folder\" in the config file)")]
    MissingFolder,
}

/// Accept `5`, `"5"`, `""` and `null`; anything else reads as unset.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Persisted application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output folder; `~` is expanded.
    #[serde(default)]
    pub folder: String,

    /// Usernames, one per line.
    #[serde(default)]
    pub usernames: String,

    /// Text pasted for direct link downloads.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub links_text: String,

    /// Scroll iterations per username.
    #[serde(default, deserialize_with = "lenient_count")]
    pub times: Option<u32>,

    /// Kept for configuration written by the direct-client variant.
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub months: Option<u32>,

    /// Kept for configuration written by the direct-client variant.
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub max_posts: Option<u32>,

    #[serde(default)]
    pub login_enabled: bool,

    /// Media list source id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// User agent for downloads: a custom string or "impersonate".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Download timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,

    #[serde(default)]
    pub browser: BrowserEngineConfig,

    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl AppConfig {
    /// Default location: `<config dir>/mediaferry/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mediaferry").join("config.json"))
    }

    /// Explicit path, else `MEDIAFERRY_CONFIG`, else the default location.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| {
                std::env::var_os(CONFIG_ENV)
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            })
            .or_else(Self::default_path)
    }

    /// Read and parse a config file.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&contents)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it is absent or broken.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Self {
                source_path: Some(path.to_path_buf()),
                ..Default::default()
            };
        }

        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Could not read config {}: {}; using defaults", path.display(), e);
                Self {
                    source_path: Some(path.to_path_buf()),
                    ..Default::default()
                }
            }
        }
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Non-empty trimmed usernames in file order.
    pub fn usernames_list(&self) -> Vec<String> {
        split_usernames(&self.usernames)
    }

    /// Output folder with `~` expanded, if one is set.
    pub fn folder_path(&self) -> Option<PathBuf> {
        let folder = self.folder.trim();
        if folder.is_empty() {
            None
        } else {
            Some(expand_path(folder))
        }
    }
}

/// Split newline-delimited usernames, dropping blanks.
pub fn split_usernames(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expand `~` and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}

/// Explicit settings handed to the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub folder: PathBuf,
    pub usernames: Vec<String>,
    pub scroll_iterations: ScrollIterations,
    pub source: String,
    pub browser: BrowserEngineConfig,
    pub request_timeout: Duration,
    pub user_agent: Option<String>,
}

impl RunConfig {
    /// Build from file settings; command-line overrides are applied by the caller.
    pub fn from_app(app: &AppConfig, folder_override: Option<&Path>) -> Result<Self, ConfigError> {
        let folder = folder_override
            .map(Path::to_path_buf)
            .or_else(|| app.folder_path())
            .ok_or(ConfigError::MissingFolder)?;

        Ok(Self {
            folder,
            usernames: app.usernames_list(),
            scroll_iterations: ScrollIterations::from(app.times),
            source: app
                .source
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            browser: app.browser.clone(),
            request_timeout: app
                .request_timeout
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            user_agent: app.user_agent.clone(),
        })
    }

    pub fn download_config(&self) -> DownloadConfig {
        DownloadConfig {
            folder: self.folder.clone(),
            request_timeout: self.request_timeout,
            user_agent: self.user_agent.clone(),
            proxy: self.browser.proxy.clone(),
        }
    }
}
