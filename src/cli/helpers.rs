//! Shared helper functions for CLI commands.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::repository::DownloadQueue;

/// Loaded configuration plus where it lives.
pub struct CommandContext {
    pub app: AppConfig,
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    /// Load the config from an explicit path or the default location.
    pub fn load(explicit: Option<&Path>) -> Self {
        let config_path = AppConfig::resolve_path(explicit);
        let app = config_path
            .as_deref()
            .map(AppConfig::load)
            .unwrap_or_default();
        Self { app, config_path }
    }

    /// Persist the current config to its path.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = self
            .config_path
            .clone()
            .context("No config location available; pass --config")?;
        self.app
            .save(&path)
            .with_context(|| format!("Failed to save config to {}", path.display()))?;
        Ok(path)
    }
}

/// Create the output folder and open its queue.
pub fn open_queue(folder: &Path) -> anyhow::Result<Arc<DownloadQueue>> {
    std::fs::create_dir_all(folder)
        .with_context(|| format!("Failed to create folder {}", folder.display()))?;
    let queue = DownloadQueue::in_folder(folder)
        .with_context(|| format!("Failed to open download queue in {}", folder.display()))?;
    Ok(Arc::new(queue))
}

/// Open the queue of a folder that must already have been scraped.
pub fn open_existing_queue(folder: &Path) -> anyhow::Result<Arc<DownloadQueue>> {
    let db_path = folder.join(DownloadQueue::FILE_NAME);
    if !db_path.exists() {
        anyhow::bail!(
            "No download queue at {}. Run 'mediaferry scrape' first.",
            db_path.display()
        );
    }
    open_queue(folder)
}

/// Read a text argument: `@path` reads a file, `-` reads stdin.
pub fn read_text_arg(arg: &str) -> anyhow::Result<String> {
    if arg == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    if let Some(path) = arg.strip_prefix('@') {
        return std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path));
    }

    Ok(arg.to_string())
}

/// Treat 0 as "no limit".
pub fn limit_from(value: usize) -> Option<usize> {
    if value > 0 {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_text_arg() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("links.txt");
        std::fs::write(&file, "https://example.com/a.jpg").unwrap();

        assert_eq!(
            read_text_arg(&format!("@{}", file.display())).unwrap(),
            "https://example.com/a.jpg"
        );
        assert_eq!(read_text_arg("plain text").unwrap(), "plain text");
        assert!(read_text_arg("@/definitely/missing/file").is_err());
    }

    #[test]
    fn test_open_existing_queue_requires_database() {
        let dir = tempdir().unwrap();
        assert!(open_existing_queue(dir.path()).is_err());
        open_queue(dir.path()).unwrap();
        assert!(open_existing_queue(dir.path()).is_ok());
    }

    #[test]
    fn test_limit_from() {
        assert_eq!(limit_from(0), None);
        assert_eq!(limit_from(3), Some(3));
    }
}
