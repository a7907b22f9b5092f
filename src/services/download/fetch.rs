//! Streaming a single URL to disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::filename::final_filename;
use super::types::{DownloadConfig, FetchError};
use crate::scrapers::http_client::HttpResponse;
use crate::scrapers::HttpClient;
use crate::utils::unique_path;

/// Size of the pieces the body is written in.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Attempts at claiming a free filename before giving up.
const MAX_NAME_ATTEMPTS: usize = 16;

/// Downloads URLs into directories without overwriting existing files.
#[derive(Clone)]
pub struct HttpFetcher {
    client: HttpClient,
}

impl HttpFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build a fetcher from download settings.
    pub fn from_config(config: &DownloadConfig) -> Result<Self, FetchError> {
        let client = HttpClient::new(
            config.request_timeout,
            config.user_agent.as_deref(),
            config.proxy.as_deref(),
        )?;
        Ok(Self::new(client))
    }

    /// Fetch `url` into `dest_dir` and return the saved path.
    ///
    /// `hint` is the preferred filename; `index` numbers the fallback
    /// `file_<index>` name. On any failure no file is left behind.
    pub async fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        hint: Option<&str>,
        index: usize,
    ) -> Result<PathBuf, FetchError> {
        let mut response = self.client.get(url).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status.as_u16(),
                url: url.to_string(),
            });
        }

        let filename = final_filename(hint, url, index, response.content_type());
        debug!("Resolved {} -> {}", url, filename);

        fs::create_dir_all(dest_dir).await?;
        let (path, mut file) = create_unique(dest_dir, &filename).await?;

        match write_body(&mut response, &mut file).await {
            Ok(bytes) => {
                debug!("Saved {} ({} bytes)", path.display(), bytes);
                Ok(path)
            }
            Err(e) => {
                drop(file);
                if let Err(rm) = fs::remove_file(&path).await {
                    warn!("Could not remove partial file {}: {}", path.display(), rm);
                }
                Err(e)
            }
        }
    }
}

/// Create a new file named `filename`, `filename_1`, ... in `dir`.
async fn create_unique(dir: &Path, filename: &str) -> Result<(PathBuf, File), FetchError> {
    let mut last_err = None;

    for _ in 0..MAX_NAME_ATTEMPTS {
        let path = unique_path(dir, filename);
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((path, file)),
            // Another writer claimed the name between the check and the open.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => last_err = Some(e),
            Err(e) => return Err(e.into()),
        }
    }

    Err(last_err
        .unwrap_or_else(|| std::io::Error::new(ErrorKind::AlreadyExists, filename.to_string()))
        .into())
}

async fn write_body(response: &mut HttpResponse, file: &mut File) -> Result<u64, FetchError> {
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        for piece in chunk.chunks(CHUNK_SIZE) {
            file.write_all(piece).await?;
            written += piece.len() as u64;
        }
    }
    file.flush().await?;
    Ok(written)
}
