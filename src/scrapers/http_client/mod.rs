//! HTTP client used by the download worker.

mod response;
mod user_agent;

pub use response::HttpResponse;
pub use user_agent::{resolve_user_agent, BROWSER_USER_AGENT, IMPERSONATE_USER_AGENTS};

use std::time::Duration;

use reqwest::{Client, Proxy};
use tracing::debug;

/// Default connect and read-idle timeout for media downloads.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin reqwest wrapper carrying the shared client configuration.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client.
    /// - `timeout`: bounds connecting and each wait for body data, not the
    ///   whole transfer, so long downloads keep going while bytes arrive
    /// - `user_agent_config`: None for a browser UA, "impersonate", or a custom string
    /// - `proxy`: optional proxy URL (http, https or socks5)
    pub fn new(
        timeout: Duration,
        user_agent_config: Option<&str>,
        proxy: Option<&str>,
    ) -> Result<Self, reqwest::Error> {
        let user_agent = resolve_user_agent(user_agent_config);
        let mut builder = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .gzip(true)
            .brotli(true);

        if let Some(proxy) = proxy {
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Send a GET request. The body is left unread for streaming.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Ok(HttpResponse::new(response))
    }
}
