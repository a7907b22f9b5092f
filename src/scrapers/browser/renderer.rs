//! Chromium implementation of the page renderer.

use std::future::Future;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::{BrowserEngineConfig, SiteProfile};
use super::stealth::{RENDER_USER_AGENT, SCROLL_UP_SCRIPT, STEALTH_SCRIPTS, WAIT_FOR_LOAD_SCRIPT};
use super::{PageRenderer, RenderError, ScrollIterations};

/// Renders media lists in a fresh Chromium session per username.
pub struct BrowserRenderer {
    config: BrowserEngineConfig,
    profile: SiteProfile,
}

/// A running browser plus the task pumping its CDP events.
struct Session {
    browser: Browser,
    handler: JoinHandle<()>,
    /// Launched by us, so closing it ends the process.
    owned: bool,
}

impl BrowserRenderer {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    pub fn new(config: BrowserEngineConfig, profile: SiteProfile) -> Self {
        Self { config, profile }
    }

    /// Find Chrome executable.
    fn find_chrome() -> Result<PathBuf, RenderError> {
        for path in Self::CHROME_PATHS {
            let p = Path::new(path);
            if p.exists() {
                debug!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(path) = which::which(cmd) {
                debug!("Found Chrome in PATH: {}", path.display());
                return Ok(path);
            }
        }

        Err(RenderError::Launch(
            "Chrome/Chromium not found. Install chromium or google-chrome".to_string(),
        ))
    }

    async fn open_session(&self) -> Result<Session, RenderError> {
        if let Some(remote_url) = self.config.remote_url.clone() {
            return self.connect_remote(&remote_url).await;
        }

        info!("Launching browser (headless={})", self.config.headless);
        let chrome_path = Self::find_chrome()?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .request_timeout(self.config.step_timeout());

        // with_head means NOT headless
        if !self.config.headless {
            builder = builder.with_head();
        }

        if let Some(ref proxy) = self.config.proxy {
            builder = builder.arg(format!("--proxy-server={}", proxy));
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-sync")
            .arg("--no-sandbox")
            .arg("--disable-gpu");

        for arg in &self.config.chrome_args {
            builder = builder.arg(arg);
        }

        let config = builder
            .build()
            .map_err(|e| RenderError::Launch(format!("invalid browser config: {}", e)))?;

        let (browser, mut handler) = self
            .step("launching browser", Browser::launch(config))
            .await?
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Session {
            browser,
            handler,
            owned: true,
        })
    }

    /// Connect to a remote Chrome instance.
    async fn connect_remote(&self, url: &str) -> Result<Session, RenderError> {
        info!("Connecting to remote browser at {}", url);

        // Get WebSocket URL from the /json/version endpoint
        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let resp: serde_json::Value = reqwest::Client::new()
            .get(&version_url)
            .timeout(self.config.step_timeout())
            .send()
            .await
            .map_err(|e| RenderError::Launch(format!("remote browser unreachable: {}", e)))?
            .json()
            .await
            .map_err(|e| RenderError::Launch(format!("bad browser version info: {}", e)))?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| RenderError::Launch("no webSocketDebuggerUrl in response".into()))?;

        debug!("Connecting to WebSocket: {}", ws_url);

        let (browser, mut handler) = self
            .step("connecting to remote browser", Browser::connect(ws_url))
            .await?
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Session {
            browser,
            handler,
            owned: false,
        })
    }

    /// Bound a browser step by the configured timeout.
    async fn step<F, T>(&self, what: &str, fut: F) -> Result<T, RenderError>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.config.step_timeout(), fut)
            .await
            .map_err(|_| RenderError::Timeout(what.to_string()))
    }

    async fn wait_for_load(&self, page: &Page) {
        match self
            .step("waiting for page load", page.evaluate(WAIT_FOR_LOAD_SCRIPT.to_string()))
            .await
        {
            Ok(Ok(result)) => {
                let state: String = result
                    .into_value()
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!("Page ready state: {}", state);
            }
            Ok(Err(e)) => debug!("Could not check ready state: {}", e),
            Err(_) => warn!("Timeout waiting for page load"),
        }
    }

    async fn apply_stealth(&self, page: &Page) {
        for script in STEALTH_SCRIPTS {
            if let Err(e) = page.evaluate(script.to_string()).await {
                debug!("Stealth script failed: {}", e);
            }
        }
    }

    async fn click_search(&self, page: &Page) -> Result<(), RenderError> {
        if let Ok(Ok(button)) = self
            .step("finding search button", page.find_element(&self.profile.button_selector))
            .await
        {
            button
                .click()
                .await
                .map_err(|e| RenderError::Browser(e.to_string()))?;
            return Ok(());
        }

        // Fall back to matching the button's visible text.
        let buttons = self
            .step("finding buttons", page.find_elements("button"))
            .await?
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        for button in buttons {
            let text = button.inner_text().await.ok().flatten().unwrap_or_default();
            if text.trim().eq_ignore_ascii_case(&self.profile.button_text) {
                button
                    .click()
                    .await
                    .map_err(|e| RenderError::Browser(e.to_string()))?;
                return Ok(());
            }
        }

        Err(RenderError::ElementNotFound(format!(
            "search button ({} or text {:?})",
            self.profile.button_selector, self.profile.button_text
        )))
    }

    /// Search for the username, scroll, and read the list container.
    async fn drive(
        &self,
        page: &Page,
        username: &str,
        scroll_iterations: ScrollIterations,
    ) -> Result<String, RenderError> {
        let delay = self.profile.step_delay();

        if let Err(e) = page
            .execute(SetUserAgentOverrideParams::new(RENDER_USER_AGENT.to_string()))
            .await
        {
            debug!("Could not override user agent: {}", e);
        }

        info!("Navigating to {}", self.profile.search_url);
        self.step("navigating", page.goto(self.profile.search_url.as_str()))
            .await?
            .map_err(|e| RenderError::Navigation(e.to_string()))?;
        self.wait_for_load(page).await;

        if self.config.stealth {
            self.apply_stealth(page).await;
        }

        let input = self
            .step("finding search input", page.find_element(&self.profile.input_selector))
            .await?
            .map_err(|_| RenderError::ElementNotFound(self.profile.input_selector.clone()))?;
        input
            .click()
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?;
        input
            .type_str(username)
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        self.click_search(page).await?;
        tokio::time::sleep(delay).await;
        self.wait_for_load(page).await;
        tokio::time::sleep(delay).await;

        for i in 0..scroll_iterations.get() {
            debug!("Scroll cycle {}/{} for {}", i + 1, scroll_iterations.get(), username);

            let body = self
                .step("finding page body", page.find_element("body"))
                .await?
                .map_err(|_| RenderError::ElementNotFound("body".to_string()))?;
            body.press_key("End")
                .await
                .map_err(|e| RenderError::Browser(e.to_string()))?;
            self.wait_for_load(page).await;
            tokio::time::sleep(delay).await;

            page.evaluate(SCROLL_UP_SCRIPT.to_string())
                .await
                .map_err(|e| RenderError::Browser(e.to_string()))?;
            self.wait_for_load(page).await;
            tokio::time::sleep(delay).await;
        }

        tokio::time::sleep(self.profile.settle_delay()).await;

        let list = self
            .step(
                "finding media list",
                page.find_element(&self.profile.media_list_selector),
            )
            .await?
            .map_err(|_| RenderError::ElementNotFound(self.profile.media_list_selector.clone()))?;

        let html = list
            .inner_html()
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?
            .unwrap_or_default();

        debug!("Rendered media list for {}: {} bytes", username, html.len());
        Ok(html)
    }

    /// Shut the browser down. A browser that refuses to close is killed, and
    /// waiting for the process is bounded by the step timeout.
    async fn close_session(&self, mut session: Session) {
        if session.owned {
            if let Err(e) = session.browser.close().await {
                warn!("Browser close failed, killing it: {}", e);
                if let Some(Err(e)) = session.browser.kill().await {
                    warn!("Could not kill browser: {}", e);
                }
            }
            match self.step("closing browser", session.browser.wait()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => debug!("Browser wait failed: {}", e),
                Err(e) => warn!("{}", e),
            }
        }
        session.handler.abort();
    }
}

#[async_trait]
impl PageRenderer for BrowserRenderer {
    async fn render_media_list(
        &self,
        username: &str,
        scroll_iterations: ScrollIterations,
    ) -> Result<String, RenderError> {
        let session = self.open_session().await?;

        let result = match session.browser.new_page("about:blank").await {
            Ok(page) => {
                let result = self.drive(&page, username, scroll_iterations).await;
                let _ = page.close().await;
                result
            }
            Err(e) => Err(RenderError::Browser(e.to_string())),
        };

        self.close_session(session).await;
        result
    }
}
