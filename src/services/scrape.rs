//! Scrape batch: render, extract and queue media for a list of usernames.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::models::QueueStats;
use crate::repository::{DownloadQueue, InsertOutcome};
use crate::scrapers::{MediaListParser, PageRenderer, ScrollIterations};
use crate::services::progress::ProgressReporter;
use crate::services::run_log::RunLog;
use crate::utils::user_dir_name;

/// Counts for a scrape batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub users: usize,
    /// Users whose page rendered and yielded at least one record.
    pub succeeded_users: usize,
    /// Users whose page rendered but had no media entries.
    pub empty_users: usize,
    /// Users whose page failed to render.
    pub failed_users: usize,
    pub inserted: usize,
    pub ignored: usize,
    pub insert_failures: usize,
    pub stats: QueueStats,
}

/// Per-user insert tally.
#[derive(Debug, Default)]
struct UserTally {
    inserted: usize,
    ignored: usize,
    failed: usize,
}

/// Drives renderer, parser and queue across usernames, in input order.
pub struct ScrapeService {
    renderer: Arc<dyn PageRenderer>,
    parser: Box<dyn MediaListParser>,
    queue: Arc<DownloadQueue>,
    folder: PathBuf,
}

impl ScrapeService {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        parser: Box<dyn MediaListParser>,
        queue: Arc<DownloadQueue>,
        folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            renderer,
            parser,
            queue,
            folder: folder.into(),
        }
    }

    /// Scrape every username. A failing user never stops the batch.
    pub async fn run(
        &self,
        usernames: &[String],
        scroll_iterations: ScrollIterations,
        progress: ProgressReporter,
    ) -> ScrapeSummary {
        let log = RunLog::in_folder(&self.folder);
        log.start("Scrape");

        let total = usernames.len();
        let mut summary = ScrapeSummary {
            users: total,
            ..Default::default()
        };

        for (i, username) in usernames.iter().enumerate() {
            let index = i + 1;
            progress
                .started(
                    i,
                    total,
                    username,
                    format!("Scraping {} ({}/{})...", username, index, total),
                )
                .await;

            let dir_name = user_dir_name(username);
            if let Err(e) = std::fs::create_dir_all(self.folder.join(&dir_name)) {
                warn!("Could not create directory for {}: {}", username, e);
            }

            let html = match self
                .renderer
                .render_media_list(username, scroll_iterations)
                .await
            {
                Ok(html) => html,
                Err(e) => {
                    warn!("Rendering failed for {}: {}", username, e);
                    summary.failed_users += 1;
                    log.write(&format!("FAILED {}: {}", username, e));
                    progress
                        .failed(index, total, username, format!("{}: {}", username, e))
                        .await;
                    continue;
                }
            };

            let records = self.parser.extract_media(&html);
            if records.is_empty() {
                summary.empty_users += 1;
                log.write(&format!("{}: no links found (0 files)", username));
                progress
                    .skipped(index, total, username, format!("{}: no links found", username))
                    .await;
                continue;
            }

            let mut tally = UserTally::default();
            for record in &records {
                let file_path = format!("{}/{}", dir_name, record.filename);
                match self.queue.insert_pending(
                    username,
                    &record.url,
                    record.timestamp.as_deref(),
                    &file_path,
                ) {
                    InsertOutcome::Inserted => tally.inserted += 1,
                    InsertOutcome::Ignored => tally.ignored += 1,
                    InsertOutcome::Failed => tally.failed += 1,
                }
            }

            summary.succeeded_users += 1;
            summary.inserted += tally.inserted;
            summary.ignored += tally.ignored;
            summary.insert_failures += tally.failed;

            let message = if tally.failed > 0 {
                format!(
                    "{}: {} inserted, {} skipped (duplicate), {} failed",
                    username, tally.inserted, tally.ignored, tally.failed
                )
            } else {
                format!(
                    "{}: {} inserted, {} skipped (duplicate)",
                    username, tally.inserted, tally.ignored
                )
            };
            info!("{}", message);
            log.write(&message);
            progress.succeeded(index, total, username, message).await;
        }

        summary.stats = self.queue.stats();
        log.finish(Some(summary.stats));
        progress
            .finished(
                total,
                summary.succeeded_users + summary.empty_users,
                summary.failed_users,
            )
            .await;

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::media_list::GramsnapParser;
    use crate::scrapers::RenderError;
    use crate::services::progress::{EventKind, Phase};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tempfile::tempdir;

    /// Serves canned HTML per username; unknown users fail to render.
    struct CannedRenderer {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl PageRenderer for CannedRenderer {
        async fn render_media_list(
            &self,
            username: &str,
            _scroll_iterations: ScrollIterations,
        ) -> Result<String, RenderError> {
            self.pages
                .get(username)
                .cloned()
                .ok_or_else(|| RenderError::Navigation(format!("no page for {}", username)))
        }
    }

    fn entry(url: &str, title: &str) -> String {
        format!(
            r#"<li><div class="media-content__info">
                 <p class="media-content__meta-time" title="{}">now</p>
                 <a href="{}">Download</a>
               </div></li>"#,
            title, url
        )
    }

    #[tokio::test]
    async fn test_scrape_batch_continues_past_failures() {
        let dir = tempdir().unwrap();
        let queue = Arc::new(DownloadQueue::in_folder(dir.path()).unwrap());

        let mut pages = HashMap::new();
        pages.insert(
            "alice".to_string(),
            [
                entry("https://cdn.example.com/1.jpg", "7/6/2025, 8:46:19 AM"),
                entry("https://cdn.example.com/2.mp4", "7/6/2025, 8:46:19 AM"),
            ]
            .concat(),
        );
        pages.insert("empty".to_string(), "<p>nothing here</p>".to_string());

        let service = ScrapeService::new(
            Arc::new(CannedRenderer { pages }),
            Box::new(GramsnapParser::new()),
            queue.clone(),
            dir.path(),
        );

        let (reporter, mut rx) = ProgressReporter::channel(Phase::Scrape);
        let users = vec!["ghost".to_string(), "alice".to_string(), "empty".to_string()];
        let summary = service.run(&users, ScrollIterations::default(), reporter).await;

        assert_eq!(summary.users, 3);
        assert_eq!(summary.failed_users, 1);
        assert_eq!(summary.empty_users, 1);
        assert_eq!(summary.succeeded_users, 1);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.stats.pending, 2);

        let paths: Vec<String> = queue
            .list_pending(None)
            .into_iter()
            .map(|r| r.file_path)
            .collect();
        assert_eq!(
            paths,
            vec!["alice/2025-07-06_08-46-19.bin", "alice/2025-07-06_08-46-19_2.bin"]
        );
        assert!(dir.path().join("alice").is_dir());

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push((event.phase, event.kind));
        }
        assert_eq!(kinds.first(), Some(&(Phase::Scrape, EventKind::Started)));
        assert!(kinds.contains(&(Phase::Scrape, EventKind::Failed)));
        assert!(kinds.contains(&(Phase::Scrape, EventKind::Skipped)));
        assert_eq!(kinds.last(), Some(&(Phase::Finished, EventKind::Info)));

        let log = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
        assert!(log.contains("alice: 2 inserted, 0 skipped (duplicate)"));
        assert!(log.contains("DB stats: Total=2, Pending=2, Ready=0"));
    }

    #[tokio::test]
    async fn test_rescrape_is_idempotent() {
        let dir = tempdir().unwrap();
        let queue = Arc::new(DownloadQueue::in_folder(dir.path()).unwrap());

        let mut pages = HashMap::new();
        pages.insert(
            "bob".to_string(),
            entry("https://cdn.example.com/b.jpg", "2025-01-28, 10:00:00"),
        );

        let service = ScrapeService::new(
            Arc::new(CannedRenderer { pages }),
            Box::new(GramsnapParser::new()),
            queue.clone(),
            dir.path(),
        );

        let users = vec!["bob".to_string()];
        let first = service
            .run(&users, ScrollIterations::new(1), ProgressReporter::silent(Phase::Scrape))
            .await;
        let second = service
            .run(&users, ScrollIterations::new(1), ProgressReporter::silent(Phase::Scrape))
            .await;

        assert_eq!(first.inserted, 1);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.ignored, 1);
        assert_eq!(queue.stats().total, 1);
    }
}
