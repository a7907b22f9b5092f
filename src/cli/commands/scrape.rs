//! Scrape command: render media lists and fill the download queue.

use std::sync::Arc;

use crate::cli::helpers::{open_queue, CommandContext};
use crate::cli::icons::{dim_arrow, error, info, success, warn};
use crate::cli::progress::spawn_consumer;
use crate::config::RunConfig;
use crate::scrapers::{available_sources, parser_for, BrowserRenderer, PageRenderer, ScrollIterations};
use crate::services::{Phase, ProgressReporter, ScrapeService};

/// Scrape each username and queue its media as pending downloads.
pub async fn cmd_scrape(
    ctx: &mut CommandContext,
    usernames: Vec<String>,
    folder: Option<std::path::PathBuf>,
    times: Option<u32>,
    source: Option<String>,
    save: bool,
) -> anyhow::Result<()> {
    let mut run = RunConfig::from_app(&ctx.app, folder.as_deref())?;

    let usernames: Vec<String> = if usernames.is_empty() {
        run.usernames.clone()
    } else {
        usernames
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect()
    };
    if usernames.is_empty() {
        anyhow::bail!("No usernames given. Pass them as arguments or list them in the config file.");
    }
    run.usernames = usernames;

    if let Some(times) = times {
        run.scroll_iterations = ScrollIterations::new(times);
    }
    if let Some(source) = source {
        run.source = source;
    }

    let parser = parser_for(&run.source).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown source '{}'. Available: {}",
            run.source,
            available_sources().join(", ")
        )
    })?;

    let queue = open_queue(&run.folder)?;

    if save {
        ctx.app.folder = run.folder.display().to_string();
        ctx.app.usernames = run.usernames.join("\n");
        ctx.app.times = Some(run.scroll_iterations.get());
        ctx.app.source = Some(run.source.clone());
        let path = ctx.save()?;
        println!("{} Saved config to {}", dim_arrow(), path.display());
    }

    println!(
        "{} Scraping {} user(s) from {} ({} scroll iterations)",
        info(),
        run.usernames.len(),
        run.source,
        run.scroll_iterations.get()
    );

    let renderer: Arc<dyn PageRenderer> = Arc::new(BrowserRenderer::new(
        run.browser.clone(),
        parser.site_profile(),
    ));
    let service = ScrapeService::new(renderer, parser, queue, run.folder.clone());

    let (reporter, rx) = ProgressReporter::channel(Phase::Scrape);
    let consumer = spawn_consumer(rx, run.usernames.len(), "Scrape");

    let usernames = run.usernames.clone();
    let scroll = run.scroll_iterations;
    let batch = tokio::spawn(async move { service.run(&usernames, scroll, reporter).await });

    let summary = batch.await?;
    if let Err(e) = consumer.await {
        tracing::warn!("Progress display task failed: {}", e);
    }

    println!(
        "{} Scraped {} user(s): {} inserted, {} already queued",
        success(),
        summary.succeeded_users,
        summary.inserted,
        summary.ignored
    );
    if summary.empty_users > 0 {
        println!("  {} {} user(s) had no media", warn(), summary.empty_users);
    }
    if summary.failed_users > 0 {
        println!("  {} {} user(s) failed to render", error(), summary.failed_users);
    }
    println!("  {} DB stats: {}", dim_arrow(), summary.stats);
    println!(
        "  {} Run 'mediaferry download' to fetch pending files",
        dim_arrow()
    );

    Ok(())
}
