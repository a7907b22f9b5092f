//! Download pending media command.

use std::path::PathBuf;

use crate::cli::helpers::{open_existing_queue, CommandContext};
use crate::cli::icons::{dim_arrow, error, info, success, warn};
use crate::cli::progress::spawn_consumer;
use crate::config::RunConfig;
use crate::services::{DownloadService, Phase, ProgressReporter};

/// Download pending records from the queue.
pub async fn cmd_download(
    ctx: &CommandContext,
    folder: Option<PathBuf>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let run = RunConfig::from_app(&ctx.app, folder.as_deref())?;
    let queue = open_existing_queue(&run.folder)?;

    let pending = queue.stats().pending as usize;
    if pending == 0 {
        println!("{} No pending files to download", warn());
        println!(
            "  {} Run 'mediaferry scrape' to queue new media",
            dim_arrow()
        );
        return Ok(());
    }

    let total = limit.map(|l| l.min(pending)).unwrap_or(pending);
    println!("{} Downloading {} of {} pending file(s)", info(), total, pending);

    let service = DownloadService::from_config(queue, &run.download_config())?;

    let (reporter, rx) = ProgressReporter::channel(Phase::Download);
    let consumer = spawn_consumer(rx, total, "Download");

    let batch = tokio::spawn(async move { service.run(limit, reporter).await });
    let summary = batch.await?;
    if let Err(e) = consumer.await {
        tracing::warn!("Progress display task failed: {}", e);
    }

    println!("{} Downloaded {} file(s)", success(), summary.succeeded);
    if summary.failed > 0 {
        println!(
            "  {} {} failed and stay pending; run download again to retry",
            error(),
            summary.failed
        );
    }
    println!("  {} DB stats: {}", dim_arrow(), summary.stats);

    Ok(())
}
