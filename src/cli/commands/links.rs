//! Direct link download command.

use std::path::PathBuf;

use crate::cli::helpers::{read_text_arg, CommandContext};
use crate::cli::icons::{dim_arrow, error, info, success};
use crate::cli::progress::spawn_consumer;
use crate::config::RunConfig;
use crate::scrapers::parse_links;
use crate::services::{HttpFetcher, LinkDownloadService, Phase, ProgressReporter};
use crate::utils::user_dir_name;

/// Parse links out of text and download them straight into the folder.
pub async fn cmd_links(
    ctx: &CommandContext,
    text: Option<&str>,
    user: Option<&str>,
    folder: Option<PathBuf>,
) -> anyhow::Result<()> {
    let run = RunConfig::from_app(&ctx.app, folder.as_deref())?;

    let text = match text {
        Some(arg) => read_text_arg(arg)?,
        None => ctx.app.links_text.clone(),
    };

    let links = parse_links(&text);
    if links.is_empty() {
        anyhow::bail!("No http(s) links found in the given text");
    }

    let dest_dir = match user.map(str::trim).filter(|u| !u.is_empty()) {
        Some(user) => run.folder.join(user_dir_name(user)),
        None => run.folder.clone(),
    };
    std::fs::create_dir_all(&dest_dir)?;

    println!(
        "{} Downloading {} link(s) into {}",
        info(),
        links.len(),
        dest_dir.display()
    );

    let fetcher = HttpFetcher::from_config(&run.download_config())?;
    let service = LinkDownloadService::new(fetcher, run.folder.clone(), dest_dir);

    let (reporter, rx) = ProgressReporter::channel(Phase::Links);
    let consumer = spawn_consumer(rx, links.len(), "Links");

    let batch = tokio::spawn(async move { service.run(&links, reporter).await });
    let summary = batch.await?;
    if let Err(e) = consumer.await {
        tracing::warn!("Progress display task failed: {}", e);
    }

    println!("{} Downloaded {} of {} link(s)", success(), summary.succeeded, summary.total);
    if summary.failed > 0 {
        println!("  {} {} failed", error(), summary.failed);
    }
    if let Some(report) = summary.organized {
        println!(
            "  {} Sorted {} image(s) and {} video(s)",
            dim_arrow(),
            report.moved_images,
            report.moved_videos
        );
    }

    Ok(())
}
