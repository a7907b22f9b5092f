//! Queue statistics command.

use std::path::PathBuf;

use console::style;

use crate::cli::helpers::{open_existing_queue, CommandContext};
use crate::config::RunConfig;

/// Print queue totals for a folder.
pub fn cmd_stats(ctx: &CommandContext, folder: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let run = RunConfig::from_app(&ctx.app, folder.as_deref())?;
    let queue = open_existing_queue(&run.folder)?;
    let stats = queue.try_stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", style(format!("Queue: {}", queue.path().display())).bold());
    println!("  Total:   {}", stats.total);
    println!("  Pending: {}", style(stats.pending).yellow());
    println!("  Ready:   {}", style(stats.ready).green());

    Ok(())
}
