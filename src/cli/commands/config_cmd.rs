//! Configuration management commands.

use crate::cli::helpers::CommandContext;
use crate::cli::icons::{dim_arrow, success, warn};

/// Print the effective configuration as JSON.
pub fn cmd_config_show(ctx: &CommandContext) -> anyhow::Result<()> {
    match ctx.config_path {
        Some(ref path) if path.exists() => {
            eprintln!("{} Loaded from {}", dim_arrow(), path.display())
        }
        Some(ref path) => eprintln!("{} {} does not exist; showing defaults", warn(), path.display()),
        None => eprintln!("{} No config location; showing defaults", warn()),
    }
    println!("{}", serde_json::to_string_pretty(&ctx.app)?);
    Ok(())
}

/// Persist the effective configuration.
pub fn cmd_config_save(ctx: &mut CommandContext, folder: Option<String>) -> anyhow::Result<()> {
    if let Some(folder) = folder {
        ctx.app.folder = folder;
    }
    let path = ctx.save()?;
    println!("{} Saved config to {}", success(), path.display());
    Ok(())
}

/// Print where the config file is read from.
pub fn cmd_config_path(ctx: &CommandContext) -> anyhow::Result<()> {
    match ctx.config_path {
        Some(ref path) => println!("{}", path.display()),
        None => anyhow::bail!("Could not determine a config directory; pass --config"),
    }
    Ok(())
}
