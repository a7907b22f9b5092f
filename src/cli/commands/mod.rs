//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod download;
mod links;
mod organize;
mod scrape;
mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::helpers::{limit_from, CommandContext};

#[derive(Parser)]
#[command(name = "mediaferry")]
#[command(about = "Scrape, queue and download a user's media from a mirror site")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to <config dir>/mediaferry/config.json)
    #[arg(short, long, global = true, env = "MEDIAFERRY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Render each user's media list and queue the media found (does not download)
    Scrape {
        /// Usernames to scrape (defaults to the usernames in the config file)
        usernames: Vec<String>,
        /// Output folder (overrides config file)
        #[arg(short, long)]
        folder: Option<PathBuf>,
        /// Scroll iterations per user (0 = default of 5)
        #[arg(short, long)]
        times: Option<u32>,
        /// Media list source
        #[arg(short, long)]
        source: Option<String>,
        /// Write the effective folder, usernames and times back to the config file
        #[arg(long)]
        save: bool,
    },

    /// Download pending media from the queue
    Download {
        /// Output folder (overrides config file)
        #[arg(short, long)]
        folder: Option<PathBuf>,
        /// Limit number of files to download (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Download links pasted as text, bypassing the queue
    Links {
        /// Text containing links, @file to read a file, or - for stdin
        /// (defaults to links_text from the config file)
        text: Option<String>,
        /// Save into a subfolder for this user
        #[arg(short, long)]
        user: Option<String>,
        /// Output folder (overrides config file)
        #[arg(short, long)]
        folder: Option<PathBuf>,
    },

    /// Sort a user directory's files into images/ and videos/
    Organize {
        /// User directory to organize
        dir: PathBuf,
    },

    /// Show download queue statistics
    Stats {
        /// Output folder (overrides config file)
        #[arg(short, long)]
        folder: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to the config file
    Save {
        /// Output folder to store
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Print the config file location
    Path,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut ctx = CommandContext::load(cli.config.as_deref());

    match cli.command {
        Commands::Scrape {
            usernames,
            folder,
            times,
            source,
            save,
        } => scrape::cmd_scrape(&mut ctx, usernames, folder, times, source, save).await,
        Commands::Download { folder, limit } => {
            download::cmd_download(&ctx, folder, limit_from(limit)).await
        }
        Commands::Links { text, user, folder } => {
            links::cmd_links(&ctx, text.as_deref(), user.as_deref(), folder).await
        }
        Commands::Organize { dir } => organize::cmd_organize(&dir),
        Commands::Stats { folder, json } => stats::cmd_stats(&ctx, folder, json),
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&ctx),
            ConfigCommands::Save { folder } => config_cmd::cmd_config_save(&mut ctx, folder),
            ConfigCommands::Path => config_cmd::cmd_config_path(&ctx),
        },
    }
}
