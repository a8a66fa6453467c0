pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "claimlens")]
#[command(about = "Claims dashboard scraper and summarizer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify required configuration before running anything
    Check {
        /// Check for the external-login workflow (no credentials needed)
        #[arg(long)]
        external: bool,
    },
    /// Authenticate against the dashboard and report the result
    Login {
        /// Assume login happened out-of-band; only probe the protected URL
        #[arg(long)]
        external: bool,
    },
    /// Authenticate, then extract the dashboard page
    Scrape {
        #[arg(long)]
        external: bool,
    },
    /// Full pipeline: authenticate, extract, summarize
    Analyze {
        #[arg(long)]
        external: bool,
    },
    /// Full pipeline, then write summary.json and one CSV per table
    Export {
        #[arg(long)]
        external: bool,

        /// Output directory
        #[arg(short, long, default_value = "claimlens-export")]
        output: std::path::PathBuf,
    },
    /// Launch the interactive TUI
    Tui {
        /// Skip the credential requirement; login out-of-band and use
        /// the session-check action instead
        #[arg(long)]
        external: bool,
    },
}
