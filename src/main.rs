use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use claimlens::app::SessionContext;
use claimlens::cli::{commands, Cli, Commands};
use claimlens::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Check { external } => {
            if !commands::check(&config, external) {
                anyhow::bail!("configuration incomplete");
            }
        }
        Commands::Login { external } => {
            let mut ctx = SessionContext::new(config);
            commands::login(&mut ctx, external).await?;
        }
        Commands::Scrape { external } => {
            let mut ctx = SessionContext::new(config);
            commands::scrape(&mut ctx, external).await?;
        }
        Commands::Analyze { external } => {
            let mut ctx = SessionContext::new(config);
            commands::analyze(&mut ctx, external).await?;
        }
        Commands::Export { external, output } => {
            let mut ctx = SessionContext::new(config);
            commands::export(&mut ctx, external, &output).await?;
        }
        Commands::Tui { external } => {
            // Same launcher contract as `check`: refuse to start the
            // interactive process with incomplete configuration.
            if !commands::check(&config, external) {
                anyhow::bail!("configuration incomplete");
            }
            let mut ctx = SessionContext::new(config);
            claimlens::tui::run(&mut ctx).await?;
        }
    }

    Ok(())
}
