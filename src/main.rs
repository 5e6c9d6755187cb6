//! Corechat - terminal chat client for a local AI brain
//!
//! Main entry point for the Corechat application.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use corechat::cli::{Cli, Commands};
use corechat::commands;
use corechat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load and validate configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat {
            mode,
            depth,
            resume,
            share_link,
        } => {
            if let Some(m) = &mode {
                tracing::debug!("Using mode override: {}", m);
            }
            if let Some(d) = &depth {
                tracing::debug!("Using depth override: {}", d);
            }
            if let Some(r) = &resume {
                tracing::debug!("Resuming session: {}", r);
            }
            commands::chat::run_chat(config, mode, depth, resume, share_link).await?;
            Ok(())
        }
        Commands::History { command } => {
            commands::history::handle_history(&config, command)?;
            Ok(())
        }
        Commands::Telemetry { command } => {
            commands::telemetry::handle_telemetry(&config, command).await?;
            Ok(())
        }
    }
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` selects debug level.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "corechat=debug" } else { "corechat=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
