//! Melies CLI binary.
//!
//! This binary provides command-line access to the pipeline:
//! - Serve the HTTP API
//! - Run every stage for one prompt locally
//! - Inspect job records and sweep aged media

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_cleanup, handle_serve, run_pipeline, show_job};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing; --verbose overrides RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let settings = melies::config::Settings::load()?;

    // Execute the requested command
    match cli.command {
        Commands::Serve { host, port } => {
            handle_serve(settings, host, port).await?;
        }

        Commands::Run { prompt, job } => {
            run_pipeline(&settings, &prompt, job.as_deref()).await?;
        }

        Commands::Job { id } => {
            show_job(&settings, &id).await?;
        }

        Commands::Cleanup { prefix, days } => {
            handle_cleanup(&settings, &prefix, days).await?;
        }
    }

    Ok(())
}
