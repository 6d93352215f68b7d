//! CLI command definitions.

use clap::{Parser, Subcommand};

/// Melies - narrated animation generation pipeline
#[derive(Parser, Debug)]
#[command(name = "melies")]
#[command(about = "Generate narrated animations from a topic prompt", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Bind address, overrides `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Bind port, overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run every pipeline stage for one prompt
    Run {
        /// Topic to animate
        #[arg(long)]
        prompt: String,

        /// Job id to resume, a fresh one is minted when absent
        #[arg(long)]
        job: Option<String>,
    },

    /// Print a job record as pretty JSON
    Job {
        /// Job id
        id: String,
    },

    /// Delete published media older than a cutoff
    Cleanup {
        /// Store prefix to sweep (e.g. "audio", "videos")
        #[arg(long)]
        prefix: String,

        /// Age cutoff in days
        #[arg(long, default_value = "30")]
        days: u64,
    },
}
