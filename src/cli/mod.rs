//! CLI module for Chirpy
//!
//! Provides command-line interface parsing for the chirpy-server binary.

use clap::Parser;
use std::path::PathBuf;

/// Chirpy - microblogging API server
#[derive(Parser, Debug)]
#[command(
    name = "chirpy-server",
    version,
    about = "Chirpy - microblogging API server",
    after_help = "EXAMPLES:\n    \
                  chirpy-server                      # Start with ./chirpy.toml\n    \
                  chirpy-server --config prod.toml   # Use a custom config file\n    \
                  chirpy-server -v                   # Debug logging"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "chirpy.toml")]
    pub config: PathBuf,

    /// Enable verbose output (overrides server.log_level with debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log filter directive for this run. `RUST_LOG` still wins when set.
    pub fn log_filter(&self, configured_level: &str) -> String {
        let level = if self.verbose { "debug" } else { configured_level };
        format!("chirpy={level},tower_http={level}")
    }
}
