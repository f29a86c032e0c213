//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// tinyhop - expiring, optionally password-protected short links
#[derive(Parser, Debug)]
#[command(name = "tinyhop")]
#[command(version)]
#[command(about = "A single-tenant URL shortener", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Generate an example configuration file
    GenerateConfig {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,
    },
}
