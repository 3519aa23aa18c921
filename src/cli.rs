//! Command-line interface for userdesk.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// userdesk - user records over HTTP, as JSON or HTML
#[derive(Parser)]
#[command(name = "userdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server
    #[default]
    Serve,

    /// Write a default config file and exit
    Init,

    /// Apply database migrations and exit
    Migrate,
}
