//! CLI module - Command-line interface for the movie API
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Movie catalog and review service
#[derive(Parser)]
#[command(name = "movie-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    #[command(alias = "server", alias = "web")]
    Serve,

    /// Load genres, countries, languages and people from a TOML file
    Seed {
        /// Path to the seed file
        file: PathBuf,
    },

    /// Create default config file
    #[command(alias = "init")]
    InitConfig,
}

pub use commands::*;
