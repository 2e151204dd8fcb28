//! CLI argument definitions using clap
//!
//! Commands:
//! - rowquery query --config <path>
//! - rowquery explain --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rowquery - composable, deterministic row queries over JSON documents
#[derive(Parser, Debug)]
#[command(name = "rowquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a single query read from stdin and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./rowquery.json")]
        config: PathBuf,
    },

    /// Describe a query read from stdin without executing it
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./rowquery.json")]
        config: PathBuf,
    },
}

impl Command {
    /// Path of the configuration file
    pub fn config_path(&self) -> &PathBuf {
        match self {
            Command::Query { config } | Command::Explain { config } => config,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
