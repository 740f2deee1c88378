//! # gripview CLI Module
//!
//! This module implements the CLI interface for gripview.
//!
//! ## Available Commands
//!
//! - `inspect` - Expand a recorded snapshot and print its tree
//! - `buckets` - Show how an array of a given length is bucketed
//! - `rename` - Rewrite an expression against source-mapped scopes

mod commands;

use crate::config::AppConfig;
use crate::error::CliError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// gripview - Debugger object inspector
///
/// Expands recorded value grips into the lazy tree a debugger variables
/// panel shows, and reports which property fetches are still pending.
#[derive(Parser, Debug)]
#[command(name = "gripview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file (defaults to $GRIPVIEW_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand a snapshot and print the visible rows
    Inspect {
        /// Path to the snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Levels to expand (overrides the configured depth)
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Show the bucket layout of an array of the given length
    Buckets {
        /// Declared array length
        #[arg(short, long)]
        length: u64,
    },

    /// Rename original variables in an expression to their generated names
    Rename {
        /// Expression written against the original source
        #[arg(short, long)]
        expression: String,

        /// Path to a JSON array of scope bindings, innermost first
        #[arg(short, long)]
        scopes: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), CliError> {
    let json_mode = cli.json_mode;
    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.verbose {
        tracing::info!(?config, "effective configuration");
    }

    match cli.command {
        Some(Commands::Inspect { snapshot, depth }) => {
            let depth = depth.unwrap_or(config.display.depth);
            cmd_inspect(&config, &snapshot, depth, json_mode)
        }
        Some(Commands::Buckets { length }) => cmd_buckets(length, json_mode),
        Some(Commands::Rename { expression, scopes }) => {
            cmd_rename(&expression, &scopes, json_mode)
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    }
}
