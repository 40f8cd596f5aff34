//! # stacks-connect CLI
//!
//! Entry point for the `stacks-connect` binary.
//!
//! Subcommands:
//! - `stacks-connect convert`       Legacy Clarity JSON to the current form
//! - `stacks-connect normalize`     Strip and dedupe wallet addresses
//! - `stacks-connect codes`         Print the JSON-RPC error code table
//! - `stacks-connect format-error`  Render a wire error object
//! - `stacks-connect session`       Inspect or clear the stored session

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Offline utilities for Stacks wallet connections.
#[derive(Parser)]
#[command(name = "stacks-connect", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert Clarity values to the current JSON representation.
    Convert {
        /// JSON file holding one value or an array of values (default: stdin).
        input: Option<PathBuf>,
    },

    /// Normalize wallet addresses for storage.
    Normalize {
        /// JSON file holding an address array or `{"addresses": [...]}` (default: stdin).
        input: Option<PathBuf>,
    },

    /// Print every known JSON-RPC error code.
    Codes,

    /// Render a JSON-RPC error object the way the client reports it.
    FormatError {
        /// JSON file holding `{"code", "message", "data"?}` (default: stdin).
        input: Option<PathBuf>,
    },

    /// Inspect the persisted connection session.
    Session {
        /// Path to config.yaml (its storage_dir is used when set).
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Data directory (default: ~/.stacks-connect).
        #[arg(long)]
        data_dir: Option<PathBuf>,

        #[command(subcommand)]
        command: commands::session::SessionCommand,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { input } => commands::convert::run(input),
        Commands::Normalize { input } => commands::normalize::run(input),
        Commands::Codes => commands::codes::run(),
        Commands::FormatError { input } => commands::format_error::run(input),
        Commands::Session {
            config,
            data_dir,
            command,
        } => commands::session::run(command, config, data_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
