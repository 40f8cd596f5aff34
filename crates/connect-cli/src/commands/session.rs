//! `stacks-connect session`: inspect or clear the stored session.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use connect_core::config::ConnectConfig;
use connect_core::session::SessionStore;
use connect_core::storage::FileStorage;

use super::resolve_data_dir;

/// Session subcommands.
#[derive(Subcommand)]
pub enum SessionCommand {
    /// Print the stored session.
    Show,
    /// Delete the stored session.
    Clear,
}

pub fn run(
    command: SessionCommand,
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let configured = match config {
        Some(path) => ConnectConfig::from_file(&path)?.storage_dir,
        None => None,
    };
    let dir = resolve_data_dir(data_dir.or(configured))?;
    let storage = FileStorage::open(&dir)?;
    tracing::debug!(path = %storage.path().display(), "opened session storage");
    let store = SessionStore::new(Arc::new(storage));

    match command {
        SessionCommand::Show => match store.load()? {
            Some(session) => println!("{}", serde_json::to_string_pretty(&session)?),
            None => println!("No session stored."),
        },
        SessionCommand::Clear => {
            store.clear()?;
            println!("Session cleared.");
        }
    }
    Ok(())
}
