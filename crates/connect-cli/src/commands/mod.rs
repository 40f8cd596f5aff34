//! CLI subcommand implementations.

use std::io::Read;
use std::path::PathBuf;

pub mod codes;
pub mod convert;
pub mod format_error;
pub mod normalize;
pub mod session;

pub(crate) fn resolve_data_dir(
    data_dir: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(dir) = data_dir {
        return Ok(dir);
    }

    let home = dirs::home_dir().ok_or("could not determine home directory")?;
    Ok(home.join(".stacks-connect"))
}

/// Read a JSON document from `input`, or stdin when absent.
pub(crate) fn read_json(
    input: Option<PathBuf>,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn print_json(value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
