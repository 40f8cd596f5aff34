//! `stacks-connect codes`: print the error code table.

use connect_core::JsonRpcErrorCode;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    for line in code_table() {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn code_table() -> Vec<String> {
    JsonRpcErrorCode::ALL
        .iter()
        .map(|code| format!("{:>7}  {}", code.code(), code.name()))
        .collect()
}
