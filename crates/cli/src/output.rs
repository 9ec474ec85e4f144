use crate::error::CliError;
use serde::Serialize;

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    let json = serde_json::to_string_pretty(value)?;
    Ok(json)
}

/// Writes `value` as pretty JSON to `path`, or to stdout when no path is given.
pub fn emit<T: Serialize>(value: &T, path: Option<String>) -> Result<(), CliError> {
    let json = to_json(value)?;
    match path {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
