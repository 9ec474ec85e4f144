use crate::error::CliError;
use planner::FilterSettings;
use tracing::info;

/// Loads settings from an optional JSON file, then applies command-line
/// overrides.
pub fn load(
    path: Option<&str>,
    max_depth: Option<usize>,
    separator: Option<String>,
) -> Result<FilterSettings, CliError> {
    let mut settings = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            info!("Loaded filter settings from {path}");
            FilterSettings::from_json(&json).map_err(|source| CliError::Settings {
                path: path.to_string(),
                source,
            })?
        }
        None => FilterSettings::default(),
    };

    if let Some(max_depth) = max_depth {
        settings = settings.with_max_depth(max_depth);
    }
    if let Some(separator) = separator {
        settings = settings.with_separator(separator);
    }

    Ok(settings)
}
