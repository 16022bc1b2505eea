//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::RowfitConfig;
use std::path::Path;

/// File name looked up inside a project directory.
pub const CONFIG_FILE_NAME: &str = "rowfit.toml";

/// Loads and validates a `rowfit.toml` configuration from a project directory.
///
/// Reads `<project_dir>/rowfit.toml`, parses it, and validates its values.
pub fn load_config(project_dir: &Path) -> Result<RowfitConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `rowfit.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<RowfitConfig, ConfigError> {
    let config: RowfitConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Validates value ranges.
///
/// A swap stages two cells, so the move cap must allow at least two entries.
fn validate_config(config: &RowfitConfig) -> Result<(), ConfigError> {
    let lg = &config.legalizer;
    if lg.move_limit < 2 {
        return Err(invalid("legalizer.move_limit", "must be at least 2"));
    }
    if !(lg.target_utilization > 0.0 && lg.target_utilization <= 1.0) {
        return Err(invalid(
            "legalizer.target_utilization",
            "must be in the range (0, 1]",
        ));
    }
    if lg.max_displacement.iter().any(|&d| d < 0) {
        return Err(invalid("legalizer.max_displacement", "must not be negative"));
    }
    Ok(())
}
