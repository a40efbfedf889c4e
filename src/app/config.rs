//! Provisioner configuration file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{AppError, InstallationSpec, ValidationSpec};

/// Configuration path used when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "goss-provisioner.toml";

/// One `[installation]` and one `[validate]` table; both optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub installation: InstallationSpec,
    #[serde(default)]
    pub validate: ValidationSpec,
}

/// Read and decode the configuration at `path`.
pub fn load_config(path: &Path) -> Result<Config, AppError> {
    let content = fs::read_to_string(path).map_err(|e| AppError::file_error(path.display(), e))?;
    parse_config_content(&content)
}

/// Decode configuration from TOML content.
pub fn parse_config_content(content: &str) -> Result<Config, AppError> {
    Ok(toml::from_str(content)?)
}
