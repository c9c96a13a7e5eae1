pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use types::{LinterConfig, OutputConfig, ValidationConfig, ValidatorConfig};

const CONFIG_FILE_NAME: &str = ".dockerfile-validator.toml";

/// Get the global config file path (~/.dockerfile-validator.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (project/.dockerfile-validator.toml)
pub fn local_config_path(project_path: &Path) -> PathBuf {
    project_path.join(CONFIG_FILE_NAME)
}

/// Load configuration from file or use defaults
/// Checks local config first, then global config
pub fn load_config(project_path: Option<&Path>) -> Result<ValidatorConfig> {
    if let Some(path) = project_path {
        let local = local_config_path(path);
        if local.exists() {
            match load_config_file(&local) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Ignoring {}: {}", local.display(), e),
            }
        }
    }

    if let Some(global) = global_config_path() {
        if global.exists() {
            match load_config_file(&global) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Ignoring {}: {}", global.display(), e),
            }
        }
    }

    Ok(ValidatorConfig::default())
}

/// Load an explicitly named config file; errors are not swallowed.
pub fn load_config_file(path: &Path) -> Result<ValidatorConfig> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and check a TOML document.
pub fn parse_config(content: &str) -> Result<ValidatorConfig> {
    let config: ValidatorConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;

    if let Some(threshold) = config.output.fail_under {
        if threshold > 100 {
            return Err(ConfigError::InvalidValue {
                key: "output.fail_under".to_string(),
                value: threshold.to_string(),
            }
            .into());
        }
    }

    if config.linter.binary.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "linter.binary".to_string(),
            value: config.linter.binary.clone(),
        }
        .into());
    }

    Ok(config)
}
