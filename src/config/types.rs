use serde::{Deserialize, Serialize};

use crate::formatter::OutputFormat;
use crate::linter::hadolint::DEFAULT_BINARY;
use crate::validator::ValidationOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub validation: ValidationConfig,
    pub linter: LinterConfig,
    pub output: OutputConfig,
}

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub enable_external_linter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_platform: Option<String>,
    pub strict_platform_validation: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enable_external_linter: true,
            target_platform: None,
            strict_platform_validation: false,
        }
    }
}

/// External linter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinterConfig {
    /// Binary to run, resolved through PATH when not absolute
    pub binary: String,
    /// Extra arguments, e.g. `["--ignore", "DL3008"]`
    pub extra_args: Vec<String>,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Exit non-zero when the score falls below this value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_under: Option<u8>,
}

impl ValidatorConfig {
    /// Engine options derived from the `[validation]` section.
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            enable_external_linter: self.validation.enable_external_linter,
            target_platform: self.validation.target_platform.clone(),
            strict_platform_validation: self.validation.strict_platform_validation,
        }
    }
}
