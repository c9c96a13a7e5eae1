use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::ValidatorConfig;
use crate::formatter::OutputFormat;

/// Marker path meaning "read the Dockerfile from stdin".
pub const STDIN_MARKER: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "dfvalidate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate and score Dockerfiles")]
#[command(long_about = "Checks a Dockerfile against security, best-practice and optimization rules, scores it out of 100 with a letter grade, and merges in hadolint findings when the binary is available.")]
pub struct Cli {
    /// Dockerfile to validate, or '-' to read from stdin
    #[arg(value_name = "DOCKERFILE", default_value = "Dockerfile")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Skip the external linter
    #[arg(long)]
    pub no_external_linter: bool,

    /// External linter binary to run instead of 'hadolint'
    #[arg(long, value_name = "BINARY")]
    pub linter_bin: Option<String>,

    /// Target platform, e.g. linux/arm64
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Enforce platform-specific validation
    #[arg(long)]
    pub strict_platform: bool,

    /// Exit with status 1 when the score is below this value
    #[arg(long, value_name = "SCORE", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub fail_under: Option<u8>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }

    /// Check whether input comes from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.path.as_os_str() == STDIN_MARKER
    }

    /// Directory searched for a project-local config file.
    pub fn project_dir(&self) -> Option<&Path> {
        if self.reads_stdin() {
            return None;
        }
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Some(parent),
            _ => Some(Path::new(".")),
        }
    }

    /// Apply command-line overrides on top of file configuration.
    pub fn apply_overrides(&self, config: &mut ValidatorConfig) {
        if self.no_external_linter {
            config.validation.enable_external_linter = false;
        }
        if let Some(binary) = &self.linter_bin {
            config.linter.binary = binary.clone();
        }
        if let Some(platform) = &self.platform {
            config.validation.target_platform = Some(platform.clone());
        }
        if self.strict_platform {
            config.validation.strict_platform_validation = true;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(threshold) = self.fail_under {
            config.output.fail_under = Some(threshold);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["dfvalidate"]);
        assert_eq!(cli.path, PathBuf::from("Dockerfile"));
        assert!(!cli.reads_stdin());
        assert_eq!(cli.project_dir(), Some(Path::new(".")));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "dfvalidate",
            "-",
            "--format",
            "json",
            "--no-external-linter",
            "--platform",
            "linux/arm64",
            "--fail-under",
            "75",
        ]);
        assert!(cli.reads_stdin());
        assert_eq!(cli.project_dir(), None);

        let mut config = ValidatorConfig::default();
        cli.apply_overrides(&mut config);
        assert!(!config.validation.enable_external_linter);
        assert_eq!(config.validation.target_platform.as_deref(), Some("linux/arm64"));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.fail_under, Some(75));
    }

    #[test]
    fn test_fail_under_range() {
        assert!(Cli::try_parse_from(["dfvalidate", "--fail-under", "101"]).is_err());
    }

    #[test]
    fn test_project_dir() {
        let cli = Cli::parse_from(["dfvalidate", "services/api/Dockerfile"]);
        assert_eq!(cli.project_dir(), Some(Path::new("services/api")));
    }
}
