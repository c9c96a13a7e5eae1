//! # dockerfile-validator
//!
//! Validates Dockerfiles against a fixed catalog of security, best-practice
//! and optimization rules, scores them out of 100 and assigns a letter grade.
//!
//! ## Features
//!
//! - **Structured rules**: ten catalog rules over parsed instructions
//! - **BuildKit aware**: heredocs and mounts fall back to line heuristics
//! - **Security cap**: running as root, sudo or hardcoded secrets cap the grade at C
//! - **External findings**: hadolint results are merged in when available
//!
//! ## Example
//!
//! ```rust,no_run
//! use dockerfile_validator::{DockerfileValidator, ValidationOptions};
//!
//! # async fn demo() {
//! let validator = DockerfileValidator::new();
//! let report = validator
//!     .validate("FROM node:20-alpine\nUSER node\n", &ValidationOptions::default())
//!     .await;
//! println!("{}/100 ({})", report.score, report.grade);
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod linter;
pub mod validator;

pub use error::{Result, ValidatorError};
pub use validator::{
    DockerfileValidator, Grade, Severity, ValidationOptions, ValidationReport, ValidationResult,
    validate_dockerfile,
};

use std::io::{IsTerminal, Read, Write};
use std::sync::Arc;

use cli::Cli;
use formatter::{OutputFormat, format_report};
use linter::HadolintLinter;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the CLI. Returns `Ok(false)` when the score is below the configured
/// `fail_under` threshold.
pub async fn run(cli: &Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(cli.project_dir())?,
    };
    cli.apply_overrides(&mut config);

    let (content, filename) = if cli.reads_stdin() {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        (content, "<stdin>".to_string())
    } else {
        (
            std::fs::read_to_string(&cli.path)?,
            cli.path.display().to_string(),
        )
    };

    let linter = HadolintLinter::with_binary(config.linter.binary.clone())
        .with_args(config.linter.extra_args.clone());
    let validator = DockerfileValidator::new().with_linter(Arc::new(linter));

    let report = validator
        .validate(&content, &config.validation_options())
        .await;

    let stdout = std::io::stdout();
    let colors = config.output.format == OutputFormat::Tty && !cli.no_color && stdout.is_terminal();
    let mut handle = stdout.lock();
    format_report(&report, &filename, config.output.format, colors, &mut handle)?;
    handle.flush()?;

    Ok(match config.output.fail_under {
        Some(threshold) if report.score < threshold => {
            log::info!("Score {} is below the threshold of {}", report.score, threshold);
            false
        }
        _ => true,
    })
}
