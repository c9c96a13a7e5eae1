//! External linter integration.
//!
//! The engine treats the external linter as an opaque collaborator: it
//! receives the Dockerfile text and answers with an independently scored
//! report, or an error. Errors never reach validation callers; the
//! validator logs them and keeps its internal report.

use async_trait::async_trait;

use crate::error::Result;
use crate::validator::types::ValidationReport;

pub mod hadolint;

pub use hadolint::HadolintLinter;

/// A linter whose findings are merged into the internal report.
#[async_trait]
pub trait ExternalLinter: Send + Sync {
    /// Name used in log messages.
    fn name(&self) -> &str;

    /// Lint Dockerfile content.
    async fn lint(&self, content: &str) -> Result<ValidationReport>;
}
