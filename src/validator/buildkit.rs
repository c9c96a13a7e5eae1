//! BuildKit feature detection.
//!
//! Scans raw text (not parsed instructions, since the tokenizer may reject
//! exactly these constructs) for the extended-syntax markers that decide
//! which evaluation path runs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static SYNTAX_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*#\s*syntax\s*=\s*(\S+)").unwrap());
static HEREDOC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?im)^\s*(?:RUN|COPY|ADD)\s.*<<-?\s*["']?[A-Za-z_][A-Za-z0-9_]*"#).unwrap()
});
static MOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?im)^\s*RUN\s+.*--mount\b").unwrap());
static SECRET_MOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*RUN\s+.*--mount=(?:\S*,)?type=secret").unwrap());
static MOUNT_SPEC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)--mount=(\S+)").unwrap());
static MOUNT_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?:^|,)type=([a-z]+)").unwrap());

/// Extended-syntax features found in a build file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildKitFeatures {
    /// Value of a `# syntax=` directive, if any.
    pub syntax_directive: Option<String>,
    pub has_heredocs: bool,
    pub has_mounts: bool,
    pub has_secret_mounts: bool,
}

impl BuildKitFeatures {
    /// Detect features in raw Dockerfile text.
    pub fn detect(content: &str) -> Self {
        let syntax_directive = leading_syntax_directive(content);

        Self {
            syntax_directive,
            has_heredocs: HEREDOC.is_match(content),
            has_mounts: MOUNT.is_match(content),
            has_secret_mounts: SECRET_MOUNT.is_match(content),
        }
    }

    /// Check if any extended feature is in use.
    pub fn any(&self) -> bool {
        self.syntax_directive.is_some() || self.has_heredocs || self.has_mounts || self.has_secret_mounts
    }
}

/// Parser directives are only honoured before the first instruction, so
/// only the leading comment block is searched.
fn leading_syntax_directive(content: &str) -> Option<String> {
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !trimmed.starts_with('#') {
            return None;
        }
        if let Some(caps) = SYNTAX_DIRECTIVE.captures(trimmed) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Check whether a line uses a secret mount.
pub fn is_secret_mount_line(line: &str) -> bool {
    SECRET_MOUNT.is_match(line) || line.contains("--mount=type=secret")
}

/// Check whether a line uses a cache, bind, tmpfs or ssh mount.
///
/// A mount without `type=` is a bind mount.
pub fn has_non_secret_mount(line: &str) -> bool {
    MOUNT_SPEC.captures_iter(line).any(|caps| {
        MOUNT_TYPE
            .captures(&caps[1])
            .is_none_or(|t| !t[1].eq_ignore_ascii_case("secret"))
    })
}
