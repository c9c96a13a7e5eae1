//! Dockerfile instruction records.
//!
//! Rules see a deliberately flat shape: an uppercase keyword plus a
//! polymorphic argument payload. Anything regex-based goes through
//! `InstructionArgs::normalize`.

/// Instruction keywords the tokenizer accepts.
pub const KNOWN_INSTRUCTIONS: &[&str] = &[
    "ADD",
    "ARG",
    "CMD",
    "COPY",
    "ENTRYPOINT",
    "ENV",
    "EXPOSE",
    "FROM",
    "HEALTHCHECK",
    "LABEL",
    "MAINTAINER",
    "ONBUILD",
    "RUN",
    "SHELL",
    "STOPSIGNAL",
    "USER",
    "VOLUME",
    "WORKDIR",
];

/// Check whether a keyword is a Dockerfile instruction (case-insensitive).
pub fn is_known_instruction(keyword: &str) -> bool {
    KNOWN_INSTRUCTIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(keyword))
}

/// Argument payload of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionArgs {
    /// Shell form or plain value: `RUN apt-get update`, `USER node`
    Text(String),
    /// Exec form: `CMD ["node", "index.js"]`
    List(Vec<String>),
    /// Assignments in declaration order: `ENV A=1 B=2`
    Map(Vec<(String, String)>),
}

impl InstructionArgs {
    /// Collapse the payload into one string for pattern matching.
    ///
    /// Lists are joined with spaces; map entries render as `key=value`
    /// separated by spaces.
    pub fn normalize(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(" "),
            Self::Map(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Get the text if this is a plain payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the list if this is exec form.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Get the assignments if this is a mapping.
    pub fn as_map(&self) -> Option<&[(String, String)]> {
        match self {
            Self::Map(pairs) => Some(pairs),
            _ => None,
        }
    }
}

/// One parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Uppercase keyword (FROM, RUN, ...).
    pub name: String,
    /// Argument payload.
    pub args: InstructionArgs,
    /// Line the instruction starts on (1-indexed).
    pub line: u32,
    /// Original source text, continuations included.
    pub source_text: String,
}

impl Instruction {
    /// Create a new instruction; the keyword is uppercased.
    pub fn new(name: impl AsRef<str>, args: InstructionArgs, line: u32) -> Self {
        Self {
            name: name.as_ref().to_ascii_uppercase(),
            args,
            line,
            source_text: String::new(),
        }
    }

    /// Shorthand for a plain-text instruction, mostly for tests.
    pub fn text(name: impl AsRef<str>, value: impl Into<String>) -> Self {
        Self::new(name, InstructionArgs::Text(value.into()), 0)
    }

    pub fn with_source(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = source_text.into();
        self
    }

    /// Check the keyword (case-insensitive).
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Normalized argument string.
    pub fn value(&self) -> String {
        self.args.normalize()
    }
}
