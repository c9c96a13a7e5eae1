//! Dockerfile tokenizer using nom.
//!
//! Turns Dockerfile text into a flat list of `Instruction` records. The
//! tokenizer only knows the classic instruction grammar: anything that does
//! not start with a known keyword (heredoc bodies in particular) is rejected,
//! which the engine uses as its cue to fall back to line heuristics.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    multi::separated_list0,
    sequence::tuple,
    IResult,
};
use std::fmt;

use super::instruction::{Instruction, InstructionArgs, is_known_instruction};

/// Parse error information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, if available).
    pub column: Option<u32>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            line,
            column: None,
        }
    }

    pub fn at_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(col) => write!(f, "line {}:{}: {}", self.line, col, self.message),
            None => write!(f, "line {}: {}", self.line, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Converts build-file text into instruction records.
///
/// The engine only talks to the tokenizer through this trait so the
/// implementation can be swapped without touching the rule catalog.
pub trait InstructionParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Vec<Instruction>, ParseError>;
}

/// Default nom-based tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerfileParser;

impl DockerfileParser {
    pub fn new() -> Self {
        Self
    }
}

impl InstructionParser for DockerfileParser {
    fn parse(&self, text: &str) -> Result<Vec<Instruction>, ParseError> {
        parse_dockerfile(text)
    }
}

/// A logical line: physical lines joined across `\` continuations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// First physical line (1-indexed).
    pub start_line: u32,
    /// Joined content with continuation markers removed.
    pub content: String,
    /// Original text of every physical line involved.
    pub source_text: String,
}

/// Split text into logical lines, joining continuations.
///
/// Comment lines inside a continuation are dropped, as Docker does.
pub fn logical_lines(input: &str) -> Vec<LogicalLine> {
    let lines: Vec<&str> = input.lines().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let start_line = (i + 1) as u32;
        let mut combined = String::new();
        let mut source_text = String::new();

        loop {
            let line = lines[i];
            source_text.push_str(line);
            source_text.push('\n');
            i += 1;

            let trimmed = line.trim_end();
            if trimmed.trim_start().starts_with('#') {
                if combined.is_empty() {
                    // Comments never continue onto the next line
                    combined.push_str(trimmed);
                    break;
                }
                if i >= lines.len() {
                    break;
                }
                continue;
            }

            if let Some(stripped) = trimmed.strip_suffix('\\') {
                combined.push_str(stripped);
                combined.push(' ');
                if i >= lines.len() {
                    break;
                }
            } else {
                combined.push_str(trimmed);
                break;
            }
        }

        out.push(LogicalLine {
            start_line,
            content: combined.trim().to_string(),
            source_text: source_text.trim_end().to_string(),
        });
    }

    out
}

/// Parse a Dockerfile string into a list of instructions.
pub fn parse_dockerfile(input: &str) -> Result<Vec<Instruction>, ParseError> {
    let mut instructions = Vec::new();

    for logical in logical_lines(input) {
        let trimmed = logical.content.as_str();

        // Blank lines, comments and parser directives carry no instruction
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let instruction = parse_instruction(trimmed, logical.start_line)?;
        instructions.push(instruction.with_source(logical.source_text));
    }

    Ok(instructions)
}

/// Parse one logical line.
fn parse_instruction(line: &str, line_number: u32) -> Result<Instruction, ParseError> {
    let (rest, keyword) = parse_keyword(line).map_err(|_| {
        let token = line.split_whitespace().next().unwrap_or(line);
        ParseError::new(format!("Unexpected token '{}'", token), line_number).at_column(1)
    })?;

    if !is_known_instruction(keyword) {
        return Err(
            ParseError::new(format!("Unknown instruction: {}", keyword), line_number).at_column(1),
        );
    }

    let name = keyword.to_ascii_uppercase();
    let rest = rest.trim();

    if rest.is_empty() && requires_arguments(&name) {
        return Err(ParseError::new(
            format!("{} requires at least one argument", name),
            line_number,
        ));
    }

    let args = match name.as_str() {
        "ENV" | "LABEL" => InstructionArgs::Map(parse_key_value_pairs(rest)),
        "ARG" if rest.contains('=') => InstructionArgs::Map(parse_key_value_pairs(rest)),
        "CMD" | "ENTRYPOINT" | "RUN" | "SHELL" | "VOLUME" => parse_arguments(rest),
        _ => InstructionArgs::Text(rest.to_string()),
    };

    Ok(Instruction::new(name, args, line_number))
}

fn requires_arguments(name: &str) -> bool {
    !matches!(name, "CMD" | "ENTRYPOINT" | "RUN" | "HEALTHCHECK")
}

/// Parse the instruction keyword and the whitespace after it.
fn parse_keyword(input: &str) -> IResult<&str, &str> {
    let (input, keyword) = take_while1(|c: char| c.is_ascii_alphabetic())(input)?;
    match input.chars().next() {
        None => Ok((input, keyword)),
        Some(c) if c.is_whitespace() => {
            let (input, _) = space0(input)?;
            Ok((input, keyword))
        }
        Some(_) => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Space,
        ))),
    }
}

/// Parse arguments as exec form when they are a complete JSON array,
/// otherwise keep them as shell form.
fn parse_arguments(input: &str) -> InstructionArgs {
    match parse_json_array(input) {
        Ok((remaining, list)) if remaining.trim().is_empty() => InstructionArgs::List(list),
        _ => InstructionArgs::Text(input.trim().to_string()),
    }
}

/// Parse JSON array for exec form.
fn parse_json_array(input: &str) -> IResult<&str, Vec<String>> {
    let (input, _) = char('[')(input)?;
    let (input, _) = space0(input)?;
    let (input, items) =
        separated_list0(tuple((space0, char(','), space0)), parse_json_string)(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = char(']')(input)?;
    Ok((input, items))
}

/// Parse a JSON string.
fn parse_json_string(input: &str) -> IResult<&str, String> {
    let (input, _) = char('"')(input)?;
    let mut result = String::new();
    let mut chars = input.chars();
    let mut consumed = 0;

    while let Some(c) = chars.next() {
        consumed += c.len_utf8();
        if c == '"' {
            return Ok((&input[consumed..], result));
        } else if c == '\\' {
            if let Some(next) = chars.next() {
                consumed += next.len_utf8();
                match next {
                    'n' => result.push('\n'),
                    't' => result.push('\t'),
                    'r' => result.push('\r'),
                    '\\' => result.push('\\'),
                    '"' => result.push('"'),
                    _ => {
                        result.push('\\');
                        result.push(next);
                    }
                }
            }
        } else {
            result.push(c);
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Parse `KEY=VALUE` pairs, or the legacy single `KEY VALUE` form.
fn parse_key_value_pairs(input: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut remaining = input.trim();

    while !remaining.is_empty() {
        let key_end = remaining
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(remaining.len());
        if key_end == 0 {
            // Stray '=' with no key
            remaining = remaining[1..].trim_start();
            continue;
        }

        let key = &remaining[..key_end];
        remaining = &remaining[key_end..];

        if let Some(after_eq) = remaining.strip_prefix('=') {
            remaining = after_eq;
            let value = if remaining.starts_with('"') {
                let end = find_closing_quote(remaining);
                let val = &remaining[1..end];
                remaining = remaining.get(end + 1..).unwrap_or("");
                val.to_string()
            } else {
                let end = remaining
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(remaining.len());
                let val = &remaining[..end];
                remaining = &remaining[end..];
                val.to_string()
            };
            pairs.push((key.to_string(), value));
        } else {
            // Legacy format: KEY VALUE (the rest of the line is the value)
            let value = remaining.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            pairs.push((key.to_string(), value.to_string()));
            break;
        }

        remaining = remaining.trim_start();
    }

    pairs
}

/// Find the closing quote position; `s.len()` when unterminated.
fn find_closing_quote(s: &str) -> usize {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return i;
        }
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from() {
        let result = parse_dockerfile("FROM ubuntu:20.04 AS builder").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "FROM");
        assert_eq!(result[0].value(), "ubuntu:20.04 AS builder");
        assert_eq!(result[0].line, 1);
    }

    #[test]
    fn test_lowercase_keyword_is_uppercased() {
        let result = parse_dockerfile("from alpine:3.19").unwrap();
        assert_eq!(result[0].name, "FROM");
    }

    #[test]
    fn test_parse_run_exec() {
        let result = parse_dockerfile(r#"RUN ["apt-get", "update"]"#).unwrap();
        assert_eq!(
            result[0].args.as_list(),
            Some(&["apt-get".to_string(), "update".to_string()][..])
        );
    }

    #[test]
    fn test_parse_cmd_with_trailing_text_is_shell_form() {
        let result = parse_dockerfile(r#"CMD ["node"] extra"#).unwrap();
        assert_eq!(result[0].args.as_text(), Some(r#"["node"] extra"#));
    }

    #[test]
    fn test_parse_env_pairs() {
        let result = parse_dockerfile(r#"ENV NODE_ENV=production PORT="3000""#).unwrap();
        assert_eq!(
            result[0].args.as_map().unwrap(),
            &[
                ("NODE_ENV".to_string(), "production".to_string()),
                ("PORT".to_string(), "3000".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_env_legacy_form() {
        let result = parse_dockerfile("ENV API_KEY sk_live_abcdef").unwrap();
        assert_eq!(result[0].value(), "API_KEY=sk_live_abcdef");
    }

    #[test]
    fn test_unterminated_quote_takes_rest() {
        let result = parse_dockerfile("ENV A=\"").unwrap();
        assert_eq!(result[0].args.as_map().unwrap(), &[("A".to_string(), String::new())]);

        let result = parse_dockerfile("ENV A=\"abc def").unwrap();
        assert_eq!(result[0].value(), "A=abc def");
    }

    #[test]
    fn test_parse_arg_without_default_is_text() {
        let result = parse_dockerfile("ARG VERSION").unwrap();
        assert_eq!(result[0].args.as_text(), Some("VERSION"));

        let result = parse_dockerfile("ARG VERSION=1.2.3").unwrap();
        assert_eq!(result[0].value(), "VERSION=1.2.3");
    }

    #[test]
    fn test_line_continuation() {
        let dockerfile = "RUN apt-get update && \\\n    apt-get install -y nginx\nUSER app";
        let result = parse_dockerfile(dockerfile).unwrap();
        assert_eq!(result.len(), 2);
        let text = result[0].args.as_text().unwrap();
        assert!(text.contains("apt-get update"));
        assert!(text.contains("apt-get install"));
        assert_eq!(result[1].line, 3);
    }

    #[test]
    fn test_comments_and_directives_skipped() {
        let dockerfile = "# syntax=docker/dockerfile:1\n# comment\nFROM alpine:3.19\n";
        let result = parse_dockerfile(dockerfile).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].line, 3);
    }

    #[test]
    fn test_unknown_instruction_fails() {
        let err = parse_dockerfile("FROM alpine:3.19\nFOO bar").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("FOO"));
    }

    #[test]
    fn test_heredoc_body_fails() {
        let dockerfile = "FROM alpine:3.19\nRUN <<EOF\napk add curl\nEOF\n";
        let err = parse_dockerfile(dockerfile).unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_mount_flags_tokenize() {
        let dockerfile =
            "FROM python:3.11-slim\nRUN --mount=type=cache,target=/root/.cache pip install -r requirements.txt\n";
        let result = parse_dockerfile(dockerfile).unwrap();
        assert!(result[1].value().starts_with("--mount=type=cache"));
    }

    #[test]
    fn test_missing_arguments_fail() {
        assert!(parse_dockerfile("FROM").is_err());
        assert!(parse_dockerfile("FROM alpine:3.19\nCMD").is_ok());
    }

    #[test]
    fn test_source_text_retained() {
        let result = parse_dockerfile("RUN echo a \\\n  && echo b").unwrap();
        assert_eq!(result[0].source_text, "RUN echo a \\\n  && echo b");
    }
}
