//! Dockerfile parser module.
//!
//! Provides:
//! - `instruction` - instruction records and argument normalization
//! - `dockerfile` - nom-based tokenizer behind the `InstructionParser` trait

pub mod dockerfile;
pub mod instruction;

pub use dockerfile::{
    DockerfileParser, InstructionParser, LogicalLine, ParseError, logical_lines, parse_dockerfile,
};
pub use instruction::*;
