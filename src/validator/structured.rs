//! Structured evaluation: tokenize, then run every catalog rule.

use std::sync::Arc;

use super::EvaluationStrategy;
use super::parser::{DockerfileParser, Instruction, InstructionParser, ParseError};
use super::rules::all_rules;
use super::types::{EvaluationPath, ValidationResult};

/// Runs the rule catalog over parsed instructions.
#[derive(Clone)]
pub struct StructuredEvaluator {
    parser: Arc<dyn InstructionParser>,
}

impl StructuredEvaluator {
    pub fn new(parser: Arc<dyn InstructionParser>) -> Self {
        Self { parser }
    }

    /// Evaluate already-parsed instructions, one verdict per rule in catalog order.
    pub fn evaluate_instructions(instructions: &[Instruction]) -> Vec<ValidationResult> {
        all_rules()
            .iter()
            .map(|rule| rule.evaluate(instructions))
            .collect()
    }
}

impl Default for StructuredEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(DockerfileParser::new()))
    }
}

impl EvaluationStrategy for StructuredEvaluator {
    fn path(&self) -> EvaluationPath {
        EvaluationPath::Structured
    }

    fn evaluate(&self, content: &str) -> Result<Vec<ValidationResult>, ParseError> {
        let instructions = self.parser.parse(content)?;
        log::debug!("Parsed {} instructions", instructions.len());
        Ok(Self::evaluate_instructions(&instructions))
    }
}
