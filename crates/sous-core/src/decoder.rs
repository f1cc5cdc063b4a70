//! Field decoding for list-valued recipe columns.
//!
//! A cell is decoded by the first [`Rule`] whose prefix matches the start of
//! the raw text. No match yields an empty list, which is a valid outcome the
//! import pipeline uses as a filter signal. A matching `c(...)` cell that
//! fails to parse is a [`RecordError::MalformedLiteral`].

use tracing::error;

use crate::error::RecordError;
use crate::literal::{LiteralError, VECTOR_LITERAL_PREFIX, parse_vector_literal};

/// Produces the decoded sequence for a cell that matched a rule's prefix.
pub type Handler = fn(&str) -> Result<Vec<String>, LiteralError>;

/// A `(prefix, handler)` pair.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub prefix: &'static str,
    pub handler: Handler,
}

impl Rule {
    pub const fn new(prefix: &'static str, handler: Handler) -> Self {
        Self { prefix, handler }
    }
}

/// Keeps the whole cell, verbatim, as the only element.
fn whole_field(raw: &str) -> Result<Vec<String>, LiteralError> {
    Ok(vec![raw.to_string()])
}

const VECTOR_RULE: Rule = Rule::new(VECTOR_LITERAL_PREFIX, parse_vector_literal);

/// `c(...)` or a bare quoted URL.
pub const IMAGE_RULES: &[Rule] = &[VECTOR_RULE, Rule::new("\"http", whole_field)];

/// `c(...)` or a bare quoted string.
pub const INSTRUCTION_RULES: &[Rule] = &[VECTOR_RULE, Rule::new("\"", whole_field)];

/// `c(...)` only.
pub const LIST_ONLY_RULES: &[Rule] = &[VECTOR_RULE];

/// Decodes `raw` with the first rule whose prefix matches.
pub fn decode_field(raw: &str, rules: &[Rule]) -> Result<Vec<String>, RecordError> {
    let Some(rule) = rules.iter().find(|rule| raw.starts_with(rule.prefix)) else {
        return Ok(Vec::new());
    };

    (rule.handler)(raw).map_err(|source| {
        error!(text = raw, error = %source, "Failed to parse vector literal");
        RecordError::MalformedLiteral {
            text: raw.to_string(),
            source,
        }
    })
}

pub fn decode_images(raw: &str) -> Result<Vec<String>, RecordError> {
    decode_field(raw, IMAGE_RULES)
}

pub fn decode_instructions(raw: &str) -> Result<Vec<String>, RecordError> {
    decode_field(raw, INSTRUCTION_RULES)
}

pub fn decode_keywords(raw: &str) -> Result<Vec<String>, RecordError> {
    decode_field(raw, LIST_ONLY_RULES)
}

pub fn decode_ingredients(raw: &str) -> Result<Vec<String>, RecordError> {
    decode_field(raw, LIST_ONLY_RULES)
}
