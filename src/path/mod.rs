//! SVG path data (`d` attribute) parsing
//!
//! Supports the M, L, H, V, C, S, Q, T and Z command families in absolute and
//! relative forms. Quadratic segments are elevated to cubics. Arcs are
//! recognized but reported as unsupported.

pub mod lexer;
mod parser;

pub use parser::PathParser;

use thiserror::Error;

use crate::instruction::Instruction;
use crate::transform::AffineTransform;

/// Failure inside one path data string, located by byte offset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("{message} at offset {offset}")]
    Syntax { offset: usize, message: String },

    #[error("unsupported command '{command}' at offset {offset}")]
    Unsupported { offset: usize, command: char },
}

impl PathError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        PathError::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            PathError::Syntax { offset, .. } | PathError::Unsupported { offset, .. } => *offset,
        }
    }
}

/// Parse a whole path data string.
///
/// Returns the instructions of the valid prefix together with the error that
/// stopped parsing, if any.
pub fn parse_path_data(data: &str, transform: &AffineTransform) -> (Vec<Instruction>, Option<PathError>) {
    let mut instructions = Vec::new();
    for result in PathParser::new(data, *transform) {
        match result {
            Ok(instruction) => instructions.push(instruction),
            Err(err) => return (instructions, Some(err)),
        }
    }
    (instructions, None)
}
