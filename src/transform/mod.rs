//! Affine transform engine
//!
//! Parses the SVG `transform` attribute grammar (`op(args) [op(args)]*` with
//! `op` one of `translate`, `scale`, `rotate`, `skewX`, `skewY`, `matrix`) into a
//! single [`AffineTransform`]. Operations compose in textual order, so later
//! operations act in the local frame established by earlier ones.

mod grammar;
pub mod lexer;
mod matrix;

pub use grammar::{parse_ops, TransformOp};
pub use matrix::{compose, AffineTransform, Point};

use thiserror::Error;

use crate::error::Span;

/// A transform list that does not match the grammar
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at {span:?}")]
pub struct TransformError {
    pub span: Span,
    pub message: String,
}

/// Parse a `transform` attribute value.
///
/// Empty or whitespace-only text is the identity transform.
pub fn parse_transform(text: &str) -> Result<AffineTransform, TransformError> {
    if text.trim().is_empty() {
        return Ok(AffineTransform::IDENTITY);
    }

    let ops = parse_ops(text)?;
    Ok(ops
        .iter()
        .fold(AffineTransform::IDENTITY, |acc, op| acc.multiply(&op.to_matrix())))
}
