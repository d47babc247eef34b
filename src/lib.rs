//! SVG Instructions - flatten SVG documents into drawing instructions
//!
//! This library parses an SVG document into a tree of groups and shapes,
//! resolves every node's accumulated transform, and turns each shape into
//! absolute-coordinate move/line/curve/close instructions followed by one paint
//! instruction. Instruction sequences can be serialized back into `<path>`
//! elements.
//!
//! # Example
//!
//! ```rust
//! use svg_instructions::{instructions, serialize};
//!
//! let (flat, errors) = instructions(
//!     r#"<svg><g transform="translate(10 0)"><path d="M0 0 l5 5" stroke="red"/></g></svg>"#,
//!     "example",
//!     1.0,
//! )
//! .unwrap();
//!
//! assert!(errors.is_empty());
//! assert_eq!(serialize(&flat), r#"<path d="M10 0 L15 5" stroke="red" />"#);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod instruction;
pub mod path;
pub mod shapes;
pub mod stream;
pub mod transform;

pub use config::{Config, ConfigError, OutputFormat};
pub use document::{Document, NodeId, PaintAttributes};
pub use error::SvgError;
pub use instruction::{path_data, serialize, serialize_shapes, Instruction, InstructionKind, Paint};
pub use path::{parse_path_data, PathError, PathParser};
pub use stream::InstructionStream;
pub use transform::{compose, parse_transform, AffineTransform, Point, TransformError};

use thiserror::Error;

/// Errors that can occur while loading a document from a byte stream
#[derive(Debug, Error)]
pub enum LoadError {
    /// The stream could not be read
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// The document text is malformed
    #[error(transparent)]
    Svg(#[from] SvgError),
}

/// Parse `text` and generate the instructions of every shape in render order.
///
/// Path and attribute errors do not fail the call: the instructions produced
/// before each error are kept and the errors are returned alongside them.
pub fn instructions(
    text: &str,
    name: &str,
    scale: f64,
) -> Result<(Vec<Instruction>, Vec<SvgError>), SvgError> {
    let document = Document::parse(text, name, scale)?;
    let (instructions, mut errors) = document.instructions();
    let mut all = document.diagnostics().to_vec();
    all.append(&mut errors);
    Ok((instructions, all))
}

/// Parse `text` with `config` and serialize one `<path>` element per shape
///
/// # Example
///
/// ```rust
/// use svg_instructions::{render_paths, Config, PaintAttributes};
///
/// let config = Config::new().with_scale(2.0).with_default_paint(PaintAttributes {
///     stroke: Some("black".to_string()),
///     ..Default::default()
/// });
///
/// let (paths, errors) = render_paths(r#"<svg><rect width="1" height="1"/></svg>"#, &config).unwrap();
/// assert!(errors.is_empty());
/// assert_eq!(paths, vec![r#"<path d="M0 0 L2 0 L2 2 L0 2 Z" stroke="black" />"#]);
/// ```
pub fn render_paths(text: &str, config: &Config) -> Result<(Vec<String>, Vec<SvgError>), SvgError> {
    let document = Document::parse_with(text, config)?;
    let (instructions, mut errors) = document.instructions();
    let mut all = document.diagnostics().to_vec();
    all.append(&mut errors);
    Ok((serialize_shapes(&instructions), all))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructions_simple_path() {
        let (flat, errors) = instructions(r#"<svg><path d="M1 2 L3 4"/></svg>"#, "t", 1.0).unwrap();
        assert!(errors.is_empty());
        assert_eq!(flat.len(), 3);
        assert!(flat[2].is_paint());
    }

    #[test]
    fn test_instructions_report_transform_diagnostics() {
        let (flat, errors) =
            instructions(r#"<svg><path transform="spin(4)" d="M1 2"/></svg>"#, "t", 1.0).unwrap();
        assert_eq!(flat[0], Instruction::Move(Point::new(1.0, 2.0)));
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SvgError::MalformedTransform { .. }));
    }

    #[test]
    fn test_instructions_structure_error() {
        let err = instructions("<svg>", "t", 1.0).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_render_paths_one_per_shape() {
        let (paths, errors) = render_paths(
            r#"<svg fill="none"><path d="M0 0 L1 1"/><path d="M2 2 L3 3"/></svg>"#,
            &Config::default(),
        )
        .unwrap();
        assert!(errors.is_empty());
        assert_eq!(
            paths,
            vec![
                r#"<path d="M0 0 L1 1" fill="none" />"#.to_string(),
                r#"<path d="M2 2 L3 3" fill="none" />"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_load_error_from_reader() {
        struct Failing;
        impl std::io::Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            }
        }
        let err = Document::from_reader(Failing, "io", 1.0).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
