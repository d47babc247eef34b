//! Error types for document ingestion and instruction generation

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::path::PathError;
use crate::shapes::AttributeError;
use crate::transform::TransformError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors and warnings produced while building a document or generating its
/// instructions.
///
/// Only [`SvgError::DocumentStructure`] is fatal. Transform errors degrade to the
/// identity transform; path and attribute errors stop the affected shape only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvgError {
    /// A `transform` attribute that does not match the transform grammar
    #[error("malformed transform \"{text}\" on {element}: {message}")]
    MalformedTransform {
        element: String,
        text: String,
        span: Span,
        message: String,
    },

    /// Unparseable path data at a byte offset into the `d` attribute
    #[error("path syntax error in {element} at offset {offset}: {message}")]
    PathSyntax {
        element: String,
        data: String,
        offset: usize,
        message: String,
    },

    /// A recognized path command that is not implemented
    #[error("unsupported path command '{command}' in {element} at offset {offset}")]
    UnsupportedCommand {
        element: String,
        data: String,
        offset: usize,
        command: char,
    },

    /// A geometry attribute of a closed-form shape that cannot be used
    #[error("invalid {attribute} \"{value}\" on {element}: {message}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
        message: String,
    },

    /// Malformed overall document structure; aborts the whole parse
    #[error("malformed document '{document}' at offset {offset}: {message}")]
    DocumentStructure {
        document: String,
        offset: usize,
        message: String,
    },
}

impl SvgError {
    pub fn malformed_transform(element: impl Into<String>, text: &str, err: TransformError) -> Self {
        SvgError::MalformedTransform {
            element: element.into(),
            text: text.to_string(),
            span: err.span,
            message: err.message,
        }
    }

    /// Attach the owning element and its `d` text to a path parser error
    pub fn from_path_error(element: impl Into<String>, data: &str, err: PathError) -> Self {
        match err {
            PathError::Syntax { offset, message } => SvgError::PathSyntax {
                element: element.into(),
                data: data.to_string(),
                offset,
                message,
            },
            PathError::Unsupported { offset, command } => SvgError::UnsupportedCommand {
                element: element.into(),
                data: data.to_string(),
                offset,
                command,
            },
        }
    }

    pub fn from_attribute_error(element: impl Into<String>, err: AttributeError) -> Self {
        SvgError::InvalidAttribute {
            element: element.into(),
            attribute: err.attribute,
            value: err.value,
            message: err.message,
        }
    }

    pub fn structure(document: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        SvgError::DocumentStructure {
            document: document.into(),
            offset,
            message: message.into(),
        }
    }

    /// Whether this error aborts document construction
    pub fn is_fatal(&self) -> bool {
        matches!(self, SvgError::DocumentStructure { .. })
    }

    /// Description of the element the error belongs to, if any
    pub fn element(&self) -> Option<&str> {
        match self {
            SvgError::MalformedTransform { element, .. }
            | SvgError::PathSyntax { element, .. }
            | SvgError::UnsupportedCommand { element, .. }
            | SvgError::InvalidAttribute { element, .. } => Some(element),
            SvgError::DocumentStructure { .. } => None,
        }
    }

    /// Format the error with the offending attribute text using ariadne.
    ///
    /// Document structure errors carry no attribute text and fall back to the
    /// plain message.
    pub fn report(&self) -> String {
        match self {
            SvgError::MalformedTransform {
                element,
                text,
                span,
                message,
            } => annotate(element, "transform", text, span.clone(), message),
            SvgError::PathSyntax {
                element,
                data,
                offset,
                message,
            } => annotate(element, "d", data, point_span(data, *offset), message),
            SvgError::UnsupportedCommand {
                element,
                data,
                offset,
                command,
            } => annotate(
                element,
                "d",
                data,
                point_span(data, *offset),
                &format!("unsupported command '{}'", command),
            ),
            SvgError::InvalidAttribute {
                element,
                attribute,
                value,
                message,
            } => annotate(element, attribute, value, 0..value.len(), message),
            SvgError::DocumentStructure { .. } => self.to_string(),
        }
    }
}

/// A one-character span at `offset`, clamped to the text
fn point_span(text: &str, offset: usize) -> Span {
    let start = offset.min(text.len());
    let end = text[start..]
        .chars()
        .next()
        .map_or(start, |c| start + c.len_utf8());
    start..end
}

fn annotate(element: &str, attribute: &str, source: &str, span: Span, message: &str) -> String {
    let filename = format!("{} {}", element, attribute);
    let filename = filename.as_str();
    let mut buf = Vec::new();

    let written = Report::build(ReportKind::Error, filename, span.start)
        .with_message(message)
        .with_label(
            Label::new((filename, span))
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .write((filename, Source::from(source)), &mut buf);

    match written {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => format!("{}: {}", filename, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_structure_errors_are_fatal() {
        assert!(SvgError::structure("doc", 0, "unterminated <g> element").is_fatal());

        let path = SvgError::from_path_error(
            "<path> #1",
            "M0 0 X",
            PathError::Syntax {
                offset: 5,
                message: "unrecognized token".to_string(),
            },
        );
        assert!(!path.is_fatal());
        assert_eq!(path.element(), Some("<path> #1"));
    }

    #[test]
    fn test_unsupported_command_conversion() {
        let err = SvgError::from_path_error(
            "<path id=\"arc\">",
            "M0 0 A1 1 0 0 0 2 2",
            PathError::Unsupported {
                offset: 5,
                command: 'A',
            },
        );
        assert!(matches!(
            err,
            SvgError::UnsupportedCommand {
                offset: 5,
                command: 'A',
                ..
            }
        ));
    }

    #[test]
    fn test_report_contains_message() {
        let err = SvgError::PathSyntax {
            element: "<path> #3".to_string(),
            data: "M0 0 L1".to_string(),
            offset: 7,
            message: "expected 2 coordinates for 'L', found 1 before end of data".to_string(),
        };
        let report = err.report();
        assert!(report.contains("expected 2 coordinates"), "{}", report);
    }

    #[test]
    fn test_point_span_clamps_to_text() {
        assert_eq!(point_span("M0 0", 2), 2..3);
        assert_eq!(point_span("M0 0", 4), 4..4);
        assert_eq!(point_span("M0 0", 99), 4..4);
    }
}
