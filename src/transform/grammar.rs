//! Transform list parser using chumsky

use chumsky::error::RichReason;
use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::lexer::{describe, lex, Token};
use super::matrix::AffineTransform;
use super::TransformError;

/// One operation of a transform list, e.g. `rotate(45 10 10)`
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOp {
    Matrix([f64; 6]),
    Translate(f64, f64),
    Scale(f64, f64),
    Rotate { angle: f64, center: Option<(f64, f64)> },
    SkewX(f64),
    SkewY(f64),
}

impl TransformOp {
    /// Build an operation from its name and argument list, checking arity
    fn from_call(name: &str, args: &[f64]) -> Result<Self, String> {
        let op = match (name, args) {
            ("matrix", [a, b, c, d, e, f]) => TransformOp::Matrix([*a, *b, *c, *d, *e, *f]),
            ("translate", [tx]) => TransformOp::Translate(*tx, 0.0),
            ("translate", [tx, ty]) => TransformOp::Translate(*tx, *ty),
            ("scale", [s]) => TransformOp::Scale(*s, *s),
            ("scale", [sx, sy]) => TransformOp::Scale(*sx, *sy),
            ("rotate", [angle]) => TransformOp::Rotate {
                angle: *angle,
                center: None,
            },
            ("rotate", [angle, cx, cy]) => TransformOp::Rotate {
                angle: *angle,
                center: Some((*cx, *cy)),
            },
            ("skewX", [angle]) => TransformOp::SkewX(*angle),
            ("skewY", [angle]) => TransformOp::SkewY(*angle),
            ("matrix" | "translate" | "scale" | "rotate" | "skewX" | "skewY", _) => {
                return Err(format!(
                    "{} does not take {} argument{}",
                    name,
                    args.len(),
                    if args.len() == 1 { "" } else { "s" }
                ))
            }
            _ => return Err(format!("unknown transform '{}'", name)),
        };
        Ok(op)
    }

    /// The canonical matrix for this operation
    pub fn to_matrix(&self) -> AffineTransform {
        match self {
            TransformOp::Matrix([a, b, c, d, e, f]) => AffineTransform::new(*a, *b, *c, *d, *e, *f),
            TransformOp::Translate(tx, ty) => AffineTransform::translate(*tx, *ty),
            TransformOp::Scale(sx, sy) => AffineTransform::scale(*sx, *sy),
            TransformOp::Rotate {
                angle,
                center: None,
            } => AffineTransform::rotate(*angle),
            TransformOp::Rotate {
                angle,
                center: Some((cx, cy)),
            } => AffineTransform::rotate_around(*angle, *cx, *cy),
            TransformOp::SkewX(angle) => AffineTransform::skew_x(*angle),
            TransformOp::SkewY(angle) => AffineTransform::skew_y(*angle),
        }
    }
}

/// Parse a transform list into its operations, in textual order
pub fn parse_ops(input: &str) -> Result<Vec<TransformOp>, TransformError> {
    let len = input.len();

    let mut tokens: Vec<(Token, SimpleSpan)> = Vec::new();
    for (token, span) in lex(input) {
        match token {
            Ok(token) => tokens.push((token, span.into())),
            Err(()) => {
                let message = format!("unexpected '{}'", &input[span.clone()]);
                return Err(TransformError { span, message });
            }
        }
    }

    let token_stream = Stream::from_iter(tokens).map((len..len).into(), |(t, s): (_, _)| (t, s));

    let calls = transform_list()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => err.into(),
            None => TransformError {
                span: 0..len,
                message: "invalid transform".to_string(),
            },
        })?;

    calls
        .into_iter()
        .map(|(name, args, span)| {
            TransformOp::from_call(&name, &args).map_err(|message| TransformError { span, message })
        })
        .collect()
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

/// A raw `name(args...)` call with its source span
type Call = (String, Vec<f64>, std::ops::Range<usize>);

fn transform_list<'a, I>() -> impl Parser<'a, I, Vec<Call>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Commas and whitespace are interchangeable between arguments and between operations
    let separator = just(Token::Comma).or_not();

    let number = select! {
        Token::Number(n) => n,
    };

    let arguments = number
        .then_ignore(separator.clone())
        .repeated()
        .collect::<Vec<f64>>()
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

    let call = select! {
        Token::Ident(name) => name,
    }
    .then(arguments)
    .map_with(|(name, args), e| (name, args, span_range(&e.span())));

    call.then_ignore(separator)
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

impl<'a> From<Rich<'a, Token>> for TransformError {
    fn from(err: Rich<'a, Token>) -> Self {
        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("unexpected {}", describe(tok)),
                None => "unexpected end of transform".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        TransformError {
            span: err.span().into_range(),
            message,
        }
    }
}
