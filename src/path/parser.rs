//! Streaming path data parser
//!
//! [`PathParser`] is an iterator that yields one [`Instruction`] per coordinate
//! group. It stops at the first error, so everything yielded before the error is
//! exactly what the valid prefix of the data produces.

use std::iter::Peekable;

use logos::SpannedIter;

use crate::instruction::Instruction;
use crate::transform::{AffineTransform, Point};

use super::lexer::{lex, Token};
use super::PathError;

/// Cursor state for one path data string.
///
/// Positions are kept in local (untransformed) space so relative offsets
/// accumulate before the shape's transform is applied.
#[derive(Debug, Clone, Copy, Default)]
struct CurrentPoint {
    position: Point,
    /// Start of the current subpath; `None` until the first moveto
    subpath_start: Option<Point>,
    /// Second control point of the previous C/S command
    last_cubic_control: Option<Point>,
    /// Control point of the previous Q/T command
    last_quadratic_control: Option<Point>,
}

impl CurrentPoint {
    fn move_to(&mut self, p: Point) {
        self.position = p;
        self.subpath_start = Some(p);
        self.last_cubic_control = None;
        self.last_quadratic_control = None;
    }

    fn line_to(&mut self, p: Point) {
        self.position = p;
        self.last_cubic_control = None;
        self.last_quadratic_control = None;
    }

    fn cubic_to(&mut self, c2: Point, end: Point) {
        self.position = end;
        self.last_cubic_control = Some(c2);
        self.last_quadratic_control = None;
    }

    fn quadratic_to(&mut self, control: Point, end: Point) {
        self.position = end;
        self.last_cubic_control = None;
        self.last_quadratic_control = Some(control);
    }
}

/// Number of coordinates one group of `command` consumes
fn arity(command: char) -> usize {
    match command.to_ascii_uppercase() {
        'H' | 'V' => 1,
        'M' | 'L' | 'T' => 2,
        'S' | 'Q' => 4,
        'C' => 6,
        'A' => 7,
        _ => 0,
    }
}

/// Iterator over the instructions of one path data string
pub struct PathParser<'a> {
    tokens: Peekable<SpannedIter<'a, Token>>,
    len: usize,
    transform: AffineTransform,
    state: CurrentPoint,
    /// Command applied to a bare coordinate group with no letter in front
    command: Option<char>,
    finished: bool,
}

impl<'a> PathParser<'a> {
    /// Parse `data`, mapping every emitted point through `transform`
    pub fn new(data: &'a str, transform: AffineTransform) -> Self {
        Self {
            tokens: lex(data).peekable(),
            len: data.len(),
            transform,
            state: CurrentPoint::default(),
            command: None,
            finished: false,
        }
    }

    fn step(&mut self) -> Result<Option<Instruction>, PathError> {
        let (token, offset) = match self.tokens.peek() {
            None => return Ok(None),
            Some((Err(()), span)) => {
                return Err(PathError::syntax(span.start, "invalid number or unknown command"))
            }
            Some((Ok(token), span)) => (*token, span.start),
        };

        let command = match token {
            Token::Command(letter) => {
                self.tokens.next();
                letter
            }
            Token::Number(_) => match self.command {
                Some(letter) => letter,
                None => {
                    return Err(PathError::syntax(offset, "path data must start with a command"))
                }
            },
        };

        match command {
            'Z' | 'z' => {
                if matches!(token, Token::Number(_)) {
                    return Err(PathError::syntax(offset, "close path takes no coordinates"));
                }
                self.command = Some(command);
                self.close(offset).map(Some)
            }
            'A' | 'a' => Err(PathError::Unsupported { offset, command }),
            _ => {
                let args = self.arguments(command)?;
                let instruction = self.execute(command, &args, offset)?;
                // Extra pairs after a moveto are implicit linetos
                self.command = Some(match command {
                    'M' => 'L',
                    'm' => 'l',
                    other => other,
                });
                Ok(Some(instruction))
            }
        }
    }

    /// Read one coordinate group for `command`
    fn arguments(&mut self, command: char) -> Result<[f64; 7], PathError> {
        let expected = arity(command);
        let mut args = [0.0; 7];

        for (found, slot) in args.iter_mut().take(expected).enumerate() {
            match self.tokens.peek() {
                Some((Ok(Token::Number(value)), _)) => {
                    *slot = *value;
                    self.tokens.next();
                }
                Some((Ok(Token::Command(next)), span)) => {
                    return Err(PathError::syntax(
                        span.start,
                        format!(
                            "expected {} coordinates for '{}', found {} before '{}'",
                            expected, command, found, next
                        ),
                    ))
                }
                Some((Err(()), span)) => {
                    return Err(PathError::syntax(span.start, "invalid number"))
                }
                None => {
                    return Err(PathError::syntax(
                        self.len,
                        format!(
                            "expected {} coordinates for '{}', found {} before end of data",
                            expected, command, found
                        ),
                    ))
                }
            }
        }

        Ok(args)
    }

    fn close(&mut self, offset: usize) -> Result<Instruction, PathError> {
        let start = self
            .state
            .subpath_start
            .ok_or_else(|| PathError::syntax(offset, "close path without a current subpath"))?;
        self.state.line_to(start);
        Ok(Instruction::Close)
    }

    fn execute(&mut self, command: char, args: &[f64; 7], offset: usize) -> Result<Instruction, PathError> {
        let upper = command.to_ascii_uppercase();
        if upper != 'M' && self.state.subpath_start.is_none() {
            return Err(PathError::syntax(
                offset,
                format!("'{}' before the first moveto", command),
            ));
        }

        let current = self.state.position;
        let origin = if command.is_ascii_lowercase() {
            current
        } else {
            Point::ZERO
        };
        let at = |x: f64, y: f64| origin.offset(x, y);

        let instruction = match upper {
            'M' => {
                let p = at(args[0], args[1]);
                self.state.move_to(p);
                Instruction::Move(self.transform.apply(p))
            }
            'L' => {
                let p = at(args[0], args[1]);
                self.state.line_to(p);
                Instruction::Line(self.transform.apply(p))
            }
            'H' => {
                let p = Point::new(origin.x + args[0], current.y);
                self.state.line_to(p);
                Instruction::Line(self.transform.apply(p))
            }
            'V' => {
                let p = Point::new(current.x, origin.y + args[0]);
                self.state.line_to(p);
                Instruction::Line(self.transform.apply(p))
            }
            'C' => {
                let c1 = at(args[0], args[1]);
                let c2 = at(args[2], args[3]);
                let end = at(args[4], args[5]);
                self.state.cubic_to(c2, end);
                self.curve(c1, c2, end)
            }
            'S' => {
                let c1 = self
                    .state
                    .last_cubic_control
                    .map_or(current, |control| current.reflect(control));
                let c2 = at(args[0], args[1]);
                let end = at(args[2], args[3]);
                self.state.cubic_to(c2, end);
                self.curve(c1, c2, end)
            }
            'Q' => {
                let control = at(args[0], args[1]);
                let end = at(args[2], args[3]);
                self.state.quadratic_to(control, end);
                self.quadratic(current, control, end)
            }
            'T' => {
                let control = self
                    .state
                    .last_quadratic_control
                    .map_or(current, |previous| current.reflect(previous));
                let end = at(args[0], args[1]);
                self.state.quadratic_to(control, end);
                self.quadratic(current, control, end)
            }
            _ => return Err(PathError::syntax(offset, format!("unknown command '{}'", command))),
        };

        if !instruction.is_finite() {
            return Err(PathError::syntax(
                offset,
                format!("'{}' lands outside the finite coordinate range", command),
            ));
        }
        Ok(instruction)
    }

    fn curve(&self, c1: Point, c2: Point, end: Point) -> Instruction {
        Instruction::Curve {
            c1: self.transform.apply(c1),
            c2: self.transform.apply(c2),
            end: self.transform.apply(end),
        }
    }

    /// Exact degree elevation of a quadratic segment to a cubic
    fn quadratic(&self, start: Point, control: Point, end: Point) -> Instruction {
        let c1 = start.lerp(control, 2.0 / 3.0);
        let c2 = end.lerp(control, 2.0 / 3.0);
        self.curve(c1, c2, end)
    }
}

impl Iterator for PathParser<'_> {
    type Item = Result<Instruction, PathError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.step() {
            Ok(Some(instruction)) => Some(Ok(instruction)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for PathParser<'_> {}
