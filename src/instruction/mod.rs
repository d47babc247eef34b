//! Flat drawing instructions
//!
//! The output representation of the pipeline: absolute coordinates only, one
//! [`Instruction::Paint`] at the end of every shape.

mod serialize;

pub use serialize::{paint_attributes, path_data, serialize, serialize_shapes};

use std::fmt;

use crate::transform::Point;

/// One step of a flattened drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Start a new subpath
    Move(Point),
    Line(Point),
    /// Cubic Bézier segment from the current point
    Curve { c1: Point, c2: Point, end: Point },
    /// Return to the start of the current subpath
    Close,
    /// Full circle around the preceding move point
    CircleArc { radius: f64 },
    /// Resolved paint of the shape whose geometry precedes it
    Paint(Paint),
}

/// Tag of an [`Instruction`], for comparisons that ignore coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    Move,
    Line,
    Curve,
    Close,
    CircleArc,
    Paint,
}

impl Instruction {
    pub fn kind(&self) -> InstructionKind {
        match self {
            Instruction::Move(_) => InstructionKind::Move,
            Instruction::Line(_) => InstructionKind::Line,
            Instruction::Curve { .. } => InstructionKind::Curve,
            Instruction::Close => InstructionKind::Close,
            Instruction::CircleArc { .. } => InstructionKind::CircleArc,
            Instruction::Paint(_) => InstructionKind::Paint,
        }
    }

    pub fn is_paint(&self) -> bool {
        matches!(self, Instruction::Paint(_))
    }

    /// Current point after this instruction, when it moves it explicitly
    pub fn end_point(&self) -> Option<Point> {
        match self {
            Instruction::Move(p) | Instruction::Line(p) => Some(*p),
            Instruction::Curve { end, .. } => Some(*end),
            _ => None,
        }
    }

    /// False if any coordinate or radius is infinite or NaN
    pub fn is_finite(&self) -> bool {
        let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
        match self {
            Instruction::Move(p) | Instruction::Line(p) => finite(p),
            Instruction::Curve { c1, c2, end } => finite(c1) && finite(c2) && finite(end),
            Instruction::CircleArc { radius } => radius.is_finite(),
            Instruction::Close | Instruction::Paint(_) => true,
        }
    }
}

/// Paint attributes carried by a [`Instruction::Paint`].
///
/// Values are kept as the strings found in the document; unset fields are
/// simply omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paint {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
    pub line_cap: Option<String>,
    pub line_join: Option<String>,
}

impl Paint {
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn with_stroke_width(mut self, width: impl Into<String>) -> Self {
        self.stroke_width = Some(width.into());
        self
    }

    pub fn with_line_cap(mut self, cap: impl Into<String>) -> Self {
        self.line_cap = Some(cap.into());
        self
    }

    pub fn with_line_join(mut self, join: impl Into<String>) -> Self {
        self.line_join = Some(join.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.attributes().next().is_none()
    }

    /// Set attributes as `(name, value)` pairs in output order
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("fill", &self.fill),
            ("stroke", &self.stroke),
            ("stroke-width", &self.stroke_width),
            ("stroke-linecap", &self.line_cap),
            ("stroke-linejoin", &self.line_join),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
    }
}

/// Normalizes negative zero so it prints as `0`
pub(crate) fn coord(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Move(p) => write!(f, "M{} {}", coord(p.x), coord(p.y)),
            Instruction::Line(p) => write!(f, "L{} {}", coord(p.x), coord(p.y)),
            Instruction::Curve { c1, c2, end } => write!(
                f,
                "C{} {} {} {} {} {}",
                coord(c1.x),
                coord(c1.y),
                coord(c2.x),
                coord(c2.y),
                coord(end.x),
                coord(end.y)
            ),
            Instruction::Close => write!(f, "Z"),
            Instruction::CircleArc { radius } => write!(f, "circle R={}", coord(*radius)),
            Instruction::Paint(paint) => write!(f, "{}", paint),
        }
    }
}

/// Space separated `name="value"` pairs, unescaped
impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.attributes().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}=\"{}\"", name, value)?;
        }
        Ok(())
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstructionKind::Move => "move",
            InstructionKind::Line => "line",
            InstructionKind::Curve => "curve",
            InstructionKind::Close => "close",
            InstructionKind::CircleArc => "circle",
            InstructionKind::Paint => "paint",
        };
        write!(f, "{}", name)
    }
}
