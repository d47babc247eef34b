//! Closed-form instruction generators for the basic SVG shapes
//!
//! Geometry is built in the shape's local space and mapped through its
//! accumulated transform point by point. Circles stay circles only under a
//! similarity transform; anything else falls back to the cubic ellipse.

use thiserror::Error;

use crate::instruction::Instruction;
use crate::path::lexer::{lex, Token};
use crate::transform::{AffineTransform, Point};

/// Control point distance for a quarter ellipse, as a fraction of the radius
pub const KAPPA: f64 = 0.5522847498307936;

/// A geometry attribute that cannot be turned into a number or point list
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {attribute} \"{value}\": {message}")]
pub struct AttributeError {
    pub attribute: String,
    pub value: String,
    pub message: String,
}

impl AttributeError {
    fn new(attribute: &str, value: &str, message: impl Into<String>) -> Self {
        Self {
            attribute: attribute.to_string(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}

/// Parse a length attribute.
///
/// A missing or blank attribute is 0. Plain numbers and `px` values are
/// accepted; other units are rejected.
pub fn parse_length(attribute: &str, raw: Option<&str>) -> Result<f64, AttributeError> {
    let Some(raw) = raw else {
        return Ok(0.0);
    };
    let text = raw.trim();
    if text.is_empty() {
        return Ok(0.0);
    }

    let number = text.strip_suffix("px").unwrap_or(text).trim_end();
    let value: f64 = number
        .parse()
        .map_err(|_| AttributeError::new(attribute, raw, "expected a number or px length"))?;

    if !value.is_finite() {
        return Err(AttributeError::new(attribute, raw, "length must be finite"));
    }
    Ok(value)
}

/// Parse a `points` list (`x,y x,y ...`); commas and whitespace are interchangeable
pub fn parse_points(raw: &str) -> Result<Vec<Point>, AttributeError> {
    let mut numbers = Vec::new();
    for (token, span) in lex(raw) {
        match token {
            Ok(Token::Number(n)) => numbers.push(n),
            Ok(Token::Command(_)) | Err(()) => {
                return Err(AttributeError::new(
                    "points",
                    raw,
                    format!("unexpected '{}' at offset {}", &raw[span.clone()], span.start),
                ))
            }
        }
    }

    if numbers.len() % 2 != 0 {
        return Err(AttributeError::new(
            "points",
            raw,
            format!("odd number of coordinates ({})", numbers.len()),
        ));
    }

    Ok(numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}

/// Cubic approximation of the quarter ellipse from `from` to `to` whose
/// bounding box corner is `corner`
fn quarter(from: Point, corner: Point, to: Point) -> (Point, Point, Point) {
    (from.lerp(corner, KAPPA), to.lerp(corner, KAPPA), to)
}

struct Builder<'a> {
    transform: &'a AffineTransform,
    out: Vec<Instruction>,
}

impl<'a> Builder<'a> {
    fn new(transform: &'a AffineTransform) -> Self {
        Self {
            transform,
            out: Vec::new(),
        }
    }

    fn move_to(&mut self, p: Point) {
        self.out.push(Instruction::Move(self.transform.apply(p)));
    }

    fn line_to(&mut self, p: Point) {
        self.out.push(Instruction::Line(self.transform.apply(p)));
    }

    fn quarter_to(&mut self, from: Point, corner: Point, to: Point) {
        let (c1, c2, end) = quarter(from, corner, to);
        self.out.push(Instruction::Curve {
            c1: self.transform.apply(c1),
            c2: self.transform.apply(c2),
            end: self.transform.apply(end),
        });
    }

    fn close(&mut self) {
        self.out.push(Instruction::Close);
    }

    fn finish(self) -> Vec<Instruction> {
        self.out
    }
}

/// Circle as a move to its centre plus a [`Instruction::CircleArc`]
pub fn circle(cx: f64, cy: f64, r: f64, transform: &AffineTransform) -> Vec<Instruction> {
    if r <= 0.0 {
        return Vec::new();
    }

    match transform.uniform_scale() {
        Some(scale) => vec![
            Instruction::Move(transform.apply(Point::new(cx, cy))),
            Instruction::CircleArc { radius: r * scale },
        ],
        None => ellipse(cx, cy, r, r, transform),
    }
}

/// Ellipse as four cubic quadrants, starting at the rightmost point
pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64, transform: &AffineTransform) -> Vec<Instruction> {
    if rx <= 0.0 || ry <= 0.0 {
        return Vec::new();
    }

    let right = Point::new(cx + rx, cy);
    let bottom = Point::new(cx, cy + ry);
    let left = Point::new(cx - rx, cy);
    let top = Point::new(cx, cy - ry);

    let mut b = Builder::new(transform);
    b.move_to(right);
    b.quarter_to(right, Point::new(cx + rx, cy + ry), bottom);
    b.quarter_to(bottom, Point::new(cx - rx, cy + ry), left);
    b.quarter_to(left, Point::new(cx - rx, cy - ry), top);
    b.quarter_to(top, Point::new(cx + rx, cy - ry), right);
    b.close();
    b.finish()
}

/// Resolve rect corner radii: a missing radius mirrors the other one and each
/// is clamped to half its side
pub fn corner_radii(rx: Option<f64>, ry: Option<f64>, width: f64, height: f64) -> (f64, f64) {
    let (rx, ry) = match (rx, ry) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => (rx, rx),
        (None, Some(ry)) => (ry, ry),
        (Some(rx), Some(ry)) => (rx, ry),
    };
    (rx.min(width / 2.0), ry.min(height / 2.0))
}

/// Rectangle, with rounded corners when both resolved radii are positive
pub fn rect(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rx: Option<f64>,
    ry: Option<f64>,
    transform: &AffineTransform,
) -> Vec<Instruction> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }

    let (rx, ry) = corner_radii(rx, ry, width, height);
    let (right, bottom) = (x + width, y + height);
    let mut b = Builder::new(transform);

    if rx <= 0.0 || ry <= 0.0 {
        b.move_to(Point::new(x, y));
        b.line_to(Point::new(right, y));
        b.line_to(Point::new(right, bottom));
        b.line_to(Point::new(x, bottom));
        b.close();
        return b.finish();
    }

    let top_start = Point::new(x + rx, y);
    let top_end = Point::new(right - rx, y);
    let right_start = Point::new(right, y + ry);
    let right_end = Point::new(right, bottom - ry);
    let bottom_start = Point::new(right - rx, bottom);
    let bottom_end = Point::new(x + rx, bottom);
    let left_start = Point::new(x, bottom - ry);
    let left_end = Point::new(x, y + ry);

    b.move_to(top_start);
    b.line_to(top_end);
    b.quarter_to(top_end, Point::new(right, y), right_start);
    b.line_to(right_end);
    b.quarter_to(right_end, Point::new(right, bottom), bottom_start);
    b.line_to(bottom_end);
    b.quarter_to(bottom_end, Point::new(x, bottom), left_start);
    b.line_to(left_end);
    b.quarter_to(left_end, Point::new(x, y), top_start);
    b.close();
    b.finish()
}

fn polyline_points<'a>(points: &[Point], transform: &'a AffineTransform) -> Builder<'a> {
    let mut b = Builder::new(transform);
    if let Some((first, rest)) = points.split_first() {
        b.move_to(*first);
        for p in rest {
            b.line_to(*p);
        }
    }
    b
}

/// Open polyline through `points`
pub fn polyline(points: &[Point], transform: &AffineTransform) -> Vec<Instruction> {
    polyline_points(points, transform).finish()
}

/// Closed polygon through `points`
pub fn polygon(points: &[Point], transform: &AffineTransform) -> Vec<Instruction> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut b = polyline_points(points, transform);
    b.close();
    b.finish()
}
