//! Affine matrices and points
//!
//! Matrices use the SVG `[a b c d e f]` vector notation:
//!
//! ```text
//! | a c e |
//! | b d f |
//! | 0 0 1 |
//! ```
//!
//! Composition is plain matrix multiplication. `parent.multiply(&child)` maps a
//! child-local point into parent space by applying `child` first, then `parent`.

use std::fmt;

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by `(dx, dy)`
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Point reflection of `other` through this point
    pub fn reflect(self, other: Point) -> Self {
        Self::new(2.0 * self.x - other.x, 2.0 * self.y - other.y)
    }

    /// Linear interpolation towards `other` (`t = 0` is `self`, `t = 1` is `other`)
    pub fn lerp(self, other: Point, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// A 2x3 affine transformation matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Create a matrix from its six components, in `matrix(a b c d e f)` order
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `degrees` about the origin.
    ///
    /// Positive angles rotate from the +x axis towards the +y axis, which is
    /// clockwise on screen when y points down.
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation by `degrees` about `(cx, cy)`
    pub fn rotate_around(degrees: f64, cx: f64, cy: f64) -> Self {
        Self::translate(cx, cy)
            .multiply(&Self::rotate(degrees))
            .multiply(&Self::translate(-cx, -cy))
    }

    pub fn skew_x(degrees: f64) -> Self {
        Self::new(1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    pub fn skew_y(degrees: f64) -> Self {
        Self::new(1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// Matrix product `self × other`: applies `other` first, then `self`
    pub fn multiply(&self, other: &AffineTransform) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Map a point through this transform
    pub fn apply(&self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.e,
            y: self.b * point.x + self.d * point.y + self.f,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// The scale factor of this transform if it is a similarity (rotation,
    /// reflection, uniform scale and translation only).
    ///
    /// Returns `None` for non-uniform scales and skews, where a circle does not
    /// stay a circle.
    pub fn uniform_scale(&self) -> Option<f64> {
        let sx = self.a.hypot(self.b);
        let sy = self.c.hypot(self.d);
        let tolerance = 1e-9 * sx.max(sy).max(1.0);
        let skew = self.a * self.c + self.b * self.d;
        if (sx - sy).abs() <= tolerance && skew.abs() <= tolerance * sx.max(sy) {
            Some(sx)
        } else {
            None
        }
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({} {} {} {} {} {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

/// Compose a parent's accumulated transform with a child's local transform.
///
/// The result maps child-local coordinates into the parent's coordinate space.
pub fn compose(parent: &AffineTransform, child: &AffineTransform) -> AffineTransform {
    parent.multiply(child)
}
