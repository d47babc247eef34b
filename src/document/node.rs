//! Arena nodes of a document tree

use crate::instruction::Instruction;
use crate::path::{PathError, PathParser};
use crate::shapes::{self, AttributeError};
use crate::transform::AffineTransform;

use super::paint::PaintAttributes;
use super::xml::Element;

/// Index of a node in its document's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The element's `id` attribute
    pub id: Option<String>,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    /// Raw `transform` attribute
    pub transform_text: Option<String>,
    /// Parsed `transform`, identity when absent or malformed
    pub local_transform: AffineTransform,
    /// Root-to-node accumulated transform, including the document scale
    pub transform: AffineTransform,
    pub paint: PaintAttributes,
    /// Byte offset of the element in the source document
    pub offset: usize,
}

impl Node {
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    pub fn shape(&self) -> Option<&Shape> {
        match &self.kind {
            NodeKind::Shape(shape) => Some(shape),
            NodeKind::Group { .. } => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match &self.kind {
            NodeKind::Group { .. } => "g",
            NodeKind::Shape(shape) => shape.tag(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Children in document (render) order
    Group { children: Vec<NodeId> },
    Shape(Shape),
}

/// Geometry attributes of a shape element, kept as the raw strings found in
/// the document
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        cx: Option<String>,
        cy: Option<String>,
        r: Option<String>,
    },
    Ellipse {
        cx: Option<String>,
        cy: Option<String>,
        rx: Option<String>,
        ry: Option<String>,
    },
    Rect {
        x: Option<String>,
        y: Option<String>,
        width: Option<String>,
        height: Option<String>,
        rx: Option<String>,
        ry: Option<String>,
    },
    Polygon { points: Option<String> },
    PolyLine { points: Option<String> },
    Path { d: Option<String> },
}

impl Shape {
    /// Recognize a shape element; `None` for anything else
    pub fn from_element(element: &Element) -> Option<Self> {
        let attr = |name: &str| element.attribute(name).map(str::to_string);
        let shape = match element.name.as_str() {
            "circle" => Shape::Circle {
                cx: attr("cx"),
                cy: attr("cy"),
                r: attr("r"),
            },
            "ellipse" => Shape::Ellipse {
                cx: attr("cx"),
                cy: attr("cy"),
                rx: attr("rx"),
                ry: attr("ry"),
            },
            "rect" => Shape::Rect {
                x: attr("x"),
                y: attr("y"),
                width: attr("width"),
                height: attr("height"),
                rx: attr("rx"),
                ry: attr("ry"),
            },
            "polygon" => Shape::Polygon {
                points: attr("points"),
            },
            "polyline" => Shape::PolyLine {
                points: attr("points"),
            },
            "path" => Shape::Path { d: attr("d") },
            _ => return None,
        };
        Some(shape)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "circle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Rect { .. } => "rect",
            Shape::Polygon { .. } => "polygon",
            Shape::PolyLine { .. } => "polyline",
            Shape::Path { .. } => "path",
        }
    }

    /// This shape's geometry instructions under `transform`.
    ///
    /// Path data is parsed lazily; the closed-form shapes are computed up front.
    pub fn geometry(&self, transform: &AffineTransform) -> Geometry<'_> {
        match self {
            Shape::Path { d } => Geometry::Path(PathParser::new(d.as_deref().unwrap_or(""), *transform)),
            other => match other.closed_form(transform) {
                Ok(instructions) => Geometry::Closed(instructions.into_iter()),
                Err(err) => Geometry::Failed(Some(err)),
            },
        }
    }

    fn closed_form(&self, transform: &AffineTransform) -> Result<Vec<Instruction>, AttributeError> {
        use shapes::{parse_length, parse_points};

        let instructions = match self {
            Shape::Circle { cx, cy, r } => shapes::circle(
                parse_length("cx", cx.as_deref())?,
                parse_length("cy", cy.as_deref())?,
                parse_length("r", r.as_deref())?,
                transform,
            ),
            Shape::Ellipse { cx, cy, rx, ry } => shapes::ellipse(
                parse_length("cx", cx.as_deref())?,
                parse_length("cy", cy.as_deref())?,
                parse_length("rx", rx.as_deref())?,
                parse_length("ry", ry.as_deref())?,
                transform,
            ),
            Shape::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => {
                let radius = |name: &str, raw: &Option<String>| -> Result<Option<f64>, AttributeError> {
                    match raw.as_deref().map(str::trim) {
                        None | Some("") | Some("auto") => Ok(None),
                        // A negative radius is ignored like a missing one
                        Some(_) => {
                            parse_length(name, raw.as_deref()).map(|r| (r >= 0.0).then_some(r))
                        }
                    }
                };
                shapes::rect(
                    parse_length("x", x.as_deref())?,
                    parse_length("y", y.as_deref())?,
                    parse_length("width", width.as_deref())?,
                    parse_length("height", height.as_deref())?,
                    radius("rx", rx)?,
                    radius("ry", ry)?,
                    transform,
                )
            }
            Shape::Polygon { points } => {
                shapes::polygon(&parse_points(points.as_deref().unwrap_or(""))?, transform)
            }
            Shape::PolyLine { points } => {
                shapes::polyline(&parse_points(points.as_deref().unwrap_or(""))?, transform)
            }
            Shape::Path { .. } => Vec::new(),
        };

        if instructions.iter().all(Instruction::is_finite) {
            Ok(instructions)
        } else {
            Err(AttributeError {
                attribute: "transform".to_string(),
                value: transform.to_string(),
                message: format!("maps the {} outside the finite coordinate range", self.tag()),
            })
        }
    }

    /// Raw text of the attribute that geometry errors point into
    pub fn source_text(&self) -> &str {
        match self {
            Shape::Path { d } => d.as_deref().unwrap_or(""),
            Shape::Polygon { points } | Shape::PolyLine { points } => points.as_deref().unwrap_or(""),
            _ => "",
        }
    }
}

/// Failure while generating one shape's geometry
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    Path(PathError),
    Attribute(AttributeError),
}

/// Lazy geometry of one shape
pub enum Geometry<'a> {
    Path(PathParser<'a>),
    Closed(std::vec::IntoIter<Instruction>),
    Failed(Option<AttributeError>),
}

impl Iterator for Geometry<'_> {
    type Item = Result<Instruction, GeometryError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Geometry::Path(parser) => parser.next().map(|r| r.map_err(GeometryError::Path)),
            Geometry::Closed(instructions) => instructions.next().map(Ok),
            Geometry::Failed(err) => err.take().map(|e| Err(GeometryError::Attribute(e))),
        }
    }
}
