//! SVG documents as an arena of groups and shapes
//!
//! A [`Document`] is built once from text and is immutable afterwards. Every
//! node carries its fully accumulated transform, so instruction generation for a
//! shape never looks at its ancestors again except to resolve paint.

mod composer;
mod node;
mod paint;
pub mod xml;

pub use composer::describe;
pub use node::{Geometry, GeometryError, Node, NodeId, NodeKind, Shape};
pub use paint::PaintAttributes;

use std::io::Read;

use log::{debug, trace};

use crate::config::Config;
use crate::error::SvgError;
use crate::instruction::{Instruction, Paint};
use crate::transform::{compose, AffineTransform};
use crate::LoadError;

use composer::Composer;

/// Name used for documents loaded without one
pub const DEFAULT_NAME: &str = "document";

/// Effective scale factor for a requested document scale.
///
/// Positive values scale directly, negative values scale by their reciprocal,
/// zero and non-finite values leave the document unscaled.
pub fn effective_scale(scale: f64) -> f64 {
    if !scale.is_finite() || scale == 0.0 {
        1.0
    } else if scale > 0.0 {
        scale
    } else {
        1.0 / -scale
    }
}

/// A parsed SVG document
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    title: Option<String>,
    width: Option<String>,
    height: Option<String>,
    view_box: Option<String>,
    scale: f64,
    transform: AffineTransform,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    root_paint: PaintAttributes,
    default_paint: PaintAttributes,
    diagnostics: Vec<SvgError>,
}

impl Document {
    /// Parse document text.
    ///
    /// `scale` becomes the initial transform of the whole tree (see
    /// [`effective_scale`]). Only structural problems fail; malformed
    /// transforms are reported through [`Document::diagnostics`].
    pub fn parse(text: &str, name: &str, scale: f64) -> Result<Self, SvgError> {
        Self::build(text, name, scale, PaintAttributes::default())
    }

    /// Parse with document settings and default paint taken from `config`
    pub fn parse_with(text: &str, config: &Config) -> Result<Self, SvgError> {
        let name = config.document.name.as_deref().unwrap_or(DEFAULT_NAME);
        Self::build(text, name, config.document.scale, config.paint.clone())
    }

    /// Read and parse a whole document from `reader`
    pub fn from_reader(mut reader: impl Read, name: &str, scale: f64) -> Result<Self, LoadError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::parse(&text, name, scale)?)
    }

    fn build(text: &str, name: &str, scale: f64, default_paint: PaintAttributes) -> Result<Self, SvgError> {
        let root = xml::parse_elements(text, name)?;

        let scale = effective_scale(scale);
        let mut composer = Composer::new(name);
        let root_transform = composer.local_transform(&root, "<svg>");
        let transform = compose(&AffineTransform::scale(scale, scale), &root_transform);
        let roots = composer.attach_children(&root, &transform, None);

        let document = Document {
            name: name.to_string(),
            title: composer.title,
            width: root.attribute("width").map(str::to_string),
            height: root.attribute("height").map(str::to_string),
            view_box: root.attribute("viewBox").map(str::to_string),
            scale,
            transform,
            nodes: composer.nodes,
            roots,
            root_paint: PaintAttributes::from_element(&root),
            default_paint,
            diagnostics: composer.diagnostics,
        };

        debug!(
            "parsed '{}': {} nodes, {} shapes, {} diagnostics",
            document.name,
            document.nodes.len(),
            document.shapes().count(),
            document.diagnostics.len()
        );

        Ok(document)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn height(&self) -> Option<&str> {
        self.height.as_deref()
    }

    pub fn view_box(&self) -> Option<&str> {
        self.view_box.as_deref()
    }

    /// The effective scale factor applied as the initial transform
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Initial transform of top-level nodes (document scale and root transform)
    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    /// Non-fatal problems found while building the tree
    pub fn diagnostics(&self) -> &[SvgError] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes, groups and shapes, in document order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Children of a group; empty for shapes
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Group { children } => children,
            NodeKind::Shape(_) => &[],
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Enclosing groups of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Top-level groups
    pub fn groups(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots
            .iter()
            .copied()
            .filter(move |&id| self.node(id).is_group())
    }

    /// All shapes in depth-first render order
    pub fn shapes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.is_group())
            .map(|(index, _)| NodeId(index))
    }

    /// Diagnostic name of a node, as used in error messages
    pub fn describe(&self, id: NodeId) -> String {
        let node = self.node(id);
        describe(node.tag(), node.id.as_deref(), id.0)
    }

    /// Paint for a shape: its own attributes, then the nearest ancestor group
    /// setting each value, then the root `<svg>`, then the configured defaults
    pub fn resolve_paint(&self, id: NodeId) -> Paint {
        let mut paint = self.node(id).paint.clone();
        for ancestor in self.ancestors(id) {
            if paint.is_complete() {
                break;
            }
            paint.inherit(&self.node(ancestor).paint);
        }
        paint.inherit(&self.root_paint);
        paint.inherit(&self.default_paint);
        paint.to_paint()
    }

    /// Lazily generate one shape's instructions; `None` for groups.
    ///
    /// Geometry comes first, then one Paint instruction if any geometry was
    /// produced. A shape that fails yields its valid prefix followed by the
    /// error and no Paint.
    pub fn shape_instructions(&self, id: NodeId) -> Option<ShapeInstructions<'_>> {
        let node = self.node(id);
        let shape = node.shape()?;
        trace!("generating {}", self.describe(id));
        Some(ShapeInstructions {
            document: self,
            id,
            shape,
            geometry: shape.geometry(&node.transform),
            emitted: false,
            done: false,
        })
    }

    /// Generate every shape's instructions in render order, collecting errors
    pub fn instructions(&self) -> (Vec<Instruction>, Vec<SvgError>) {
        let mut instructions = Vec::new();
        let mut errors = Vec::new();

        for id in self.shapes() {
            for result in self.shape_instructions(id).into_iter().flatten() {
                match result {
                    Ok(instruction) => instructions.push(instruction),
                    Err(err) => errors.push(err),
                }
            }
        }

        (instructions, errors)
    }
}

/// Instructions of one shape, see [`Document::shape_instructions`]
pub struct ShapeInstructions<'a> {
    document: &'a Document,
    id: NodeId,
    shape: &'a Shape,
    geometry: Geometry<'a>,
    emitted: bool,
    done: bool,
}

impl ShapeInstructions<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn error(&self, err: GeometryError) -> SvgError {
        let element = self.document.describe(self.id);
        match err {
            GeometryError::Path(err) => SvgError::from_path_error(element, self.shape.source_text(), err),
            GeometryError::Attribute(err) => SvgError::from_attribute_error(element, err),
        }
    }
}

impl Iterator for ShapeInstructions<'_> {
    type Item = Result<Instruction, SvgError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.geometry.next() {
            Some(Ok(instruction)) => {
                self.emitted = true;
                Some(Ok(instruction))
            }
            Some(Err(err)) => {
                self.done = true;
                Some(Err(self.error(err)))
            }
            None => {
                self.done = true;
                self.emitted
                    .then(|| Ok(Instruction::Paint(self.document.resolve_paint(self.id))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::InstructionKind;
    use crate::transform::Point;

    const NESTED: &str = r#"<svg width="100" height="50" viewBox="0 0 100 50" stroke="black">
  <title>Nested</title>
  <g id="outer" fill="red" transform="translate(10 0)">
    <rect width="4" height="4"/>
    <g id="inner" stroke-width="2">
      <path id="p" d="M0 0 L1 1" fill="blue"/>
    </g>
  </g>
  <circle r="1"/>
</svg>"#;

    fn nested() -> Document {
        Document::parse(NESTED, "nested", 1.0).expect("Should parse")
    }

    fn by_id(doc: &Document, id: &str) -> NodeId {
        (0..doc.len())
            .map(NodeId)
            .find(|&n| doc.node(n).id.as_deref() == Some(id))
            .expect("id exists")
    }

    #[test]
    fn test_metadata() {
        let doc = nested();
        assert_eq!(doc.name(), "nested");
        assert_eq!(doc.title(), Some("Nested"));
        assert_eq!(doc.width(), Some("100"));
        assert_eq!(doc.height(), Some("50"));
        assert_eq!(doc.view_box(), Some("0 0 100 50"));
        assert!(doc.diagnostics().is_empty());
    }

    #[test]
    fn test_tree_navigation() {
        let doc = nested();
        assert_eq!(doc.roots().len(), 2);
        assert_eq!(doc.groups().count(), 1);
        assert_eq!(doc.shapes().count(), 3);

        let p = by_id(&doc, "p");
        let ancestors: Vec<_> = doc
            .ancestors(p)
            .map(|a| doc.node(a).id.clone().unwrap_or_default())
            .collect();
        assert_eq!(ancestors, vec!["inner", "outer"]);
        assert!(doc.children(p).is_empty());
        assert_eq!(doc.describe(p), "<path id=\"p\">");
    }

    #[test]
    fn test_paint_resolution_order() {
        let doc = Document::parse_with(
            NESTED,
            &Config::default().with_default_paint(PaintAttributes {
                stroke_linecap: Some("round".to_string()),
                fill: Some("green".to_string()),
                ..Default::default()
            }),
        )
        .unwrap();

        let paint = doc.resolve_paint(by_id(&doc, "p"));
        assert_eq!(paint.fill.as_deref(), Some("blue"));
        assert_eq!(paint.stroke_width.as_deref(), Some("2"));
        assert_eq!(paint.stroke.as_deref(), Some("black"));
        assert_eq!(paint.line_cap.as_deref(), Some("round"));

        let circle = doc.shapes().last().unwrap();
        assert_eq!(doc.resolve_paint(circle).fill.as_deref(), Some("green"));
    }

    #[test]
    fn test_shape_instructions_end_with_paint() {
        let doc = nested();
        let p = by_id(&doc, "p");
        let instructions: Vec<_> = doc
            .shape_instructions(p)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let kinds: Vec<_> = instructions.iter().map(Instruction::kind).collect();
        assert_eq!(
            kinds,
            vec![InstructionKind::Move, InstructionKind::Line, InstructionKind::Paint]
        );
        assert_eq!(instructions[1], Instruction::Line(Point::new(11.0, 1.0)));
    }

    #[test]
    fn test_groups_have_no_instructions() {
        let doc = nested();
        assert!(doc.shape_instructions(by_id(&doc, "outer")).is_none());
    }

    #[test]
    fn test_empty_shape_has_no_paint() {
        let doc = Document::parse(r#"<svg><path d=""/><rect/></svg>"#, "empty", 1.0).unwrap();
        let (instructions, errors) = doc.instructions();
        assert!(instructions.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_failed_shape_keeps_prefix_without_paint() {
        let doc = Document::parse(
            r#"<svg><path d="M0 0 L1 1 L2"/><path d="M5 5"/></svg>"#,
            "partial",
            1.0,
        )
        .unwrap();
        let (instructions, errors) = doc.instructions();
        let kinds: Vec<_> = instructions.iter().map(Instruction::kind).collect();
        assert_eq!(
            kinds,
            vec![
                InstructionKind::Move,
                InstructionKind::Line,
                InstructionKind::Move,
                InstructionKind::Paint
            ]
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].element(), Some("<path> #0"));
    }

    #[test]
    fn test_effective_scale() {
        assert_eq!(effective_scale(2.0), 2.0);
        assert_eq!(effective_scale(-4.0), 0.25);
        assert_eq!(effective_scale(0.0), 1.0);
        assert_eq!(effective_scale(f64::NAN), 1.0);
    }

    #[test]
    fn test_negative_scale_is_reciprocal() {
        let doc = Document::parse(r#"<svg><path d="M10 20"/></svg>"#, "s", -10.0).unwrap();
        let (instructions, _) = doc.instructions();
        assert_eq!(instructions[0], Instruction::Move(Point::new(1.0, 2.0)));
        assert_eq!(doc.scale(), 0.1);
    }

    #[test]
    fn test_root_transform_applies() {
        let doc = Document::parse(
            r#"<svg transform="translate(0 5)"><path d="M1 1"/></svg>"#,
            "root",
            2.0,
        )
        .unwrap();
        let (instructions, _) = doc.instructions();
        assert_eq!(instructions[0], Instruction::Move(Point::new(2.0, 12.0)));
    }

    #[test]
    fn test_structure_error_is_fatal() {
        let err = Document::parse("<svg><g></svg>", "bad", 1.0).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_from_reader() {
        let doc = Document::from_reader(NESTED.as_bytes(), "reader", 1.0).unwrap();
        assert_eq!(doc.shapes().count(), 3);
    }
}
