//! Tree composition: element tree -> arena with accumulated transforms

use log::{trace, warn};

use crate::error::SvgError;
use crate::transform::{compose, parse_transform, AffineTransform};

use super::node::{Node, NodeId, NodeKind, Shape};
use super::paint::PaintAttributes;
use super::xml::Element;

/// Human-readable name of a node for diagnostics, e.g. `<path id="heart">`
/// or `<rect> #4` when the element has no id
pub fn describe(tag: &str, id: Option<&str>, index: usize) -> String {
    match id {
        Some(id) => format!("<{} id=\"{}\">", tag, id),
        None => format!("<{}> #{}", tag, index),
    }
}

/// Builds the node arena for one document.
///
/// Nodes are pushed in pre-order, so arena order is render order.
pub(crate) struct Composer<'a> {
    document: &'a str,
    pub nodes: Vec<Node>,
    pub diagnostics: Vec<SvgError>,
    pub title: Option<String>,
}

impl<'a> Composer<'a> {
    pub fn new(document: &'a str) -> Self {
        Self {
            document,
            nodes: Vec::new(),
            diagnostics: Vec::new(),
            title: None,
        }
    }

    /// Parse an element's `transform`, degrading to identity on error
    pub fn local_transform(&mut self, element: &Element, description: &str) -> AffineTransform {
        let Some(text) = element.attribute("transform") else {
            return AffineTransform::IDENTITY;
        };

        match parse_transform(text) {
            Ok(transform) => transform,
            Err(err) => {
                let err = SvgError::malformed_transform(description, text, err);
                warn!("{} in '{}'; using identity", err, self.document);
                self.diagnostics.push(err);
                AffineTransform::IDENTITY
            }
        }
    }

    /// Attach every child of `element`, returning the ids of those that became nodes
    pub fn attach_children(
        &mut self,
        element: &Element,
        parent_transform: &AffineTransform,
        parent: Option<NodeId>,
    ) -> Vec<NodeId> {
        element
            .children
            .iter()
            .filter_map(|child| self.attach_to_tree(child, parent_transform, parent))
            .collect()
    }

    /// Add `element` (and for groups, its subtree) below `parent`.
    ///
    /// Returns `None` for elements that do not become nodes: titles and
    /// unsupported elements, whose subtrees are skipped.
    pub fn attach_to_tree(
        &mut self,
        element: &Element,
        parent_transform: &AffineTransform,
        parent: Option<NodeId>,
    ) -> Option<NodeId> {
        let kind = match element.name.as_str() {
            "title" => {
                if self.title.is_none() {
                    self.title = Some(element.text.trim().to_string());
                }
                return None;
            }
            "g" | "svg" => NodeKind::Group {
                children: Vec::new(),
            },
            name => match Shape::from_element(element) {
                Some(shape) => NodeKind::Shape(shape),
                None => {
                    trace!("skipping <{}> at offset {}", name, element.offset);
                    return None;
                }
            },
        };

        let id = NodeId(self.nodes.len());
        let description = describe(&element.name, element.attribute("id"), id.0);
        let local_transform = self.local_transform(element, &description);
        let transform = compose(parent_transform, &local_transform);
        let is_group = matches!(kind, NodeKind::Group { .. });

        self.nodes.push(Node {
            id: element.attribute("id").map(str::to_string),
            kind,
            parent,
            transform_text: element.attribute("transform").map(str::to_string),
            local_transform,
            transform,
            paint: PaintAttributes::from_element(element),
            offset: element.offset,
        });

        if is_group {
            let children = self.attach_children(element, &transform, Some(id));
            self.nodes[id.0].kind = NodeKind::Group { children };
        }

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::xml::parse_elements;
    use crate::transform::Point;

    fn compose_text(text: &str) -> (Composer<'static>, Vec<NodeId>) {
        let root = parse_elements(text, "test").expect("Should parse");
        let mut composer = Composer::new("test");
        let roots = composer.attach_children(&root, &AffineTransform::IDENTITY, None);
        (composer, roots)
    }

    #[test]
    fn test_nested_transforms_accumulate() {
        let (composer, roots) = compose_text(
            r#"<svg><g transform="translate(10 0)"><g transform="scale(2)"><path d="M1 1"/></g></g></svg>"#,
        );
        assert_eq!(roots, vec![NodeId(0)]);
        assert_eq!(composer.nodes.len(), 3);

        let path = &composer.nodes[2];
        assert_eq!(path.parent, Some(NodeId(1)));
        assert_eq!(path.local_transform, AffineTransform::IDENTITY);
        assert_eq!(path.transform.apply(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
    }

    #[test]
    fn test_children_keep_document_order() {
        let (composer, _) = compose_text(
            r#"<svg><g><rect/><text>skip</text><circle/><path/></g></svg>"#,
        );
        match &composer.nodes[0].kind {
            NodeKind::Group { children } => {
                assert_eq!(children, &vec![NodeId(1), NodeId(2), NodeId(3)]);
            }
            other => panic!("Expected group, got {:?}", other),
        }
        let tags: Vec<_> = composer.nodes.iter().map(Node::tag).collect();
        assert_eq!(tags, vec!["g", "rect", "circle", "path"]);
    }

    #[test]
    fn test_malformed_transform_degrades_to_identity() {
        let (composer, _) = compose_text(
            r#"<svg><g transform="translate(5 5)"><g id="bad" transform="rotate(oops)"><path/></g></g></svg>"#,
        );
        assert_eq!(composer.diagnostics.len(), 1);
        assert_eq!(composer.diagnostics[0].element(), Some("<g id=\"bad\">"));
        assert!(!composer.diagnostics[0].is_fatal());

        let bad = &composer.nodes[1];
        assert_eq!(bad.local_transform, AffineTransform::IDENTITY);
        assert_eq!(bad.transform_text.as_deref(), Some("rotate(oops)"));
        assert_eq!(composer.nodes[2].transform, AffineTransform::translate(5.0, 5.0));
    }

    #[test]
    fn test_nested_svg_diagnostic_names_svg() {
        let (composer, _) = compose_text(
            r#"<svg><svg id="inner" transform="skewX()"><path d="M0 0"/></svg></svg>"#,
        );
        assert!(composer.nodes[0].is_group());
        assert_eq!(composer.diagnostics.len(), 1);
        assert_eq!(composer.diagnostics[0].element(), Some("<svg id=\"inner\">"));
    }

    #[test]
    fn test_first_title_wins() {
        let (composer, roots) =
            compose_text("<svg><title> One </title><g><title>Two</title></g></svg>");
        assert_eq!(composer.title.as_deref(), Some("One"));
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe("path", Some("heart"), 3), "<path id=\"heart\">");
        assert_eq!(describe("rect", None, 4), "<rect> #4");
    }
}
