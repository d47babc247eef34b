//! Generic element tree built with quick-xml
//!
//! This layer knows nothing about SVG beyond requiring an `<svg>` root. Tag
//! and attribute names are stored without namespace prefixes.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::SvgError;

/// One XML element with its raw attribute strings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated character data directly inside this element
    pub text: String,
    /// Byte offset of the start tag in the document
    pub offset: usize,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn start_element(start: &BytesStart<'_>, offset: usize, document: &str) -> Result<Element, SvgError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| SvgError::structure(document, offset, e.to_string()))?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| SvgError::structure(document, offset, e.to_string()))?;
        attributes.push((key, value.into_owned()));
    }

    Ok(Element {
        name,
        attributes,
        offset,
        ..Default::default()
    })
}

/// Attach a finished element to its parent, or make it the document root
fn finish(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
    document: &str,
) -> Result<(), SvgError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_some() => Err(SvgError::structure(
            document,
            element.offset,
            "multiple root elements",
        )),
        None => {
            *root = Some(element);
            Ok(())
        }
    }
}

/// Parse `text` into its root element.
///
/// Malformed XML, unterminated or mismatched elements and a root other than
/// `<svg>` are all [`SvgError::DocumentStructure`] errors.
pub fn parse_elements(text: &str, document: &str) -> Result<Element, SvgError> {
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text(true);
    // End tags are matched against the element stack below
    config.check_end_names = false;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let offset = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| SvgError::structure(document, reader.buffer_position() as usize, e.to_string()))?;

        match event {
            Event::Start(start) => {
                stack.push(start_element(&start, offset, document)?);
            }
            Event::Empty(start) => {
                let element = start_element(&start, offset, document)?;
                finish(element, &mut stack, &mut root, document)?;
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                let element = stack.pop().ok_or_else(|| {
                    SvgError::structure(document, offset, format!("unexpected </{}>", name))
                })?;
                if element.name != name {
                    return Err(SvgError::structure(
                        document,
                        offset,
                        format!("expected </{}>, found </{}>", element.name, name),
                    ));
                }
                finish(element, &mut stack, &mut root, document)?;
            }
            Event::Text(t) => {
                if let Some(current) = stack.last_mut() {
                    let content = t
                        .unescape()
                        .map_err(|e| SvgError::structure(document, offset, e.to_string()))?;
                    current.text.push_str(&content);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(SvgError::structure(
            document,
            open.offset,
            format!("unterminated <{}> element", open.name),
        ));
    }

    match root {
        Some(root) if root.name == "svg" => Ok(root),
        Some(root) => Err(SvgError::structure(
            document,
            root.offset,
            format!("root element is <{}>, expected <svg>", root.name),
        )),
        None => Err(SvgError::structure(document, text.len(), "document has no root element")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure_message(err: SvgError) -> String {
        match err {
            SvgError::DocumentStructure { message, .. } => message,
            other => panic!("Expected document structure error, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_elements() {
        let root = parse_elements(
            r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="10">
  <title>Heart</title>
  <g transform="scale(2)"><path d="M0 0"/></g>
</svg>"#,
            "heart",
        )
        .expect("Should parse");

        assert_eq!(root.name, "svg");
        assert_eq!(root.attributes, vec![("width".to_string(), "10".to_string())]);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text, "Heart");
        assert_eq!(root.children[1].attribute("transform"), Some("scale(2)"));
        assert_eq!(root.children[1].children[0].attribute("d"), Some("M0 0"));
    }

    #[test]
    fn test_namespace_prefixes_are_stripped() {
        let root = parse_elements(
            r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg"><svg:rect xlink:href="a"/></svg:svg>"#,
            "ns",
        )
        .expect("Should parse");
        assert_eq!(root.name, "svg");
        assert_eq!(root.children[0].name, "rect");
        assert_eq!(root.children[0].attribute("href"), Some("a"));
    }

    #[test]
    fn test_escaped_attribute_values() {
        let root = parse_elements(r#"<svg><g id="a&amp;b"/></svg>"#, "esc").unwrap();
        assert_eq!(root.children[0].attribute("id"), Some("a&b"));
    }

    #[test]
    fn test_start_offsets() {
        let text = "<svg><g/><path d=\"M0 0\"/></svg>";
        let root = parse_elements(text, "offsets").unwrap();
        assert_eq!(root.offset, 0);
        assert_eq!(root.children[0].offset, 5);
        assert_eq!(root.children[1].offset, 9);
    }

    #[test]
    fn test_unterminated_element() {
        let err = parse_elements("<svg><g><path d=\"M0 0\"/></svg>", "broken").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unclosed_root() {
        let err = parse_elements("<svg><g></g>", "broken").unwrap_err();
        assert_eq!(structure_message(err), "unterminated <svg> element");
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = parse_elements("<svg><g></svg>", "broken").unwrap_err();
        assert_eq!(structure_message(err), "expected </g>, found </svg>");
    }

    #[test]
    fn test_wrong_root() {
        let err = parse_elements("<html/>", "page").unwrap_err();
        assert_eq!(structure_message(err), "root element is <html>, expected <svg>");
    }

    #[test]
    fn test_empty_document() {
        let err = parse_elements("   ", "empty").unwrap_err();
        assert_eq!(structure_message(err), "document has no root element");
    }

    #[test]
    fn test_multiple_roots() {
        let err = parse_elements("<svg/><svg/>", "twice").unwrap_err();
        assert_eq!(structure_message(err), "multiple root elements");
    }
}
