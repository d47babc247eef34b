//! Streaming generation tests

use std::sync::Arc;

use pretty_assertions::assert_eq;

use svg_instructions::{Document, Instruction, Point, SvgError};

fn document(text: &str) -> Arc<Document> {
    Arc::new(Document::parse(text, "stream", 1.0).expect("Should parse"))
}

#[test]
fn test_stream_matches_synchronous_generation() {
    let doc = document(
        r#"<svg fill="black">
  <g transform="rotate(90)">
    <path d="M0 0 h10 v10 z"/>
    <rect x="1" y="1" width="2" height="2" rx="0.5"/>
  </g>
  <g transform="scale(2 3)"><path d="m1 1 l1 1 l1 -1"/></g>
  <polygon points="0,0 1,0 1,1"/>
</svg>"#,
    );

    let (expected, expected_errors) = doc.instructions();
    let (streamed, errors) = doc.stream().collect();

    assert!(expected_errors.is_empty());
    assert!(errors.is_empty());
    assert_eq!(streamed, expected);
}

#[test]
fn test_relative_moves_accumulate_before_transform() {
    let doc = document(r#"<svg><g transform="scale(2 3)"><path d="m1 1 l1 1 l1 -1"/></g></svg>"#);
    let (instructions, _) = doc.stream().collect();

    assert_eq!(
        &instructions[..3],
        &[
            Instruction::Move(Point::new(2.0, 3.0)),
            Instruction::Line(Point::new(4.0, 6.0)),
            Instruction::Line(Point::new(6.0, 3.0)),
        ]
    );
}

#[test]
fn test_stream_delivers_prefix_and_error() {
    let doc = document(
        r#"<svg><path id="broken" d="M0 0 L1 1 L2"/><path d="M5 5 L6 6" stroke="red"/></svg>"#,
    );
    let (instructions, errors) = doc.stream().collect();

    // broken prefix without paint, then the whole second shape
    assert_eq!(instructions.len(), 5);
    assert_eq!(instructions[1], Instruction::Line(Point::new(1.0, 1.0)));
    assert!(instructions[4].is_paint());
    assert_eq!(instructions.iter().filter(|i| i.is_paint()).count(), 1);

    assert_eq!(errors.len(), 1);
    match &errors[0] {
        SvgError::PathSyntax { element, .. } => assert!(element.contains("broken"), "{}", element),
        other => panic!("Expected path syntax error, got {:?}", other),
    }
}

#[test]
fn test_stream_reports_unsupported_arc() {
    let doc = document(r#"<svg><path d="M0 0 L1 0 A5 5 0 0 1 10 10"/></svg>"#);
    let (instructions, errors) = doc.stream().collect();

    assert_eq!(instructions.len(), 2);
    assert!(matches!(errors[0], SvgError::UnsupportedCommand { .. }));
}

#[test]
fn test_dropping_consumer_stops_worker() {
    let mut d = String::from("M0 0");
    for i in 0..5000 {
        d.push_str(&format!(" L{} {}", i, i));
    }
    let doc = document(&format!(r#"<svg><path d="{}"/></svg>"#, d));

    let mut stream = doc.stream();
    let first = stream.instructions.recv().expect("first instruction");
    assert_eq!(first, Instruction::Move(Point::ZERO));

    // swapping out the receiver disconnects the worker's sender
    stream.instructions = crossbeam_channel::never();
    stream.join();
}

#[test]
fn test_streams_share_document() {
    let doc = document(r#"<svg><circle cx="1" cy="1" r="1" fill="none"/></svg>"#);
    let a = doc.stream();
    let b = doc.stream();

    let (first, _) = a.collect();
    let (second, _) = b.collect();
    assert_eq!(first, second);
    assert_eq!(first[1], Instruction::CircleArc { radius: 1.0 });
    assert_eq!(Arc::strong_count(&doc), 1);
}
