//! Serialize instruction sequences back into SVG `<path>` elements

use quick_xml::escape::escape;

use super::{coord, Instruction, Paint};
use crate::transform::Point;

/// The `d` attribute text for the geometry in `instructions`.
///
/// Paint instructions are skipped. Every command is absolute, so the result
/// parses back to the same points.
pub fn path_data(instructions: &[Instruction]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(instructions.len());
    let mut subpath_start = Point::ZERO;

    for instruction in instructions {
        match instruction {
            Instruction::Paint(_) => {}
            Instruction::Move(p) => {
                subpath_start = *p;
                parts.push(instruction.to_string());
            }
            Instruction::CircleArc { radius } => parts.push(circle_arcs(subpath_start, *radius)),
            other => parts.push(other.to_string()),
        }
    }

    parts.join(" ")
}

/// A full circle around `center` as two half-circle arcs
fn circle_arcs(center: Point, radius: f64) -> String {
    let r = coord(radius.abs());
    let left = coord(center.x - r);
    let right = coord(center.x + r);
    let y = coord(center.y);
    format!(
        "M{left} {y} A{r} {r} 0 1 0 {right} {y} A{r} {r} 0 1 0 {left} {y}",
        left = left,
        right = right,
        y = y,
        r = r
    )
}

/// Space separated `name="value"` pairs, each followed by a space
pub fn paint_attributes(paint: &Paint) -> String {
    paint
        .attributes()
        .map(|(name, value)| format!("{}=\"{}\" ", name, escape(value)))
        .collect()
}

/// One `<path .../>` element for a single shape's instructions.
///
/// If several Paint instructions are present, the last one wins.
pub fn serialize(instructions: &[Instruction]) -> String {
    let paint = instructions.iter().rev().find_map(|i| match i {
        Instruction::Paint(paint) => Some(paint),
        _ => None,
    });

    format!(
        "<path d=\"{}\" {}/>",
        path_data(instructions),
        paint.map(paint_attributes).unwrap_or_default()
    )
}

/// Split a merged document sequence at each Paint and serialize every shape.
///
/// Geometry after the last Paint (a shape that failed before painting) is
/// serialized on its own, without paint attributes. A failed shape earlier in
/// the sequence has no Paint of its own and ends up in the following element.
pub fn serialize_shapes(instructions: &[Instruction]) -> Vec<String> {
    let mut elements = Vec::new();
    let mut start = 0;

    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.is_paint() {
            elements.push(serialize(&instructions[start..=i]));
            start = i + 1;
        }
    }

    if start < instructions.len() {
        elements.push(serialize(&instructions[start..]));
    }

    elements
}
