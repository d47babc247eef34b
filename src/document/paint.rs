//! Paint attributes of groups and shapes

use serde::Deserialize;

use super::xml::Element;
use crate::instruction::Paint;

/// Paint-related attributes as written on one element.
///
/// Also used for the `[paint]` table of the configuration file, hence the
/// kebab-case field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PaintAttributes {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
    pub fill_rule: Option<String>,
    pub stroke_linecap: Option<String>,
    pub stroke_linejoin: Option<String>,
}

impl PaintAttributes {
    /// Read presentation attributes, then let `style` declarations override them
    pub fn from_element(element: &Element) -> Self {
        let mut paint = PaintAttributes::default();
        for (name, value) in &element.attributes {
            paint.set(name, value);
        }
        if let Some(style) = element.attribute("style") {
            paint.apply_style(style);
        }
        paint
    }

    /// Set one attribute by its SVG name. Returns false for names that are not
    /// paint attributes. Blank values are ignored.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "fill" => &mut self.fill,
            "stroke" => &mut self.stroke,
            "stroke-width" => &mut self.stroke_width,
            "fill-rule" => &mut self.fill_rule,
            "stroke-linecap" => &mut self.stroke_linecap,
            "stroke-linejoin" => &mut self.stroke_linejoin,
            _ => return false,
        };
        let value = value.trim();
        if !value.is_empty() {
            *slot = Some(value.to_string());
        }
        true
    }

    /// Apply `key: value; ...` declarations from a `style` attribute
    pub fn apply_style(&mut self, style: &str) {
        for declaration in style.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                self.set(name.trim(), value);
            }
        }
    }

    /// Fill every unset field from `fallback`
    pub fn inherit(&mut self, fallback: &PaintAttributes) {
        fn take(slot: &mut Option<String>, fallback: &Option<String>) {
            if slot.is_none() {
                slot.clone_from(fallback);
            }
        }
        take(&mut self.fill, &fallback.fill);
        take(&mut self.stroke, &fallback.stroke);
        take(&mut self.stroke_width, &fallback.stroke_width);
        take(&mut self.fill_rule, &fallback.fill_rule);
        take(&mut self.stroke_linecap, &fallback.stroke_linecap);
        take(&mut self.stroke_linejoin, &fallback.stroke_linejoin);
    }

    pub fn is_complete(&self) -> bool {
        self.fill.is_some()
            && self.stroke.is_some()
            && self.stroke_width.is_some()
            && self.fill_rule.is_some()
            && self.stroke_linecap.is_some()
            && self.stroke_linejoin.is_some()
    }

    /// The subset carried by a Paint instruction
    pub fn to_paint(&self) -> Paint {
        Paint {
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
            stroke_width: self.stroke_width.clone(),
            line_cap: self.stroke_linecap.clone(),
            line_join: self.stroke_linejoin.clone(),
        }
    }
}
