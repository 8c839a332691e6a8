//! Apply pass
//!
//! Writes converted colors into an element's inline style with
//! `important` priority, computed from its snapshot alone. Re-applying the
//! same snapshot with the same table writes the same values.

use retint_color::{convert_gradient_with, is_gradient, resolve_css_color, ConversionTable};
use retint_dom::{Document, DomError, NodeId};

use crate::snapshot::ColorSnapshot;

/// Every inline property the engine may force, and removes on restore.
pub const FORCED_PROPERTIES: [&str; 12] = [
    "background-color",
    "color",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
    "fill",
    "stroke",
    "background-image",
    "-webkit-text-fill-color",
    "background-clip",
    "-webkit-background-clip",
];

const BORDER_PROPERTIES: [&str; 4] = [
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
];

fn force(doc: &mut Document, node: NodeId, property: &str, value: &str) -> Result<usize, DomError> {
    doc.set_style_property(node, property, value, true)?;
    Ok(1)
}

fn force_converted(
    doc: &mut Document,
    node: NodeId,
    table: &ConversionTable,
    property: &str,
    source: &str,
) -> Result<usize, DomError> {
    match table.convert(source) {
        Some(value) => force(doc, node, property, &value),
        None => Ok(0),
    }
}

/// Gradient text: transparent glyph fill showing a clipped gradient.
fn is_gradient_text(snapshot: &ColorSnapshot) -> bool {
    is_gradient(&snapshot.background_image)
        && resolve_css_color(&snapshot.text_fill_color).map_or(false, |c| c.is_transparent())
}

/// Apply `table` to `node` using its snapshot. Returns the number of
/// properties written.
pub fn apply_snapshot(
    doc: &mut Document,
    node: NodeId,
    snapshot: &ColorSnapshot,
    table: &ConversionTable,
) -> Result<usize, DomError> {
    let mut written = 0;

    written += force_converted(doc, node, table, "background-color", &snapshot.background_color)?;
    written += force_converted(doc, node, table, "color", &snapshot.color)?;
    for (property, source) in BORDER_PROPERTIES.iter().zip(&snapshot.border_colors) {
        written += force_converted(doc, node, table, property, source)?;
    }
    if snapshot.fill != "none" {
        written += force_converted(doc, node, table, "fill", &snapshot.fill)?;
    }
    if snapshot.stroke != "none" {
        written += force_converted(doc, node, table, "stroke", &snapshot.stroke)?;
    }

    if is_gradient(&snapshot.background_image) {
        let gradient = convert_gradient_with(table, &snapshot.background_image);
        written += force(doc, node, "background-image", &gradient)?;

        if is_gradient_text(snapshot) {
            written += force(doc, node, "-webkit-text-fill-color", "transparent")?;
            written += force(doc, node, "background-clip", "text")?;
            written += force(doc, node, "-webkit-background-clip", "text")?;
        }
    }

    Ok(written)
}

/// Remove every forced property from `node`. Returns how many were set.
pub fn restore_element(doc: &mut Document, node: NodeId) -> Result<usize, DomError> {
    let mut removed = 0;
    for property in FORCED_PROPERTIES {
        if !doc.remove_style_property(node, property)?.is_empty() {
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    fn snapshot(background: &str, color: &str) -> ColorSnapshot {
        ColorSnapshot {
            background_color: background.into(),
            color: color.into(),
            border_colors: core::array::from_fn(|_| String::from(color)),
            fill: "rgb(0, 0, 0)".into(),
            stroke: "none".into(),
            background_image: "none".into(),
            text_fill_color: color.into(),
        }
    }

    fn element(doc: &mut Document) -> NodeId {
        let body = doc.body().unwrap();
        let div = doc.create_element("div");
        doc.append_child(body, div);
        div
    }

    #[test]
    fn test_writes_important_converted_colors() {
        let mut doc = Document::new();
        let div = element(&mut doc);
        let snap = snapshot("rgb(255, 255, 255)", "rgb(0, 0, 0)");

        let written = apply_snapshot(&mut doc, div, &snap, &ConversionTable::to_dark()).unwrap();
        // background, color, four borders, fill
        assert_eq!(written, 7);
        let style = doc.inline_style(div).unwrap();
        assert_eq!(style.get_property_value("background-color"), "#1a1a1a");
        assert_eq!(style.get_property_priority("background-color"), "important");
        assert_eq!(style.get_property_value("color"), "#e9ecef");
        assert_eq!(style.get_property_value("border-left-color"), "#e9ecef");
        assert_eq!(style.get_property_value("stroke"), "");
    }

    #[test]
    fn test_transparent_and_mid_tones_are_left_alone() {
        let mut doc = Document::new();
        let div = element(&mut doc);
        let mut snap = snapshot("rgba(0, 0, 0, 0)", "rgb(128, 140, 40)");
        snap.fill = "none".into();

        let written = apply_snapshot(&mut doc, div, &snap, &ConversionTable::to_dark()).unwrap();
        assert_eq!(written, 0);
        assert!(doc.inline_style(div).unwrap().is_empty());
    }

    #[test]
    fn test_gradient_text_keeps_clip() {
        let mut doc = Document::new();
        let div = element(&mut doc);
        let mut snap = snapshot("rgba(0, 0, 0, 0)", "rgba(0, 0, 0, 0)");
        snap.fill = "none".into();
        snap.background_image = "linear-gradient(#ffffff, #000000)".into();

        apply_snapshot(&mut doc, div, &snap, &ConversionTable::to_dark()).unwrap();
        let style = doc.inline_style(div).unwrap();
        assert_eq!(
            style.get_property_value("background-image"),
            "linear-gradient(#1a1a1a, #e9ecef)"
        );
        assert_eq!(style.get_property_value("background-clip"), "text");
        assert_eq!(style.get_property_value("-webkit-background-clip"), "text");
        assert_eq!(style.get_property_value("-webkit-text-fill-color"), "transparent");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut doc = Document::new();
        let div = element(&mut doc);
        let snap = snapshot("rgb(248, 249, 250)", "rgb(33, 37, 41)");
        let table = ConversionTable::to_dark();

        apply_snapshot(&mut doc, div, &snap, &table).unwrap();
        let once = doc.get_attribute(div, "style").map(String::from);
        apply_snapshot(&mut doc, div, &snap, &table).unwrap();
        assert_eq!(doc.get_attribute(div, "style").map(String::from), once);
    }

    #[test]
    fn test_restore_clears_forced_properties() {
        let mut doc = Document::new();
        let div = element(&mut doc);
        doc.set_style_property(div, "margin", "0", false).unwrap();
        let snap = snapshot("rgb(255, 255, 255)", "rgb(0, 0, 0)");
        apply_snapshot(&mut doc, div, &snap, &ConversionTable::to_dark()).unwrap();

        assert_eq!(restore_element(&mut doc, div).unwrap(), 7);
        for property in FORCED_PROPERTIES {
            assert_eq!(doc.style_property(div, property), "");
        }
        assert_eq!(doc.style_property(div, "margin"), "0");
    }

    #[test]
    fn test_detached_id_reports_error() {
        let mut doc = Document::new();
        let snap = snapshot("rgb(255, 255, 255)", "rgb(0, 0, 0)");
        assert_eq!(
            apply_snapshot(&mut doc, 9999, &snap, &ConversionTable::to_dark()),
            Err(DomError::UnknownNode(9999))
        );
    }
}
