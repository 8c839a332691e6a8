//! Inline style declarations
//!
//! Declarations are stored as longhands. The `background`, `border-color`
//! and `border` shorthands are expanded on parse as far as their color
//! and image components go; everything else is kept verbatim.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use retint_color::{is_gradient, resolve_css_color};

/// The four border edges, in `border-color` shorthand order.
pub const BORDER_EDGES: [&str; 4] = [
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
];

/// A single property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: &str, value: &str, important: bool) -> Self {
        Declaration {
            property: property.trim().to_ascii_lowercase(),
            value: value.trim().into(),
            important,
        }
    }

    /// Parse `name: value [!important]`.
    pub fn parse(text: &str) -> Option<Self> {
        let (name, value) = text.split_once(':')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let value = value.trim();
        let (value, important) = match value.rfind('!') {
            Some(bang) if value[bang + 1..].trim().eq_ignore_ascii_case("important") => {
                (value[..bang].trim(), true)
            }
            _ => (value, false),
        };
        if value.is_empty() {
            return None;
        }

        Some(Declaration::new(name, value, important))
    }
}

/// Parse a declaration block body (no braces) into expanded longhands.
pub fn parse_declarations(text: &str) -> Vec<Declaration> {
    split_declarations(text)
        .into_iter()
        .filter_map(Declaration::parse)
        .flat_map(expand_shorthand)
        .collect()
}

/// Split on `;` outside parentheses and quotes.
fn split_declarations(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

/// Split a value on whitespace outside parentheses.
fn split_components(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    parts.push(&value[s..i]);
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        parts.push(&value[s..]);
    }

    parts
}

fn expand_shorthand(decl: Declaration) -> Vec<Declaration> {
    let important = decl.important;
    match decl.property.as_str() {
        "background" => {
            let mut out = Vec::new();
            for part in split_components(&decl.value) {
                if is_gradient(part) || part.starts_with("url(") {
                    out.push(Declaration::new("background-image", part, important));
                } else if resolve_css_color(part).is_some() {
                    out.push(Declaration::new("background-color", part, important));
                }
            }
            if out.is_empty() {
                vec![decl]
            } else {
                out
            }
        }
        "border-color" => {
            let parts = split_components(&decl.value);
            // top, right, bottom, left with the usual 1-4 value repetition
            let pick = |edge: usize| {
                let idx = match (parts.len(), edge) {
                    (1, _) => 0,
                    (2, e) => e % 2,
                    (3, 3) => 1,
                    (3, e) => e,
                    (4, e) => e,
                    _ => return None,
                };
                parts.get(idx).copied()
            };
            let edges: Vec<Declaration> = BORDER_EDGES
                .iter()
                .enumerate()
                .filter_map(|(i, edge)| pick(i).map(|v| Declaration::new(edge, v, important)))
                .collect();
            if edges.len() == 4 {
                edges
            } else {
                vec![decl]
            }
        }
        "border" => {
            let color = split_components(&decl.value)
                .into_iter()
                .find(|p| resolve_css_color(p).is_some());
            let mut out = vec![decl.clone()];
            if let Some(color) = color {
                out.extend(
                    BORDER_EDGES
                        .iter()
                        .map(|edge| Declaration::new(edge, color, important)),
                );
            }
            out
        }
        _ => vec![decl],
    }
}

/// The declarations of an element's `style` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<Declaration>,
}

impl InlineStyle {
    /// Parse a `style` attribute value.
    pub fn parse(text: &str) -> Self {
        let mut style = InlineStyle::default();
        for decl in parse_declarations(text) {
            style.upsert(decl);
        }
        style
    }

    /// Property value, or an empty string when unset.
    pub fn get_property_value(&self, property: &str) -> &str {
        self.find(property).map(|d| d.value.as_str()).unwrap_or("")
    }

    /// `"important"` or an empty string.
    pub fn get_property_priority(&self, property: &str) -> &str {
        match self.find(property) {
            Some(d) if d.important => "important",
            _ => "",
        }
    }

    /// The declaration for a property.
    pub fn get(&self, property: &str) -> Option<&Declaration> {
        self.find(property)
    }

    /// Set a property, replacing any previous declaration.
    pub fn set_property(&mut self, property: &str, value: &str, important: bool) {
        self.upsert(Declaration::new(property, value, important));
    }

    /// Remove a property. Returns the previous value (empty when unset).
    pub fn remove_property(&mut self, property: &str) -> String {
        match self
            .declarations
            .iter()
            .position(|d| d.property.eq_ignore_ascii_case(property))
        {
            Some(pos) => self.declarations.remove(pos).value,
            None => String::new(),
        }
    }

    /// Serialize back to `style` attribute text.
    pub fn to_css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|d| {
                if d.important {
                    format!("{}: {} !important;", d.property, d.value)
                } else {
                    format!("{}: {};", d.property, d.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Check if there are no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterate over declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    fn find(&self, property: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|d| d.property.eq_ignore_ascii_case(property))
    }

    fn upsert(&mut self, decl: Declaration) {
        match self
            .declarations
            .iter_mut()
            .find(|d| d.property == decl.property)
        {
            Some(existing) => *existing = decl,
            None => self.declarations.push(decl),
        }
    }
}

impl core::fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_css_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_priority() {
        let style = InlineStyle::parse("color: red !important; fill: none");
        assert_eq!(style.get_property_value("color"), "red");
        assert_eq!(style.get_property_priority("color"), "important");
        assert_eq!(style.get_property_priority("fill"), "");
        assert_eq!(style.get_property_value("stroke"), "");
    }

    #[test]
    fn test_background_shorthand_expands() {
        let style = InlineStyle::parse("background: linear-gradient(#fff, #000) #ffffff");
        assert_eq!(
            style.get_property_value("background-image"),
            "linear-gradient(#fff, #000)"
        );
        assert_eq!(style.get_property_value("background-color"), "#ffffff");
    }

    #[test]
    fn test_border_color_repetition() {
        let style = InlineStyle::parse("border-color: red blue");
        assert_eq!(style.get_property_value("border-top-color"), "red");
        assert_eq!(style.get_property_value("border-right-color"), "blue");
        assert_eq!(style.get_property_value("border-bottom-color"), "red");
        assert_eq!(style.get_property_value("border-left-color"), "blue");

        let style = InlineStyle::parse("border: 1px solid #dee2e6");
        assert_eq!(style.get_property_value("border-left-color"), "#dee2e6");
    }

    #[test]
    fn test_semicolons_inside_parens_do_not_split() {
        let style = InlineStyle::parse("background-image: url(\"a;b.png\"); color: #000");
        assert_eq!(style.get_property_value("background-image"), "url(\"a;b.png\")");
        assert_eq!(style.get_property_value("color"), "#000");
    }

    #[test]
    fn test_set_remove_and_serialize() {
        let mut style = InlineStyle::default();
        style.set_property("background-color", "#1a1a1a", true);
        style.set_property("color", "#e9ecef", false);
        assert_eq!(
            style.to_css_text(),
            "background-color: #1a1a1a !important; color: #e9ecef;"
        );
        assert_eq!(style.remove_property("background-color"), "#1a1a1a");
        assert_eq!(style.remove_property("background-color"), "");
        assert_eq!(style.len(), 1);
    }
}
