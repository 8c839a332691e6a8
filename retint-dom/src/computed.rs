//! Computed style
//!
//! Resolves the value of a single property for an element from its inline
//! style and the stylesheets of its tree scope. Colors come out the way a
//! browser reports them (`rgb(...)` / `rgba(...)`), with `currentcolor`
//! resolved against the element's own `color`.

use alloc::string::String;

use retint_color::resolve_css_color;

use crate::node::NodeId;
use crate::selector::Specificity;
use crate::Document;

/// Value grammar of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    /// A color or `currentcolor`.
    Color,
    /// A color, `none` or `currentcolor`.
    Paint,
    /// Anything; kept verbatim.
    Image,
    /// A lowercase keyword.
    Keyword,
}

struct PropertyInfo {
    inherited: bool,
    initial: &'static str,
    kind: ValueKind,
}

const fn info(inherited: bool, initial: &'static str, kind: ValueKind) -> PropertyInfo {
    PropertyInfo {
        inherited,
        initial,
        kind,
    }
}

fn property_info(property: &str) -> Option<PropertyInfo> {
    let info = match property {
        "color" => info(true, "rgb(0, 0, 0)", ValueKind::Color),
        "background-color" => info(false, "rgba(0, 0, 0, 0)", ValueKind::Color),
        "border-top-color" | "border-right-color" | "border-bottom-color"
        | "border-left-color" => info(false, "currentcolor", ValueKind::Color),
        "-webkit-text-fill-color" => info(true, "currentcolor", ValueKind::Color),
        "fill" => info(true, "rgb(0, 0, 0)", ValueKind::Paint),
        "stroke" => info(true, "none", ValueKind::Paint),
        "background-image" => info(false, "none", ValueKind::Image),
        "background-clip" | "-webkit-background-clip" => {
            info(false, "border-box", ValueKind::Keyword)
        }
        _ => return None,
    };
    Some(info)
}

/// Cascade rank: importance, then inline over sheets, then specificity,
/// then source order.
type Rank = (bool, bool, Specificity, usize);

fn valid_for(kind: ValueKind, value: &str) -> bool {
    match kind {
        ValueKind::Color => {
            value.eq_ignore_ascii_case("currentcolor") || resolve_css_color(value).is_some()
        }
        ValueKind::Paint => {
            value.eq_ignore_ascii_case("none")
                || value.eq_ignore_ascii_case("currentcolor")
                || resolve_css_color(value).is_some()
        }
        ValueKind::Image | ValueKind::Keyword => true,
    }
}

/// A declared value after the cascade, before inheritance.
enum Specified {
    Value(String),
    Inherit,
    Initial,
}

/// Where resolution ended: a value still to be finished, or one handed in
/// already computed.
enum Resolved {
    Declared(String),
    Known(String),
}

/// Lookup for values already computed elsewhere, consulted for ancestors.
type Known<'a> = &'a dyn Fn(NodeId, &str) -> Option<String>;

impl Document {
    /// `getComputedStyle(element)[property]`. `None` for non-elements and
    /// for properties this engine does not compute.
    pub fn computed_style(&self, node_id: NodeId, property: &str) -> Option<String> {
        self.computed_style_with(node_id, property, |_, _| None)
    }

    /// Like [`Document::computed_style`], but an ancestor for which `known`
    /// returns a value passes that value down instead of its live one.
    pub fn computed_style_with<F>(&self, node_id: NodeId, property: &str, known: F) -> Option<String>
    where
        F: Fn(NodeId, &str) -> Option<String>,
    {
        let property = property.trim().to_ascii_lowercase();
        let info = property_info(&property)?;
        if !self.get(node_id)?.is_element() {
            return None;
        }
        Some(self.resolve(node_id, &property, &info, &known))
    }

    fn resolve(&self, node_id: NodeId, property: &str, info: &PropertyInfo, known: Known<'_>) -> String {
        match self.cascaded_value(node_id, property, info, known) {
            Resolved::Known(value) => value,
            Resolved::Declared(value) => self.finish_value(node_id, property, info, value, known),
        }
    }

    /// Winning value for `node_id`, walking up the composed tree while the
    /// value is inherited. `currentcolor` on `color` means inherit; on any
    /// other property it is handed back as a keyword and resolved against
    /// the element that asked.
    fn cascaded_value(&self, node_id: NodeId, property: &str, info: &PropertyInfo, known: Known<'_>) -> Resolved {
        let is_color = property == "color";
        let mut current = node_id;
        loop {
            if current != node_id {
                if let Some(value) = known(current, property) {
                    return Resolved::Known(value);
                }
            }
            match self.specified_value(current, property, info) {
                Some(Specified::Value(v)) if !(is_color && v.eq_ignore_ascii_case("currentcolor")) => {
                    return Resolved::Declared(v);
                }
                Some(Specified::Initial) => return Resolved::Declared(info.initial.into()),
                Some(Specified::Value(_)) | Some(Specified::Inherit) => {}
                None if info.inherited => {}
                None => return Resolved::Declared(info.initial.into()),
            }
            match self.inheritance_parent(current) {
                Some(parent) => current = parent,
                None => return Resolved::Declared(info.initial.into()),
            }
        }
    }

    fn specified_value(&self, node_id: NodeId, property: &str, info: &PropertyInfo) -> Option<Specified> {
        let value = self.declared_value(node_id, property, info.kind)?;
        Some(if value.eq_ignore_ascii_case("initial") {
            Specified::Initial
        } else if value.eq_ignore_ascii_case("inherit") {
            Specified::Inherit
        } else {
            Specified::Value(value)
        })
    }

    /// Nearest element up the composed tree.
    fn inheritance_parent(&self, node_id: NodeId) -> Option<NodeId> {
        let mut current = self.composed_parent(node_id);
        while let Some(id) = current {
            if self.get(id)?.is_element() {
                return Some(id);
            }
            current = self.composed_parent(id);
        }
        None
    }

    fn declared_value(&self, node_id: NodeId, property: &str, kind: ValueKind) -> Option<String> {
        let node = self.get(node_id)?;
        let scope = self.tree_scope(node_id);
        let mut best: Option<(Rank, &str)> = None;

        if let Some(decl) = node.inline_style().and_then(|s| s.get(property)) {
            if valid_for(kind, &decl.value) {
                best = Some((
                    (decl.important, true, Specificity::default(), 0),
                    decl.value.as_str(),
                ));
            }
        }

        let mut order = 0usize;
        for (sheet_scope, sheet) in &self.stylesheets {
            if *sheet_scope != scope {
                continue;
            }
            for rule in &sheet.rules {
                order += 1;
                let Some(specificity) = rule.matching_specificity(node) else {
                    continue;
                };
                for decl in rule.declarations.iter().filter(|d| d.property == property) {
                    if !valid_for(kind, &decl.value) {
                        continue;
                    }
                    let rank = (decl.important, false, specificity, order);
                    if best.as_ref().map_or(true, |(b, _)| rank >= *b) {
                        best = Some((rank, decl.value.as_str()));
                    }
                }
            }
        }

        best.map(|(_, v)| String::from(v))
    }

    fn finish_value(
        &self,
        node_id: NodeId,
        property: &str,
        info: &PropertyInfo,
        value: String,
        known: Known<'_>,
    ) -> String {
        match info.kind {
            ValueKind::Color | ValueKind::Paint => {
                if value.eq_ignore_ascii_case("none") {
                    return "none".into();
                }
                if value.eq_ignore_ascii_case("currentcolor") {
                    return match property_info("color") {
                        Some(color) => self.resolve(node_id, "color", &color, known),
                        None => "rgb(0, 0, 0)".into(),
                    };
                }
                resolve_css_color(&value)
                    .map(|c| c.to_css())
                    .unwrap_or(value)
            }
            ValueKind::Image => value,
            ValueKind::Keyword => value.to_ascii_lowercase(),
        }
    }
}
