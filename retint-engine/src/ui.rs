//! Toggle control
//!
//! The engine renders a single button into an open shadow root of its host
//! element. The host and everything below it are never recolored.

use retint_dom::{Document, DomError, NodeId, ShadowRootMode};

use crate::theme::ThemeChoice;

/// Custom element name of the engine's host.
pub const ELEMENT_NAME: &str = "retint-toggle";

const TOGGLE_CSS: &str = "\
button { background-color: #212529; color: #f8f9fa; border-color: #495057 }
button[aria-pressed=true] { background-color: #f8f9fa; color: #212529 }";

/// Nodes of the rendered control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleUi {
    pub root: NodeId,
    pub button: NodeId,
}

/// Render the control, or find the one rendered by an earlier start.
pub fn render_toggle(doc: &mut Document, host: NodeId) -> Result<ToggleUi, DomError> {
    if let Some(root) = doc.shadow_root(host) {
        if let Some(&button) = doc.query_selector_all(root, "button[part=toggle]").first() {
            return Ok(ToggleUi { root, button });
        }
    }

    let root = doc.attach_shadow(host, ShadowRootMode::Open)?;
    doc.add_scoped_stylesheet(root, TOGGLE_CSS);
    let button = doc.create_element_with(
        "button",
        &[("part", "toggle"), ("type", "button"), ("aria-pressed", "false")],
    );
    doc.append_child(root, button);
    doc.set_text_content(button, label(&ThemeChoice::Default));
    Ok(ToggleUi { root, button })
}

/// Reflect the active theme on the button and the host.
pub fn sync_toggle(
    doc: &mut Document,
    host: NodeId,
    ui: ToggleUi,
    theme: &ThemeChoice,
) -> Result<(), DomError> {
    let pressed = if theme.is_default() { "false" } else { "true" };
    doc.set_attribute(ui.button, "aria-pressed", pressed)?;
    doc.set_text_content(ui.button, label(theme));
    doc.set_attribute(host, "data-theme", &theme.to_storage())
}

/// What pressing the button would do.
fn label(theme: &ThemeChoice) -> &str {
    match theme {
        ThemeChoice::Default => "Dark mode",
        ThemeChoice::Dark => "Light mode",
        ThemeChoice::Preset(name) => name,
    }
}
