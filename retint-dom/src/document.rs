//! DOM Document - Document node and tree management

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::DomError;
use crate::location::HistoryEvent;
use crate::mutation::{MutationObservers, MutationRecord};
use crate::node::{Attribute, Node, NodeData, NodeId, ShadowRootMode};
use crate::registry::CustomElementRegistry;
use crate::selector::Selector;
use crate::style::InlineStyle;
use crate::stylesheet::Stylesheet;

/// A DOM document.
#[derive(Debug)]
pub struct Document {
    /// All nodes in the document, attached or not.
    nodes: Vec<Node>,
    /// Stylesheets with the tree scope (document or shadow root) they apply to.
    pub(crate) stylesheets: Vec<(NodeId, Stylesheet)>,
    pub(crate) observers: MutationObservers,
    pub(crate) location: String,
    pub(crate) history: Vec<HistoryEvent>,
    registry: CustomElementRegistry,
    html: NodeId,
    body: NodeId,
}

/// Id of the document node.
pub const DOCUMENT_NODE: NodeId = 0;

impl Document {
    /// Create a document with an empty `<html><head></head><body></body></html>`.
    pub fn new() -> Self {
        let mut doc = Document {
            nodes: vec![Node::new_document(DOCUMENT_NODE)],
            stylesheets: Vec::new(),
            observers: MutationObservers::default(),
            location: String::from("about:blank"),
            history: Vec::new(),
            registry: CustomElementRegistry::default(),
            html: DOCUMENT_NODE,
            body: DOCUMENT_NODE,
        };

        doc.html = doc.create_element("html");
        let head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.link_child(DOCUMENT_NODE, doc.html, None);
        doc.link_child(doc.html, head, None);
        doc.link_child(doc.html, doc.body, None);
        doc
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// The `<html>` element.
    pub fn document_element_id(&self) -> Option<NodeId> {
        Some(self.html).filter(|&id| id != DOCUMENT_NODE)
    }

    /// The `<body>` element.
    pub fn body(&self) -> Option<NodeId> {
        Some(self.body).filter(|&id| id != DOCUMENT_NODE)
    }

    /// Create a new element.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.create_element_with(tag_name, &[])
    }

    /// Create a new element with attributes.
    pub fn create_element_with(&mut self, tag_name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.nodes.len();
        let attrs: Vec<Attribute> = attrs.iter().map(|(n, v)| Attribute::new(n, v)).collect();
        self.nodes.push(Node::new_element(id, tag_name, attrs));
        id
    }

    /// Create a new text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new_text(id, content.into()));
        id
    }

    /// Append a child to a parent, moving it out of its current parent.
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        self.insert_before(parent_id, child_id, None);
    }

    /// Insert a child before another child (or append when `ref_child_id`
    /// is `None` or not a child of `parent_id`).
    pub fn insert_before(
        &mut self,
        parent_id: NodeId,
        new_child_id: NodeId,
        ref_child_id: Option<NodeId>,
    ) {
        if parent_id == new_child_id || self.get(parent_id).is_none() {
            return;
        }
        if self.get(new_child_id).map_or(true, |n| n.is_shadow_root()) {
            return;
        }
        // A node can't go under its own descendant
        let has_children = self.get(new_child_id).map_or(false, |n| n.first_child.is_some());
        if has_children && self.is_descendant_of(parent_id, new_child_id) {
            return;
        }
        if self.get(new_child_id).and_then(|n| n.parent).is_some() {
            self.remove_child(new_child_id);
        }

        let ref_child_id =
            ref_child_id.filter(|&r| self.get(r).and_then(|n| n.parent) == Some(parent_id));
        self.link_child(parent_id, new_child_id, ref_child_id);
        self.queue_mutation(MutationRecord::child_list(
            parent_id,
            vec![new_child_id],
            Vec::new(),
        ));
    }

    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId, ref_id: Option<NodeId>) {
        let prev_id = match ref_id {
            Some(r) => self.nodes.get(r).and_then(|n| n.prev_sibling),
            None => self.nodes.get(parent_id).and_then(|p| p.last_child),
        };

        if let Some(child) = self.nodes.get_mut(child_id) {
            child.parent = Some(parent_id);
            child.prev_sibling = prev_id;
            child.next_sibling = ref_id;
        }

        match ref_id {
            Some(r) => {
                if let Some(ref_child) = self.nodes.get_mut(r) {
                    ref_child.prev_sibling = Some(child_id);
                }
            }
            None => {
                if let Some(parent) = self.nodes.get_mut(parent_id) {
                    parent.last_child = Some(child_id);
                }
            }
        }

        match prev_id {
            Some(p) => {
                if let Some(prev) = self.nodes.get_mut(p) {
                    prev.next_sibling = Some(child_id);
                }
            }
            None => {
                if let Some(parent) = self.nodes.get_mut(parent_id) {
                    parent.first_child = Some(child_id);
                }
            }
        }

        let scope = self.tree_scope(parent_id);
        self.set_subtree_scope(child_id, scope);
    }

    /// Re-root `root` and its light descendants into `scope`. Shadow roots
    /// below keep their own scope.
    fn set_subtree_scope(&mut self, root: NodeId, scope: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.scope = scope;
            let mut child = node.first_child;
            while let Some(child_id) = child {
                stack.push(child_id);
                child = self.nodes.get(child_id).and_then(|n| n.next_sibling);
            }
        }
    }

    /// Remove a child from its parent.
    pub fn remove_child(&mut self, child_id: NodeId) {
        let (parent_id, prev_id, next_id) = {
            let child = match self.nodes.get(child_id) {
                Some(c) => c,
                None => return,
            };
            match child.parent {
                Some(parent) => (parent, child.prev_sibling, child.next_sibling),
                None => return,
            }
        };

        // Update previous sibling
        match prev_id {
            Some(prev_id) => {
                if let Some(prev) = self.nodes.get_mut(prev_id) {
                    prev.next_sibling = next_id;
                }
            }
            None => {
                if let Some(parent) = self.nodes.get_mut(parent_id) {
                    parent.first_child = next_id;
                }
            }
        }

        // Update next sibling
        match next_id {
            Some(next_id) => {
                if let Some(next) = self.nodes.get_mut(next_id) {
                    next.prev_sibling = prev_id;
                }
            }
            None => {
                if let Some(parent) = self.nodes.get_mut(parent_id) {
                    parent.last_child = prev_id;
                }
            }
        }

        // Clear child's links
        if let Some(child) = self.nodes.get_mut(child_id) {
            child.parent = None;
            child.prev_sibling = None;
            child.next_sibling = None;
        }
        self.set_subtree_scope(child_id, child_id);

        self.queue_mutation(MutationRecord::child_list(
            parent_id,
            Vec::new(),
            vec![child_id],
        ));
    }

    /// Get children of a node.
    pub fn children(&self, parent_id: NodeId) -> Vec<NodeId> {
        let mut children = Vec::new();
        let mut child_id = self.nodes.get(parent_id).and_then(|p| p.first_child);

        while let Some(id) = child_id {
            children.push(id);
            child_id = self.nodes.get(id).and_then(|n| n.next_sibling);
        }

        children
    }

    /// Elements under `root` matching a compound selector, in tree order.
    /// Does not descend into shadow trees. Invalid selectors match nothing.
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.element_descendants(root)
            .into_iter()
            .filter(|&id| self.get(id).map_or(false, |n| selector.matches(n)))
            .collect()
    }

    /// Get text content of a node (recursive).
    pub fn text_content(&self, node_id: NodeId) -> String {
        let node = match self.get(node_id) {
            Some(n) => n,
            None => return String::new(),
        };

        match &node.data {
            NodeData::Text { content } => content.clone(),
            NodeData::Element { .. } | NodeData::ShadowRoot { .. } => {
                let mut result = String::new();
                for child_id in self.children(node_id) {
                    result.push_str(&self.text_content(child_id));
                }
                result
            }
            _ => String::new(),
        }
    }

    /// Append or merge text to a node.
    pub fn append_text(&mut self, parent_id: NodeId, text: &str) {
        let last = self.nodes.get(parent_id).and_then(|p| p.last_child);
        if let Some(last) = last.and_then(|id| self.nodes.get_mut(id)) {
            if let NodeData::Text { content } = &mut last.data {
                content.push_str(text);
                return;
            }
        }

        let text_id = self.create_text(text);
        self.append_child(parent_id, text_id);
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&mut self, node_id: NodeId, text: &str) {
        for child in self.children(node_id) {
            self.remove_child(child);
        }
        if !text.is_empty() {
            let text_id = self.create_text(text);
            self.append_child(node_id, text_id);
        }
    }

    /// Get an attribute value.
    pub fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.get(node_id)?.get_attribute(name)
    }

    /// Set an attribute.
    pub fn set_attribute(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let old_value = self.element_mut(node_id)?.set_attribute(name, value);
        self.queue_mutation(MutationRecord::attribute(
            node_id,
            &name.to_ascii_lowercase(),
            old_value,
        ));
        Ok(())
    }

    /// Remove an attribute. Returns the previous value.
    pub fn remove_attribute(&mut self, node_id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let old_value = self.element_mut(node_id)?.remove_attribute(name);
        if let Some(old) = &old_value {
            self.queue_mutation(MutationRecord::attribute(
                node_id,
                &name.to_ascii_lowercase(),
                Some(old.clone()),
            ));
        }
        Ok(old_value)
    }

    /// Inline style of an element.
    pub fn inline_style(&self, node_id: NodeId) -> Option<&InlineStyle> {
        self.get(node_id)?.inline_style()
    }

    /// Inline property value, empty when unset.
    pub fn style_property(&self, node_id: NodeId, property: &str) -> &str {
        self.inline_style(node_id)
            .map(|s| s.get_property_value(property))
            .unwrap_or("")
    }

    /// `style.setProperty(property, value, important ? "important" : "")`.
    pub fn set_style_property(
        &mut self,
        node_id: NodeId,
        property: &str,
        value: &str,
        important: bool,
    ) -> Result<(), DomError> {
        let node = self.element_mut(node_id)?;
        if let Some(style) = node.inline_style_mut() {
            style.set_property(property, value, important);
        }
        self.sync_style(node_id);
        Ok(())
    }

    /// `style.removeProperty(property)`. Returns the previous value.
    pub fn remove_style_property(&mut self, node_id: NodeId, property: &str) -> Result<String, DomError> {
        let node = self.element_mut(node_id)?;
        let old = node
            .inline_style_mut()
            .map(|s| s.remove_property(property))
            .unwrap_or_default();
        if !old.is_empty() {
            self.sync_style(node_id);
        }
        Ok(old)
    }

    fn sync_style(&mut self, node_id: NodeId) {
        let Some(node) = self.nodes.get_mut(node_id) else {
            return;
        };
        let old = node.sync_style_attribute();
        let new = node.get_attribute("style").map(String::from);
        if old != new {
            self.queue_mutation(MutationRecord::attribute(node_id, "style", old));
        }
    }

    /// `element.attachShadow({ mode })`.
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> Result<NodeId, DomError> {
        let id = self.nodes.len();
        match &mut self.element_mut(host)?.data {
            NodeData::Element {
                shadow_root: Some(_),
                ..
            } => return Err(DomError::ShadowRootExists(host)),
            NodeData::Element { shadow_root, .. } => *shadow_root = Some(id),
            _ => return Err(DomError::NotAnElement(host)),
        }
        self.nodes.push(Node::new_shadow_root(id, host, mode));
        Ok(id)
    }

    /// `element.shadowRoot`: open roots only.
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let root = match &self.get(host)?.data {
            NodeData::Element { shadow_root, .. } => (*shadow_root)?,
            _ => return None,
        };
        match self.get(root)?.data {
            NodeData::ShadowRoot {
                mode: ShadowRootMode::Open,
                ..
            } => Some(root),
            _ => None,
        }
    }

    /// Parent, or the host when `node_id` is a shadow root.
    pub fn composed_parent(&self, node_id: NodeId) -> Option<NodeId> {
        let node = self.get(node_id)?;
        node.parent.or_else(|| node.shadow_host())
    }

    /// Root of the tree `node_id` lives in: the document node, a shadow
    /// root, or the top of a detached subtree.
    pub fn tree_scope(&self, node_id: NodeId) -> NodeId {
        self.get(node_id).map_or(node_id, |n| n.scope)
    }

    /// Check if the node is connected to the document, shadow trees
    /// of connected hosts included.
    pub fn is_connected(&self, node_id: NodeId) -> bool {
        let mut current = node_id;
        loop {
            let scope = self.tree_scope(current);
            if scope == DOCUMENT_NODE {
                return true;
            }
            match self.get(scope).and_then(|n| n.shadow_host()) {
                Some(host) => current = host,
                None => return false,
            }
        }
    }

    /// Add a document-level stylesheet.
    pub fn add_stylesheet(&mut self, css: &str) {
        self.stylesheets.push((DOCUMENT_NODE, Stylesheet::parse(css)));
    }

    /// Add a stylesheet scoped to a shadow root.
    pub fn add_scoped_stylesheet(&mut self, scope: NodeId, css: &str) {
        self.stylesheets.push((scope, Stylesheet::parse(css)));
    }

    /// Custom element registry.
    pub fn custom_elements(&self) -> &CustomElementRegistry {
        &self.registry
    }

    /// Mutable custom element registry.
    pub fn custom_elements_mut(&mut self) -> &mut CustomElementRegistry {
        &mut self.registry
    }

    fn element_mut(&mut self, node_id: NodeId) -> Result<&mut Node, DomError> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(DomError::UnknownNode(node_id))?;
        if node.is_element() {
            Ok(node)
        } else {
            Err(DomError::NotAnElement(node_id))
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_document() {
        let doc = Document::new();
        assert!(doc.get(DOCUMENT_NODE).unwrap().is_document());
        let body = doc.body().unwrap();
        assert_eq!(doc.get(body).unwrap().tag_name(), Some("body"));
        assert!(doc.is_connected(body));
    }

    #[test]
    fn test_insert_before_and_remove() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(body, b);
        doc.insert_before(body, a, Some(b));
        assert_eq!(doc.children(body), vec![a, b]);

        doc.remove_child(a);
        assert_eq!(doc.children(body), vec![b]);
        assert!(!doc.is_connected(a));
    }

    #[test]
    fn test_scope_follows_moves() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(outer, inner);
        assert_eq!(doc.tree_scope(inner), outer);
        assert!(!doc.is_connected(inner));

        doc.append_child(body, outer);
        assert_eq!(doc.tree_scope(inner), DOCUMENT_NODE);
        assert!(doc.is_connected(inner));

        let host = doc.create_element("x-card");
        doc.append_child(body, host);
        let root = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
        doc.append_child(root, outer);
        assert_eq!(doc.tree_scope(inner), root);
        assert!(doc.is_connected(inner));

        doc.remove_child(host);
        assert_eq!(doc.tree_scope(inner), root);
        assert!(!doc.is_connected(inner));

        doc.remove_child(outer);
        assert_eq!(doc.tree_scope(inner), outer);

        // inserting a node under its own descendant is refused
        doc.append_child(inner, outer);
        assert_eq!(doc.get(outer).and_then(|n| n.parent), None);
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(body, inner);
        doc.append_child(body, outer);
        doc.append_child(outer, inner);
        assert_eq!(doc.children(body), vec![outer]);
        assert_eq!(doc.children(outer), vec![inner]);
    }

    #[test]
    fn test_shadow_roots() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let open_host = doc.create_element("x-open");
        let closed_host = doc.create_element("x-closed");
        doc.append_child(body, open_host);
        doc.append_child(body, closed_host);

        let open = doc.attach_shadow(open_host, ShadowRootMode::Open).unwrap();
        let closed = doc.attach_shadow(closed_host, ShadowRootMode::Closed).unwrap();
        assert_eq!(doc.shadow_root(open_host), Some(open));
        assert_eq!(doc.shadow_root(closed_host), None);
        assert_eq!(
            doc.attach_shadow(open_host, ShadowRootMode::Open),
            Err(DomError::ShadowRootExists(open_host))
        );

        let inner = doc.create_element("p");
        doc.append_child(closed, inner);
        assert!(doc.is_connected(inner));
        assert_eq!(doc.tree_scope(inner), closed);
        assert_eq!(doc.composed_parent(closed), Some(closed_host));
    }

    #[test]
    fn test_style_property_round_trip() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        doc.set_style_property(body, "color", "#e9ecef", true).unwrap();
        assert_eq!(doc.style_property(body, "color"), "#e9ecef");
        assert_eq!(
            doc.get_attribute(body, "style"),
            Some("color: #e9ecef !important;")
        );
        assert_eq!(doc.remove_style_property(body, "color").unwrap(), "#e9ecef");
        assert_eq!(doc.style_property(body, "color"), "");
        assert_eq!(doc.get_attribute(body, "style"), None);
    }

    #[test]
    fn test_style_on_text_node_fails() {
        let mut doc = Document::new();
        let text = doc.create_text("hi");
        assert_eq!(
            doc.set_style_property(text, "color", "red", false),
            Err(DomError::NotAnElement(text))
        );
        assert_eq!(
            doc.set_style_property(999, "color", "red", false),
            Err(DomError::UnknownNode(999))
        );
    }

    #[test]
    fn test_query_selector_all() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let h1 = doc.create_element("h1");
        let widget = doc.create_element_with("div", &[("data-widget", "reviews")]);
        doc.append_child(body, h1);
        doc.append_child(body, widget);
        let root = doc.document_element_id().unwrap();
        assert_eq!(doc.query_selector_all(root, "h1"), vec![h1]);
        assert_eq!(doc.query_selector_all(root, "[data-widget]"), vec![widget]);
        assert!(doc.query_selector_all(root, "div p").is_empty());
    }
}
