//! DOM Node - Base node type

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::style::InlineStyle;

/// Node ID - unique identifier within a document. Never reused.
pub type NodeId = usize;

/// DOM node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Document = 9,
    DocumentFragment = 11,
}

/// Shadow root encapsulation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowRootMode {
    /// Reachable through the host's `shadow_root`.
    Open,
    /// Unreachable from outside the host.
    Closed,
}

/// A DOM node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique ID of this node.
    pub id: NodeId,
    /// Node type.
    pub node_type: NodeType,
    /// Node data (element, text, etc.)
    pub data: NodeData,
    /// Parent node ID. Shadow roots have none; see [`NodeData::ShadowRoot`].
    pub parent: Option<NodeId>,
    /// First child node ID.
    pub first_child: Option<NodeId>,
    /// Last child node ID.
    pub last_child: Option<NodeId>,
    /// Previous sibling node ID.
    pub prev_sibling: Option<NodeId>,
    /// Next sibling node ID.
    pub next_sibling: Option<NodeId>,
    /// Root of the tree this node lives in: the document node, a shadow
    /// root, or the top of a detached subtree. Kept current by the
    /// document on every insertion and removal.
    pub scope: NodeId,
}

/// Node data union.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document node
    Document,
    /// Element node
    Element {
        tag: String,
        attrs: Vec<Attribute>,
        /// Element ID attribute value (cached)
        id: Option<String>,
        /// Element class list (cached)
        classes: Vec<String>,
        /// Parsed `style` attribute
        style: InlineStyle,
        /// Attached shadow root, open or closed
        shadow_root: Option<NodeId>,
    },
    /// Shadow root attached to `host`
    ShadowRoot { host: NodeId, mode: ShadowRootMode },
    /// Text node
    Text { content: String },
}

/// An element attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    /// Create a new attribute. Names are stored lowercase.
    pub fn new(name: &str, value: &str) -> Self {
        Attribute {
            name: name.to_ascii_lowercase(),
            value: value.into(),
        }
    }
}

impl Node {
    /// Create a new document node.
    pub fn new_document(id: NodeId) -> Self {
        Self::with_data(id, NodeType::Document, NodeData::Document)
    }

    /// Create a new element node.
    pub fn new_element(id: NodeId, tag: &str, attrs: Vec<Attribute>) -> Self {
        let mut node = Self::with_data(
            id,
            NodeType::Element,
            NodeData::Element {
                tag: tag.to_ascii_lowercase(),
                attrs: Vec::new(),
                id: None,
                classes: Vec::new(),
                style: InlineStyle::default(),
                shadow_root: None,
            },
        );
        for attr in attrs {
            node.set_attribute(&attr.name, &attr.value);
        }
        node
    }

    /// Create a new shadow root node.
    pub fn new_shadow_root(id: NodeId, host: NodeId, mode: ShadowRootMode) -> Self {
        Self::with_data(
            id,
            NodeType::DocumentFragment,
            NodeData::ShadowRoot { host, mode },
        )
    }

    /// Create a new text node.
    pub fn new_text(id: NodeId, content: String) -> Self {
        Self::with_data(id, NodeType::Text, NodeData::Text { content })
    }

    fn with_data(id: NodeId, node_type: NodeType, data: NodeData) -> Self {
        Node {
            id,
            node_type,
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            scope: id,
        }
    }

    /// Check if this is an element node.
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Check if this is a document node.
    pub fn is_document(&self) -> bool {
        self.node_type == NodeType::Document
    }

    /// Check if this is a shadow root.
    pub fn is_shadow_root(&self) -> bool {
        matches!(self.data, NodeData::ShadowRoot { .. })
    }

    /// Host element, if this is a shadow root.
    pub fn shadow_host(&self) -> Option<NodeId> {
        match self.data {
            NodeData::ShadowRoot { host, .. } => Some(host),
            _ => None,
        }
    }

    /// Get tag name (lowercase local name of element).
    pub fn tag_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Get element ID (if element with id attribute).
    pub fn element_id(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { id: Some(id), .. } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Get element classes (if element).
    pub fn element_classes(&self) -> &[String] {
        match &self.data {
            NodeData::Element { classes, .. } => classes,
            _ => &[],
        }
    }

    /// Get the inline style (if element).
    pub fn inline_style(&self) -> Option<&InlineStyle> {
        match &self.data {
            NodeData::Element { style, .. } => Some(style),
            _ => None,
        }
    }

    pub(crate) fn inline_style_mut(&mut self) -> Option<&mut InlineStyle> {
        match &mut self.data {
            NodeData::Element { style, .. } => Some(style),
            _ => None,
        }
    }

    /// Get text content (if text node).
    pub fn text_content(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Get attribute value.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(name))
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    /// All attributes (if element).
    pub fn attributes(&self) -> &[Attribute] {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// Set an attribute, refreshing the cached id, classes and style.
    /// Returns the previous value.
    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) -> Option<String> {
        let NodeData::Element {
            attrs,
            id,
            classes,
            style,
            ..
        } = &mut self.data
        else {
            return None;
        };

        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "id" => *id = Some(value.into()),
            "class" => *classes = value.split_whitespace().map(|s| s.into()).collect(),
            "style" => *style = InlineStyle::parse(value),
            _ => {}
        }

        match attrs.iter_mut().find(|a| a.name == name) {
            Some(existing) => Some(core::mem::replace(&mut existing.value, value.into())),
            None => {
                attrs.push(Attribute {
                    name,
                    value: value.into(),
                });
                None
            }
        }
    }

    /// Remove an attribute. Returns the previous value.
    pub(crate) fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let NodeData::Element {
            attrs,
            id,
            classes,
            style,
            ..
        } = &mut self.data
        else {
            return None;
        };

        let pos = attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        match attrs[pos].name.as_str() {
            "id" => *id = None,
            "class" => classes.clear(),
            "style" => *style = InlineStyle::default(),
            _ => {}
        }
        Some(attrs.remove(pos).value)
    }

    /// Store the serialized inline style back into the `style` attribute.
    /// Returns the previous attribute value.
    pub(crate) fn sync_style_attribute(&mut self) -> Option<String> {
        let NodeData::Element { attrs, style, .. } = &mut self.data else {
            return None;
        };

        let text = style.to_css_text();
        match attrs.iter().position(|a| a.name == "style") {
            Some(pos) if text.is_empty() => Some(attrs.remove(pos).value),
            Some(pos) => Some(core::mem::replace(&mut attrs[pos].value, text)),
            None if text.is_empty() => None,
            None => {
                attrs.push(Attribute::new("style", &text));
                None
            }
        }
    }

    /// Check if element has a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.element_classes().iter().any(|c| c == class)
    }

    /// Check if node has children.
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            NodeData::Document => write!(f, "#document"),
            NodeData::Element { tag, .. } => write!(f, "<{}>", tag),
            NodeData::ShadowRoot { .. } => write!(f, "#shadow-root"),
            NodeData::Text { content } => {
                if content.chars().count() > 20 {
                    let head: String = content.chars().take(20).collect();
                    write!(f, "\"{}...\"", head)
                } else {
                    write!(f, "\"{}\"", content)
                }
            }
        }
    }
}
