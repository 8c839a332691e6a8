//! Tree iteration
//!
//! Iteration follows child links only, so it stays inside one tree scope:
//! shadow roots are reached explicitly through their host.

use alloc::vec;
use alloc::vec::Vec;

use crate::node::{Node, NodeId};
use crate::Document;

/// Pre-order iterator over the elements of a subtree, root included.
pub struct NodeIterator<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> NodeIterator<'a> {
    /// Create an iterator for elements only.
    pub fn elements(document: &'a Document, root: NodeId) -> Self {
        NodeIterator {
            document,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for NodeIterator<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node_id) = self.stack.pop() {
            let Some(node) = self.document.get(node_id) else {
                continue;
            };

            // Push children in reverse so the first child comes out first
            let mut child_id = node.last_child;
            while let Some(id) = child_id {
                self.stack.push(id);
                child_id = self.document.get(id).and_then(|n| n.prev_sibling);
            }

            if node.is_element() {
                return Some(node);
            }
        }

        None
    }
}

impl Document {
    /// Get all element descendants of a node.
    pub fn element_descendants(&self, root: NodeId) -> Vec<NodeId> {
        NodeIterator::elements(self, root)
            .filter(|n| n.id != root)
            .map(|n| n.id)
            .collect()
    }

    /// Check if node is a descendant of another within the same tree scope.
    pub fn is_descendant_of(&self, node_id: NodeId, ancestor_id: NodeId) -> bool {
        let mut current = self.get(node_id).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor_id {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShadowRootMode;

    #[test]
    fn test_pre_order() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("c");
        doc.append_child(body, a);
        doc.append_child(a, b);
        doc.append_child(body, c);
        doc.append_text(c, "text");

        assert_eq!(doc.element_descendants(body), vec![a, b, c]);
        let all: Vec<NodeId> = NodeIterator::elements(&doc, body).map(|n| n.id).collect();
        assert_eq!(all, vec![body, a, b, c]);
    }

    #[test]
    fn test_shadow_boundaries() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let host = doc.create_element("x-widget");
        doc.append_child(body, host);
        let root = doc.attach_shadow(host, ShadowRootMode::Closed).unwrap();
        let inner = doc.create_element("div");
        doc.append_child(root, inner);

        assert_eq!(doc.element_descendants(body), vec![host]);
        assert!(!doc.is_descendant_of(inner, body));
        assert!(doc.is_descendant_of(inner, root));
        assert_eq!(doc.composed_parent(inner), Some(root));
        assert_eq!(doc.composed_parent(root), Some(host));
    }
}
