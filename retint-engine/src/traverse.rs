//! Tree and shadow traversal
//!
//! A single worklist walk reaches every element of the light DOM and of
//! every open shadow root below a starting node. The engine's own host is
//! pruned wherever it turns up, together with everything below it.

use alloc::vec;
use alloc::vec::Vec;

use retint_dom::{Document, NodeId};

/// Elements found by a walk, split by tree scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reachable {
    /// Elements of the tree the walk started in.
    pub light: Vec<NodeId>,
    /// Elements inside open shadow roots.
    pub shadow: Vec<NodeId>,
    /// Shadow roots visited, each once.
    pub shadow_roots: Vec<NodeId>,
}

impl Reachable {
    /// Light elements first, then shadow elements.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.light.iter().chain(self.shadow.iter()).copied()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.light.len() + self.shadow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Check if `node` is the host or lies anywhere below it, shadow trees
/// included.
pub fn is_own_subtree(doc: &Document, host: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == host {
            return true;
        }
        current = doc.composed_parent(id);
    }
    false
}

/// Walk `start` and everything reachable below it. `start` itself is
/// included when it is an element.
pub fn reachable_elements(doc: &Document, start: NodeId, host: NodeId) -> Reachable {
    let mut found = Reachable::default();
    // (node, inside a shadow tree)
    let mut stack = vec![(start, false)];

    while let Some((id, in_shadow)) = stack.pop() {
        if id == host {
            continue;
        }
        let Some(node) = doc.get(id) else {
            continue;
        };

        if node.is_element() {
            if in_shadow {
                found.shadow.push(id);
            } else {
                found.light.push(id);
            }
            if let Some(root) = doc.shadow_root(id) {
                found.shadow_roots.push(root);
                stack.push((root, true));
            }
        }

        let mut child = node.last_child;
        while let Some(child_id) = child {
            stack.push((child_id, in_shadow));
            child = doc.get(child_id).and_then(|n| n.prev_sibling);
        }
    }

    found
}

/// Every element reachable from the document, minus the host's subtree.
pub fn document_elements(doc: &Document, host: NodeId) -> Reachable {
    match doc.document_element_id() {
        Some(root) => reachable_elements(doc, root, host),
        None => Reachable::default(),
    }
}
