//! Color snapshots
//!
//! A snapshot holds an element's computed colors as they were before the
//! engine touched it. Snapshots and the processed set live in one epoch and
//! are always cleared together. Entries are keyed by `NodeId`, so a
//! snapshot never keeps a node alive; detached nodes are pruned instead.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};

use retint_dom::{Document, NodeId};

use crate::traverse::is_own_subtree;

/// Computed colors of one element at capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSnapshot {
    pub background_color: String,
    pub color: String,
    /// top, right, bottom, left
    pub border_colors: [String; 4],
    pub fill: String,
    pub stroke: String,
    pub background_image: String,
    pub text_fill_color: String,
}

impl ColorSnapshot {
    /// Read an element's computed colors. `None` for anything that is not
    /// an element.
    pub fn read(doc: &Document, node: NodeId) -> Option<Self> {
        Self::read_with(doc, node, |_, _| None)
    }

    /// Like [`ColorSnapshot::read`], with inherited values taken from
    /// `known` for any ancestor it has an answer for.
    pub fn read_with<F>(doc: &Document, node: NodeId, known: F) -> Option<Self>
    where
        F: Fn(NodeId, &str) -> Option<String>,
    {
        let get = |property: &str| doc.computed_style_with(node, property, &known);
        Some(ColorSnapshot {
            background_color: get("background-color")?,
            color: get("color")?,
            border_colors: [
                get("border-top-color")?,
                get("border-right-color")?,
                get("border-bottom-color")?,
                get("border-left-color")?,
            ],
            fill: get("fill")?,
            stroke: get("stroke")?,
            background_image: get("background-image")?,
            text_fill_color: get("-webkit-text-fill-color")?,
        })
    }

    /// Captured value of a property by its CSS name.
    pub fn value(&self, property: &str) -> Option<&str> {
        let value = match property {
            "background-color" => &self.background_color,
            "color" => &self.color,
            "border-top-color" => &self.border_colors[0],
            "border-right-color" => &self.border_colors[1],
            "border-bottom-color" => &self.border_colors[2],
            "border-left-color" => &self.border_colors[3],
            "fill" => &self.fill,
            "stroke" => &self.stroke,
            "background-image" => &self.background_image,
            "-webkit-text-fill-color" => &self.text_fill_color,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Snapshots and processed markers of the current epoch.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    epoch: u64,
    snapshots: HashMap<NodeId, ColorSnapshot>,
    processed: HashSet<NodeId>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch number.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start a new epoch: drop every snapshot and processed marker.
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.processed.clear();
        self.epoch += 1;
    }

    /// Capture `node` unless it is already captured this epoch or belongs
    /// to the engine's own subtree. Returns whether a snapshot was taken.
    ///
    /// Inherited colors come from the nearest captured ancestor, so a node
    /// found under an already recolored element still sees the page's own
    /// colors.
    pub fn capture(&mut self, doc: &Document, node: NodeId, host: NodeId) -> bool {
        if self.snapshots.contains_key(&node) || is_own_subtree(doc, host, node) {
            return false;
        }
        if !doc.is_connected(node) {
            return false;
        }
        let snapshots = &self.snapshots;
        let known = |ancestor: NodeId, property: &str| {
            snapshots
                .get(&ancestor)
                .and_then(|s| s.value(property))
                .map(String::from)
        };
        match ColorSnapshot::read_with(doc, node, known) {
            Some(snapshot) => {
                self.snapshots.insert(node, snapshot);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, node: NodeId) -> Option<&ColorSnapshot> {
        self.snapshots.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.snapshots.contains_key(&node)
    }

    /// Snapshotted nodes, in no particular order.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.snapshots.keys().copied().collect()
    }

    pub fn mark_processed(&mut self, node: NodeId) {
        self.processed.insert(node);
    }

    pub fn is_processed(&self, node: NodeId) -> bool {
        self.processed.contains(&node)
    }

    /// Forget nodes that are no longer connected. Returns the nodes whose
    /// snapshot was dropped.
    pub fn prune_detached(&mut self, doc: &Document) -> Vec<NodeId> {
        let detached: Vec<NodeId> = self
            .snapshots
            .keys()
            .copied()
            .filter(|&node| !doc.is_connected(node))
            .collect();
        for node in &detached {
            self.snapshots.remove(node);
        }
        self.processed.retain(|&node| doc.is_connected(node));
        detached
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
