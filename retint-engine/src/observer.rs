//! Mutation batching
//!
//! Records from the body observer are reduced to a set of elements that
//! need (re)processing. The engine decides when a batch counts and when
//! the pending set is flushed.

use alloc::vec::Vec;
use hashbrown::HashSet;

use retint_dom::{Document, MutationKind, MutationRecord, NodeId, ObserveOptions, ObserverId};

use crate::snapshot::SnapshotStore;
use crate::traverse::is_own_subtree;

/// Attributes whose changes can alter an element's colors.
pub const OBSERVED_ATTRIBUTES: [&str; 2] = ["style", "class"];

/// Body observer plus the elements waiting for the next flush.
#[derive(Debug)]
pub struct MutationBatcher {
    observer: ObserverId,
    pending: Vec<NodeId>,
    seen: HashSet<NodeId>,
}

impl MutationBatcher {
    /// Observe `target` and its light-DOM subtree.
    pub fn connect(doc: &mut Document, target: NodeId) -> Self {
        let observer = doc.observe(
            target,
            ObserveOptions::CHILD_LIST | ObserveOptions::ATTRIBUTES | ObserveOptions::SUBTREE,
            Some(&OBSERVED_ATTRIBUTES[..]),
        );
        MutationBatcher {
            observer,
            pending: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    /// Take the records queued since the last call.
    pub fn take_records(&self, doc: &mut Document) -> Vec<MutationRecord> {
        doc.take_records(self.observer)
    }

    /// Add the elements a batch touched. Added elements always count;
    /// attribute targets only when not yet processed this epoch. Returns
    /// how many new elements became pending.
    pub fn collect(
        &mut self,
        doc: &Document,
        records: &[MutationRecord],
        host: NodeId,
        snapshots: &SnapshotStore,
    ) -> usize {
        let before = self.pending.len();
        for record in records {
            match record.kind {
                MutationKind::ChildList => {
                    for &node in &record.added_nodes {
                        self.push(doc, node, host);
                    }
                }
                MutationKind::Attributes => {
                    if !snapshots.is_processed(record.target) {
                        self.push(doc, record.target, host);
                    }
                }
            }
        }
        self.pending.len() - before
    }

    fn push(&mut self, doc: &Document, node: NodeId, host: NodeId) {
        let is_element = doc.get(node).map_or(false, |n| n.is_element());
        if !is_element || is_own_subtree(doc, host, node) {
            return;
        }
        if self.seen.insert(node) {
            self.pending.push(node);
        }
    }

    /// Elements waiting for a flush, in arrival order.
    pub fn take_pending(&mut self) -> Vec<NodeId> {
        self.seen.clear();
        core::mem::take(&mut self.pending)
    }

    pub fn clear_pending(&mut self) {
        self.seen.clear();
        self.pending.clear();
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Stop observing. Queued records and pending elements are dropped.
    pub fn disconnect(self, doc: &mut Document) {
        doc.disconnect(self.observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_added_and_restyled_elements() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let host = doc.create_element("retint-toggle");
        doc.append_child(body, host);
        let existing = doc.create_element("div");
        doc.append_child(body, existing);

        let mut batcher = MutationBatcher::connect(&mut doc, body);
        let span = doc.create_element("span");
        doc.append_child(existing, span);
        doc.append_text(existing, "text only");
        doc.set_attribute(existing, "class", "promo").unwrap();
        doc.set_attribute(existing, "class", "promo wide").unwrap();
        doc.set_attribute(existing, "data-x", "1").unwrap();
        doc.set_attribute(host, "class", "ignored").unwrap();

        let records = batcher.take_records(&mut doc);
        let added = batcher.collect(&doc, &records, host, &SnapshotStore::new());
        assert_eq!(added, 2);
        assert_eq!(batcher.take_pending(), alloc::vec![span, existing]);
        assert!(!batcher.has_pending());
    }

    #[test]
    fn test_processed_attribute_targets_are_skipped() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let div = doc.create_element("div");
        doc.append_child(body, div);
        let mut snapshots = SnapshotStore::new();
        snapshots.mark_processed(div);

        let mut batcher = MutationBatcher::connect(&mut doc, body);
        doc.set_attribute(div, "style", "color: red").unwrap();
        let records = batcher.take_records(&mut doc);
        assert_eq!(batcher.collect(&doc, &records, usize::MAX, &snapshots), 0);
    }

    #[test]
    fn test_disconnect_removes_observer() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let batcher = MutationBatcher::connect(&mut doc, body);
        assert_eq!(doc.observers().len(), 1);
        batcher.disconnect(&mut doc);
        assert!(doc.observers().is_empty());
    }
}
