//! Mutation records
//!
//! Observers register on a target with [`ObserveOptions`]; the document
//! queues a [`MutationRecord`] for every child list or attribute change and
//! hands each observer its records on [`Document::take_records`]. Like the
//! platform observer, `SUBTREE` does not cross into shadow trees.

use alloc::string::String;
use alloc::vec::Vec;
use bitflags::bitflags;

use crate::node::NodeId;
use crate::Document;

bitflags! {
    /// What an observer wants to hear about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ObserveOptions: u8 {
        const CHILD_LIST = 0x1;
        const ATTRIBUTES = 0x2;
        const SUBTREE = 0x4;
        const ATTRIBUTE_OLD_VALUE = 0x8;
    }
}

/// Observer handle.
pub type ObserverId = usize;

/// Kind of change a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
}

/// A single queued change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    pub fn child_list(target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) -> Self {
        MutationRecord {
            kind: MutationKind::ChildList,
            target,
            added_nodes: added,
            removed_nodes: removed,
            attribute_name: None,
            old_value: None,
        }
    }

    pub fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        MutationRecord {
            kind: MutationKind::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.into()),
            old_value,
        }
    }
}

#[derive(Debug)]
struct Registration {
    target: NodeId,
    options: ObserveOptions,
    attribute_filter: Option<Vec<String>>,
    records: Vec<MutationRecord>,
}

impl Registration {
    fn wants(&self, record: &MutationRecord) -> bool {
        match record.kind {
            MutationKind::ChildList => self.options.contains(ObserveOptions::CHILD_LIST),
            MutationKind::Attributes => {
                self.options.contains(ObserveOptions::ATTRIBUTES)
                    && match (&self.attribute_filter, &record.attribute_name) {
                        (Some(filter), Some(name)) => filter.iter().any(|f| f == name),
                        _ => true,
                    }
            }
        }
    }
}

/// Observer registrations of a document.
#[derive(Debug, Default)]
pub struct MutationObservers {
    registrations: Vec<Option<Registration>>,
}

impl MutationObservers {
    /// Number of connected observers.
    pub fn len(&self) -> usize {
        self.registrations.iter().filter(|r| r.is_some()).count()
    }

    /// Check if no observer is connected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Document {
    /// Start observing `target`. `attribute_filter` limits attribute
    /// records to the listed names.
    pub fn observe(
        &mut self,
        target: NodeId,
        options: ObserveOptions,
        attribute_filter: Option<&[&str]>,
    ) -> ObserverId {
        let registration = Registration {
            target,
            options,
            attribute_filter: attribute_filter
                .map(|names| names.iter().map(|n| n.to_ascii_lowercase()).collect()),
            records: Vec::new(),
        };
        self.observers.registrations.push(Some(registration));
        self.observers.registrations.len() - 1
    }

    /// Stop an observer and drop its pending records.
    pub fn disconnect(&mut self, observer: ObserverId) {
        if let Some(slot) = self.observers.registrations.get_mut(observer) {
            *slot = None;
        }
    }

    /// Take the records queued for an observer.
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        match self.observers.registrations.get_mut(observer) {
            Some(Some(registration)) => core::mem::take(&mut registration.records),
            _ => Vec::new(),
        }
    }

    /// Connected observers.
    pub fn observers(&self) -> &MutationObservers {
        &self.observers
    }

    pub(crate) fn queue_mutation(&mut self, mut record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }

        let interested: Vec<(usize, bool)> = self
            .observers
            .registrations
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let registration = slot.as_ref()?;
                let in_scope = registration.target == record.target
                    || (registration.options.contains(ObserveOptions::SUBTREE)
                        && self.is_descendant_of(record.target, registration.target));
                (in_scope && registration.wants(&record)).then(|| {
                    (
                        i,
                        registration
                            .options
                            .contains(ObserveOptions::ATTRIBUTE_OLD_VALUE),
                    )
                })
            })
            .collect();

        let old_value = record.old_value.take();
        for (i, keep_old) in interested {
            if let Some(Some(registration)) = self.observers.registrations.get_mut(i) {
                let mut copy = record.clone();
                if keep_old {
                    copy.old_value = old_value.clone();
                }
                registration.records.push(copy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_child_list_records_in_subtree() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let observer = doc.observe(
            body,
            ObserveOptions::CHILD_LIST | ObserveOptions::SUBTREE,
            None,
        );

        let div = doc.create_element("div");
        doc.append_child(body, div);
        let span = doc.create_element("span");
        doc.append_child(div, span);

        let records = doc.take_records(observer);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].added_nodes, vec![div]);
        assert_eq!(records[1].target, div);
        assert!(doc.take_records(observer).is_empty());
    }

    #[test]
    fn test_attribute_filter_and_old_value() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let div = doc.create_element("div");
        doc.append_child(body, div);
        let observer = doc.observe(
            body,
            ObserveOptions::ATTRIBUTES
                | ObserveOptions::SUBTREE
                | ObserveOptions::ATTRIBUTE_OLD_VALUE,
            Some(&["style", "class"]),
        );

        doc.set_attribute(div, "title", "ignored").unwrap();
        doc.set_attribute(div, "class", "a").unwrap();
        doc.set_attribute(div, "class", "b").unwrap();

        let records = doc.take_records(observer);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].old_value.as_deref(), Some("a"));
    }

    #[test]
    fn test_shadow_tree_changes_are_not_observed() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let host = doc.create_element("x-card");
        doc.append_child(body, host);
        let root = doc.attach_shadow(host, crate::ShadowRootMode::Open).unwrap();
        let observer = doc.observe(
            body,
            ObserveOptions::CHILD_LIST | ObserveOptions::SUBTREE,
            None,
        );

        let inner = doc.create_element("p");
        doc.append_child(root, inner);
        assert!(doc.take_records(observer).is_empty());
    }

    #[test]
    fn test_disconnect() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let observer = doc.observe(body, ObserveOptions::CHILD_LIST, None);
        assert_eq!(doc.observers().len(), 1);
        doc.disconnect(observer);
        assert!(doc.observers().is_empty());
        let div = doc.create_element("div");
        doc.append_child(body, div);
        assert!(doc.take_records(observer).is_empty());
    }
}
