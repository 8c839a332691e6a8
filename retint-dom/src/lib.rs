//! retint DOM - Document Object Model for retint
//!
//! An arena-backed DOM with the pieces a page recoloring engine depends on:
//! open and closed shadow roots, inline style declarations with priority,
//! a small author stylesheet cascade producing computed color values,
//! mutation records, history/location tracking and a custom element
//! registry. It's designed to work in no_std environments.

#![no_std]

extern crate alloc;

pub mod computed;
pub mod document;
pub mod error;
pub mod location;
pub mod mutation;
pub mod node;
pub mod registry;
pub mod selector;
pub mod style;
pub mod stylesheet;
pub mod traversal;

pub use document::Document;
pub use error::DomError;
pub use location::HistoryEvent;
pub use mutation::{MutationKind, MutationRecord, ObserveOptions, ObserverId};
pub use node::{Attribute, Node, NodeData, NodeId, NodeType, ShadowRootMode};
pub use registry::CustomElementRegistry;
pub use selector::{Selector, Specificity};
pub use style::{Declaration, InlineStyle};
pub use stylesheet::{StyleRule, Stylesheet};
pub use traversal::NodeIterator;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{Document, DomError, Node, NodeId, NodeType, ShadowRootMode};
    pub use crate::{MutationRecord, NodeIterator, ObserveOptions};
}
