//! DOM errors

use alloc::string::String;

use crate::node::NodeId;

/// Errors raised by document operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// No node with this id
    #[error("no such node: {0}")]
    UnknownNode(NodeId),
    /// Operation needs an element
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    /// attachShadow on an element that already hosts a root
    #[error("element {0} already hosts a shadow root")]
    ShadowRootExists(NodeId),
    /// Custom element name registered twice
    #[error("custom element `{0}` is already defined")]
    AlreadyDefined(String),
    /// Custom element name without a hyphen or lowercase start
    #[error("`{0}` is not a valid custom element name")]
    InvalidCustomElementName(String),
}
