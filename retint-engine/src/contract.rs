//! Host event contract of the companion widgets
//!
//! The dashboard and viewer widgets talk to their host through a fixed
//! naming scheme: a `load-<thing>` event dispatched upward is answered by
//! the host setting a `<thing>-data` attribute, and changes go out as
//! `save-<thing>` followed by a `notification` event. The names are kept
//! here so every integration spells them the same way.

use alloc::format;
use alloc::string::String;

/// Event reporting the outcome of a save.
pub const NOTIFICATION_EVENT: &str = "notification";

/// `load-<thing>`
pub fn load_event(thing: &str) -> String {
    format!("load-{}", thing)
}

/// `<thing>-data`
pub fn data_attribute(thing: &str) -> String {
    format!("{}-data", thing)
}

/// `save-<thing>`
pub fn save_event(thing: &str) -> String {
    format!("save-{}", thing)
}

/// The `<thing>` a `<thing>-data` attribute answers, if it is one.
pub fn data_attribute_subject(attribute: &str) -> Option<&str> {
    attribute
        .strip_suffix("-data")
        .filter(|thing| !thing.is_empty())
}
