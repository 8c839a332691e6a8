//! Location and session history
//!
//! The document keeps its current URL and records every history API call
//! so a consumer can tell `pushState`, `replaceState` and `popstate` apart
//! from a location change it only notices by polling.

use alloc::string::String;
use alloc::vec::Vec;

use crate::Document;

/// A recorded history API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    PushState(String),
    ReplaceState(String),
    PopState(String),
}

impl HistoryEvent {
    /// URL the history moved to.
    pub fn url(&self) -> &str {
        match self {
            HistoryEvent::PushState(url)
            | HistoryEvent::ReplaceState(url)
            | HistoryEvent::PopState(url) => url,
        }
    }
}

impl Document {
    /// Current URL.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Change the URL without any history record (only visible by polling).
    pub fn set_location(&mut self, url: &str) {
        self.location = url.into();
    }

    /// `history.pushState`.
    pub fn push_state(&mut self, url: &str) {
        self.location = url.into();
        self.history.push(HistoryEvent::PushState(url.into()));
    }

    /// `history.replaceState`.
    pub fn replace_state(&mut self, url: &str) {
        self.location = url.into();
        self.history.push(HistoryEvent::ReplaceState(url.into()));
    }

    /// Back/forward navigation landing on `url`.
    pub fn pop_state(&mut self, url: &str) {
        self.location = url.into();
        self.history.push(HistoryEvent::PopState(url.into()));
    }

    /// Drain recorded history calls.
    pub fn take_history_events(&mut self) -> Vec<HistoryEvent> {
        core::mem::take(&mut self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_calls_are_recorded() {
        let mut doc = Document::new();
        doc.push_state("/products");
        doc.pop_state("/");
        doc.set_location("/silent");

        let events = doc.take_history_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], HistoryEvent::PushState("/products".into()));
        assert_eq!(events[1].url(), "/");
        assert_eq!(doc.location(), "/silent");
        assert!(doc.take_history_events().is_empty());
    }
}
