//! Navigation signal
//!
//! Single-page sites change pages without a reload. Three sources report
//! it: polling the location, the document's `pushState`/`replaceState`
//! records and `popstate`. They feed one stream that reports each URL
//! change once, whichever source saw it first.

use alloc::string::String;
use alloc::vec::Vec;

use retint_dom::{Document, HistoryEvent};

/// Where a navigation was noticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSource {
    Poll,
    PushState,
    ReplaceState,
    PopState,
}

/// A detected URL change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
    pub source: NavigationSource,
}

/// De-duplicating navigation detector.
#[derive(Debug, Clone, Default)]
pub struct NavigationSignal {
    last_url: Option<String>,
}

impl NavigationSignal {
    /// Start from the document's current URL.
    pub fn new(doc: &Document) -> Self {
        NavigationSignal {
            last_url: Some(doc.location().into()),
        }
    }

    /// Last URL reported or seen.
    pub fn current(&self) -> Option<&str> {
        self.last_url.as_deref()
    }

    /// Feed one observation. Returns a navigation when the URL differs
    /// from the last one seen.
    pub fn observe(&mut self, url: &str, source: NavigationSource) -> Option<Navigation> {
        if self.last_url.as_deref() == Some(url) {
            return None;
        }
        self.last_url = Some(url.into());
        Some(Navigation {
            url: url.into(),
            source,
        })
    }

    /// Drain the document's history records.
    pub fn history(&mut self, doc: &mut Document) -> Vec<Navigation> {
        doc.take_history_events()
            .into_iter()
            .filter_map(|event| {
                let source = match &event {
                    HistoryEvent::PushState(_) => NavigationSource::PushState,
                    HistoryEvent::ReplaceState(_) => NavigationSource::ReplaceState,
                    HistoryEvent::PopState(_) => NavigationSource::PopState,
                };
                self.observe(event.url(), source)
            })
            .collect()
    }

    /// Compare the current location with the last URL seen.
    pub fn poll(&mut self, doc: &Document) -> Option<Navigation> {
        self.observe(doc.location(), NavigationSource::Poll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_change_reported_once() {
        let mut doc = Document::new();
        doc.set_location("/");
        let mut signal = NavigationSignal::new(&doc);
        assert!(signal.poll(&doc).is_none());

        doc.push_state("/shop");
        let navs = signal.history(&mut doc);
        assert_eq!(navs.len(), 1);
        assert_eq!(navs[0].source, NavigationSource::PushState);
        // the poll sees the same URL and stays quiet
        assert!(signal.poll(&doc).is_none());

        doc.set_location("/cart");
        assert_eq!(
            signal.poll(&doc),
            Some(Navigation {
                url: "/cart".into(),
                source: NavigationSource::Poll,
            })
        );
    }

    #[test]
    fn test_history_sources() {
        let mut doc = Document::new();
        let mut signal = NavigationSignal::new(&doc);
        doc.replace_state("/a");
        doc.replace_state("/a");
        doc.pop_state("/");
        let sources: Vec<NavigationSource> =
            signal.history(&mut doc).into_iter().map(|n| n.source).collect();
        assert_eq!(
            sources,
            [NavigationSource::ReplaceState, NavigationSource::PopState]
        );
        assert_eq!(signal.current(), Some("/"));
    }
}
