//! retint engine - Live page recoloring
//!
//! Recolors a page and every open shadow tree in it onto a dark palette or
//! a named preset, keeps newly inserted content consistent through a
//! debounced mutation observer, re-runs after single-page navigations and
//! restores the page's own colors on request.
//!
//! The engine owns no threads or timers. The embedding host drives it with
//! a millisecond clock through [`Engine::tick`]. It's designed to work in
//! no_std environments.

#![no_std]

extern crate alloc;

pub mod apply;
pub mod config;
pub mod contract;
pub mod engine;
pub mod error;
pub mod navigation;
pub mod observer;
pub mod scheduler;
pub mod snapshot;
pub mod storage;
pub mod theme;
pub mod traverse;
pub mod ui;

pub use apply::{apply_snapshot, restore_element, FORCED_PROPERTIES};
pub use config::{EngineConfig, Preset};
pub use engine::{Engine, EngineStats};
pub use error::EngineError;
pub use navigation::{Navigation, NavigationSignal, NavigationSource};
pub use observer::MutationBatcher;
pub use scheduler::{Scheduler, Task};
pub use snapshot::{ColorSnapshot, SnapshotStore};
pub use storage::{MemoryStore, ThemeStore, STORAGE_KEY};
pub use theme::ThemeChoice;
pub use ui::ELEMENT_NAME;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{Engine, EngineConfig, EngineError, ThemeChoice, ThemeStore};
    pub use retint_dom::{Document, NodeId};
}
