//! Recoloring engine
//!
//! One [`Engine`] instance owns everything a themed page needs: the
//! configuration read from its host element, the snapshot epoch, the body
//! observer, the navigation signal and the timer queue. The host drives it
//! with [`Engine::start`], [`Engine::set_theme`] / [`Engine::toggle`],
//! [`Engine::tick`] and finally [`Engine::stop`].
//!
//! A switch to a non-default theme strips the previous overrides, starts a
//! new epoch and captures the whole reachable tree, then applies one frame
//! later and repeats the apply step as catch-up passes. Mutations seen
//! while that is in progress, or while the default theme is active, are
//! discarded.

use alloc::string::String;
use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use retint_color::ConversionTable;
use retint_dom::document::DOCUMENT_NODE;
use retint_dom::{Document, DomError, NodeId};

use crate::apply::{apply_snapshot, restore_element};
use crate::config::{
    is_config_attribute, EngineConfig, CATCH_UP_DELAYS_MS, CATCH_UP_SELECTORS,
    COLOR_ATTR_PREFIX, FRAME_MS, MUTATION_DEBOUNCE_MS, NAVIGATION_POLL_MS,
    NAVIGATION_SETTLE_MS, PRESET_ATTR_PREFIX,
};
use crate::error::EngineError;
use crate::navigation::{Navigation, NavigationSignal};
use crate::observer::MutationBatcher;
use crate::scheduler::{Scheduler, Task};
use crate::snapshot::SnapshotStore;
use crate::storage::{MemoryStore, ThemeStore, STORAGE_KEY};
use crate::theme::ThemeChoice;
use crate::traverse::{document_elements, reachable_elements};
use crate::ui::{render_toggle, sync_toggle, ToggleUi, ELEMENT_NAME};

/// Counters for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// First apply of a transition over the whole tree.
    pub full_passes: usize,
    pub catch_up_passes: usize,
    /// Debounced flushes of pending mutations.
    pub incremental_flushes: usize,
    /// Mutation batches dropped mid-transition or under the default theme.
    pub discarded_batches: usize,
    pub navigations: usize,
}

/// A page recoloring engine bound to one host element.
pub struct Engine<S: ThemeStore = MemoryStore> {
    host: NodeId,
    store: S,
    config: EngineConfig,
    theme: ThemeChoice,
    snapshots: SnapshotStore,
    scheduler: Scheduler,
    batcher: Option<MutationBatcher>,
    navigation: NavigationSignal,
    navigation_pending: bool,
    in_progress: bool,
    ui: Option<ToggleUi>,
    rng: SmallRng,
    now: u64,
    stats: EngineStats,
}

impl Engine<MemoryStore> {
    /// Engine with an in-memory theme store.
    pub fn new(host: NodeId) -> Self {
        Self::with_store(host, MemoryStore::new())
    }
}

impl<S: ThemeStore> Engine<S> {
    /// Engine persisting the chosen theme in `store`.
    pub fn with_store(host: NodeId, store: S) -> Self {
        Engine {
            host,
            store,
            config: EngineConfig::default(),
            theme: ThemeChoice::Default,
            snapshots: SnapshotStore::new(),
            scheduler: Scheduler::new(),
            batcher: None,
            navigation: NavigationSignal::default(),
            navigation_pending: false,
            in_progress: false,
            ui: None,
            rng: SmallRng::seed_from_u64(host as u64),
            now: 0,
            stats: EngineStats::default(),
        }
    }

    /// Seed the generator used for random preset picks.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Define the engine's custom element. Returns `false` when the name
    /// was already taken.
    pub fn register(doc: &mut Document) -> bool {
        if doc.custom_elements().is_defined(ELEMENT_NAME) {
            log::debug!("[retint] <{}> already defined, skipping", ELEMENT_NAME);
            return false;
        }
        match doc.custom_elements_mut().define(ELEMENT_NAME) {
            Ok(()) => {
                log::debug!("[retint] Defined <{}>", ELEMENT_NAME);
                true
            }
            Err(e) => {
                log::warn!("[retint] {}", e);
                false
            }
        }
    }

    /// Connect to the document: read the configuration, render the toggle,
    /// observe the body, start polling the location and restore the stored
    /// theme.
    pub fn start(&mut self, doc: &mut Document, now: u64) -> Result<(), EngineError> {
        if self.is_started() {
            log::debug!("[retint] Already started");
            return Ok(());
        }
        match doc.get(self.host) {
            Some(node) if node.is_element() => {}
            Some(_) => return Err(DomError::NotAnElement(self.host).into()),
            None => return Err(DomError::UnknownNode(self.host).into()),
        }

        self.now = now;
        Self::register(doc);
        self.config = EngineConfig::from_element(doc, self.host);
        self.ui = Some(render_toggle(doc, self.host)?);

        let target = doc
            .body()
            .or_else(|| doc.document_element_id())
            .unwrap_or(DOCUMENT_NODE);
        self.batcher = Some(MutationBatcher::connect(doc, target));

        // History calls made before start are not navigations
        doc.take_history_events();
        self.navigation = NavigationSignal::new(doc);
        self.scheduler
            .schedule(now + NAVIGATION_POLL_MS, Task::PollLocation);

        log::info!(
            "[retint] Started with {} preset(s) at {}",
            self.config.presets.len(),
            doc.location()
        );

        let stored = self
            .store
            .get(STORAGE_KEY)
            .and_then(|value| ThemeChoice::from_storage(&value));
        match stored {
            Some(theme) if !theme.is_default() => match self.validate(&theme) {
                Ok(()) => {
                    log::info!("[retint] Restoring {}", theme);
                    self.transition(doc, theme, now);
                }
                Err(e) => log::warn!("[retint] Stored theme ignored: {}", e),
            },
            _ => {}
        }

        self.sync_ui(doc);
        self.discard_own_records(doc);
        Ok(())
    }

    /// Disconnect the observer and drop every pending timer. Overrides
    /// already written stay in place.
    pub fn stop(&mut self, doc: &mut Document) {
        if let Some(batcher) = self.batcher.take() {
            batcher.disconnect(doc);
        }
        self.scheduler.clear();
        self.navigation_pending = false;
        self.in_progress = false;
        log::info!("[retint] Stopped");
    }

    /// Re-read the configuration after a host attribute changed.
    pub fn attribute_changed(&mut self, doc: &mut Document, name: &str) -> Result<(), EngineError> {
        if !is_config_attribute(name) {
            return Ok(());
        }
        self.config = EngineConfig::from_element(doc, self.host);
        if !self.is_started() {
            return Ok(());
        }

        let palette_changed = name.starts_with(COLOR_ATTR_PREFIX) || name.starts_with(PRESET_ATTR_PREFIX);
        match self.theme.clone() {
            ThemeChoice::Default => Ok(()),
            ThemeChoice::Preset(preset) if self.config.preset(&preset).is_none() => {
                log::warn!("[retint] Preset `{}` is gone, back to default", preset);
                self.set_theme(doc, ThemeChoice::Default)
            }
            theme if palette_changed => self.set_theme(doc, theme),
            _ => Ok(()),
        }
    }

    /// Switch themes and remember the choice.
    pub fn set_theme(&mut self, doc: &mut Document, choice: ThemeChoice) -> Result<(), EngineError> {
        self.ensure_started()?;
        self.validate(&choice)?;
        self.store.set(STORAGE_KEY, &choice.to_storage());

        if choice.is_default() {
            if !self.theme.is_default() {
                self.restore(doc);
            }
            self.theme = ThemeChoice::Default;
        } else {
            let now = self.now;
            self.transition(doc, choice, now);
        }

        log::info!("[retint] Theme set to {}", self.theme);
        self.sync_ui(doc);
        self.discard_own_records(doc);
        Ok(())
    }

    /// Flip between the default and the dark theme. A preset flips back to
    /// default. Returns the new theme.
    pub fn toggle(&mut self, doc: &mut Document) -> Result<ThemeChoice, EngineError> {
        let next = if self.theme.is_default() {
            ThemeChoice::Dark
        } else {
            ThemeChoice::Default
        };
        self.set_theme(doc, next.clone())?;
        Ok(next)
    }

    /// Switch to a random preset from the night or day pool for `hour`.
    /// Returns the preset picked, if any is configured.
    pub fn pick_timed_preset(&mut self, doc: &mut Document, hour: u8) -> Result<Option<String>, EngineError> {
        self.ensure_started()?;
        let Some(name) = self
            .config
            .pick_preset(hour, &mut self.rng)
            .map(|p| p.name.clone())
        else {
            log::debug!("[retint] No preset to pick for hour {}", hour);
            return Ok(None);
        };
        self.set_theme(doc, ThemeChoice::Preset(name.clone()))?;
        Ok(Some(name))
    }

    /// Switch to a random preset other than the active one.
    pub fn shuffle(&mut self, doc: &mut Document) -> Result<Option<String>, EngineError> {
        self.ensure_started()?;
        let current = match &self.theme {
            ThemeChoice::Preset(name) => Some(name.as_str()),
            _ => None,
        };
        let candidates: Vec<&str> = self
            .config
            .presets
            .iter()
            .map(|p| p.name.as_str())
            .filter(|name| Some(*name) != current)
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        let name = String::from(candidates[self.rng.gen_range(0..candidates.len())]);
        self.set_theme(doc, ThemeChoice::Preset(name.clone()))?;
        Ok(Some(name))
    }

    /// Advance the clock: handle navigation and mutations seen since the
    /// last tick, then run every task due by `now`.
    pub fn tick(&mut self, doc: &mut Document, now: u64) -> Result<(), EngineError> {
        self.ensure_started()?;
        self.now = self.now.max(now);

        for navigation in self.navigation.history(doc) {
            self.on_navigation(navigation, self.now);
        }
        self.handle_mutations(doc);

        while let Some((due, task)) = self.scheduler.pop_due(self.now) {
            self.run(doc, due, task);
        }

        self.discard_own_records(doc);
        Ok(())
    }

    pub fn theme(&self) -> &ThemeChoice {
        &self.theme
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    /// Rendered toggle control, once started.
    pub fn toggle_ui(&self) -> Option<ToggleUi> {
        self.ui
    }

    pub fn is_started(&self) -> bool {
        self.batcher.is_some()
    }

    /// Check if a transition has not finished its catch-up passes yet.
    pub fn is_transitioning(&self) -> bool {
        self.in_progress
    }

    /// Number of pending timers.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// When the next timer is due.
    pub fn next_timer(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    fn ensure_started(&self) -> Result<(), EngineError> {
        if self.is_started() {
            Ok(())
        } else {
            Err(EngineError::NotStarted)
        }
    }

    fn validate(&self, choice: &ThemeChoice) -> Result<(), EngineError> {
        match choice {
            ThemeChoice::Preset(name) if self.config.preset(name).is_none() => {
                Err(EngineError::UnknownPreset(name.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Conversion for the active theme.
    fn table(&self) -> Option<ConversionTable> {
        match &self.theme {
            ThemeChoice::Default => None,
            ThemeChoice::Dark => Some(ConversionTable::to_dark()),
            ThemeChoice::Preset(name) => self
                .config
                .preset(name)
                .map(|p| ConversionTable::between(&self.config.default_palette, &p.palette)),
        }
    }

    /// Start a non-default theme as a fresh epoch. The first apply runs one
    /// frame after `at`.
    fn transition(&mut self, doc: &mut Document, theme: ThemeChoice, at: u64) {
        self.in_progress = true;
        self.theme = theme;
        self.cancel_theme_work();

        let stripped = self.strip_overrides(doc);
        self.snapshots.reset();

        let reachable = document_elements(doc, self.host);
        let mut captured = 0;
        for node in reachable.elements() {
            if self.snapshots.capture(doc, node, self.host) {
                captured += 1;
            }
        }

        self.scheduler.schedule(at + FRAME_MS, Task::ApplyTheme);
        log::debug!(
            "[retint] Epoch {}: stripped {} override(s), captured {} of {} element(s), {} shadow root(s)",
            self.snapshots.epoch(),
            stripped,
            captured,
            reachable.len(),
            reachable.shadow_roots.len()
        );
    }

    /// Back to the page's own colors.
    fn restore(&mut self, doc: &mut Document) {
        self.cancel_theme_work();
        self.scheduler.cancel(|t| *t == Task::NavigationSettle);
        self.navigation_pending = false;

        let restored = self.strip_overrides(doc);
        self.snapshots.reset();
        self.in_progress = false;
        log::debug!("[retint] Removed {} override(s)", restored);
    }

    fn cancel_theme_work(&mut self) {
        self.scheduler.cancel(|t| {
            matches!(
                t,
                Task::ApplyTheme | Task::CatchUp { .. } | Task::FlushMutations
            )
        });
        if let Some(batcher) = self.batcher.as_mut() {
            batcher.clear_pending();
        }
    }

    /// Remove forced properties from every snapshotted element.
    fn strip_overrides(&mut self, doc: &mut Document) -> usize {
        let mut removed = 0;
        for node in self.snapshots.nodes() {
            match restore_element(doc, node) {
                Ok(n) => removed += n,
                Err(e) => log::debug!("[retint] Restore skipped node {}: {}", node, e),
            }
        }
        removed
    }

    /// Run a task that was due at `due`. Follow-up timers count from `due`,
    /// not from when the host got around to ticking.
    fn run(&mut self, doc: &mut Document, due: u64, task: Task) {
        match task {
            Task::ApplyTheme => self.run_apply(doc, due),
            Task::CatchUp { final_pass } => self.run_catch_up(doc, final_pass),
            Task::FlushMutations => self.run_flush(doc),
            Task::NavigationSettle => self.run_navigation_settle(doc, due),
            Task::PollLocation => {
                if let Some(navigation) = self.navigation.poll(doc) {
                    self.on_navigation(navigation, due);
                }
                // Missed polls collapse into one
                let mut next = due + NAVIGATION_POLL_MS;
                if next <= self.now {
                    next = self.now + NAVIGATION_POLL_MS;
                }
                self.scheduler.schedule(next, Task::PollLocation);
            }
        }
    }

    fn run_apply(&mut self, doc: &mut Document, due: u64) {
        let Some(table) = self.table() else {
            self.in_progress = false;
            return;
        };

        let written = self.apply_pass(doc, &table);
        self.stats.full_passes += 1;

        let last = CATCH_UP_DELAYS_MS.len() - 1;
        for (i, delay) in CATCH_UP_DELAYS_MS.iter().enumerate() {
            self.scheduler.schedule(
                due + delay,
                Task::CatchUp {
                    final_pass: i == last,
                },
            );
        }
        log::debug!("[retint] Applied {}: {} propert(ies) written", self.theme, written);
    }

    fn run_catch_up(&mut self, doc: &mut Document, final_pass: bool) {
        if let Some(table) = self.table() {
            let written = self.apply_pass(doc, &table);
            self.stats.catch_up_passes += 1;
            log::debug!("[retint] Catch-up pass: {} propert(ies) written", written);
        }
        if final_pass {
            self.in_progress = false;
            log::debug!("[retint] Transition to {} complete", self.theme);
        }
    }

    /// Tree, then shadow roots, then the catch-up selectors.
    fn apply_pass(&mut self, doc: &mut Document, table: &ConversionTable) -> usize {
        let reachable = document_elements(doc, self.host);
        let mut written = self.apply_each(doc, reachable.light.iter().copied(), table);
        written += self.apply_each(doc, reachable.shadow.iter().copied(), table);

        if let Some(root) = doc.document_element_id() {
            for selector in CATCH_UP_SELECTORS {
                let matches = doc.query_selector_all(root, selector);
                written += self.apply_each(doc, matches, table);
            }
        }
        written
    }

    /// Capture when missing, apply and mark processed. Per-element
    /// failures are logged and skipped.
    fn apply_each(
        &mut self,
        doc: &mut Document,
        nodes: impl IntoIterator<Item = NodeId>,
        table: &ConversionTable,
    ) -> usize {
        let mut written = 0;
        for node in nodes {
            self.snapshots.capture(doc, node, self.host);
            let Some(snapshot) = self.snapshots.get(node) else {
                continue;
            };
            match apply_snapshot(doc, node, snapshot, table) {
                Ok(n) => written += n,
                Err(e) => log::debug!("[retint] Apply skipped node {}: {}", node, e),
            }
            self.snapshots.mark_processed(node);
        }
        written
    }

    fn handle_mutations(&mut self, doc: &mut Document) {
        let Some(batcher) = self.batcher.as_mut() else {
            return;
        };
        let records = batcher.take_records(doc);
        if records.is_empty() {
            return;
        }
        if self.in_progress || self.theme.is_default() {
            self.stats.discarded_batches += 1;
            return;
        }

        let added = batcher.collect(doc, &records, self.host, &self.snapshots);
        if added > 0 {
            self.scheduler
                .reschedule(self.now + MUTATION_DEBOUNCE_MS, Task::FlushMutations);
        }
    }

    fn run_flush(&mut self, doc: &mut Document) {
        let pending = match self.batcher.as_mut() {
            Some(batcher) => batcher.take_pending(),
            None => return,
        };
        let Some(table) = self.table() else {
            return;
        };

        let pruned = self.prune_detached(doc);
        let mut written = 0;
        for &node in &pending {
            if !doc.is_connected(node) {
                continue;
            }
            let reachable = reachable_elements(doc, node, self.host);
            written += self.apply_each(doc, reachable.elements(), &table);
        }
        self.stats.incremental_flushes += 1;
        log::debug!(
            "[retint] Flushed {} mutated element(s): {} propert(ies) written, {} stale snapshot(s) pruned",
            pending.len(),
            written,
            pruned
        );
    }

    fn on_navigation(&mut self, navigation: Navigation, at: u64) {
        self.stats.navigations += 1;
        log::info!(
            "[retint] Navigation to {} ({:?})",
            navigation.url,
            navigation.source
        );
        if self.navigation_pending {
            return;
        }
        self.navigation_pending = true;
        self.scheduler
            .schedule(at + NAVIGATION_SETTLE_MS, Task::NavigationSettle);
    }

    fn run_navigation_settle(&mut self, doc: &mut Document, due: u64) {
        self.navigation_pending = false;
        if self.theme.is_default() {
            return;
        }
        self.prune_detached(doc);
        let theme = self.theme.clone();
        self.transition(doc, theme, due);
    }

    /// Drop snapshots of nodes that left the document, taking their
    /// overrides with them so a node put back later is recolored from its
    /// own colors.
    fn prune_detached(&mut self, doc: &mut Document) -> usize {
        let detached = self.snapshots.prune_detached(doc);
        for &node in &detached {
            if let Err(e) = restore_element(doc, node) {
                log::debug!("[retint] Restore skipped node {}: {}", node, e);
            }
        }
        detached.len()
    }

    fn sync_ui(&mut self, doc: &mut Document) {
        if let Some(ui) = self.ui {
            if let Err(e) = sync_toggle(doc, self.host, ui, &self.theme) {
                log::warn!("[retint] Toggle update failed: {}", e);
            }
        }
    }

    /// Drop the records produced by the engine's own writes.
    fn discard_own_records(&mut self, doc: &mut Document) {
        if let Some(batcher) = &self.batcher {
            batcher.take_records(doc);
        }
    }
}
