//! Undo/redo history for edit sessions.
//!
//! History stores full snapshots of the dashboard content taken before each
//! recorded mutation. The undo stack is bounded; the oldest entry is evicted
//! once the configured depth is exceeded.

use std::collections::VecDeque;

use divedash_protocol::{Breakpoint, DashboardSnapshot, LayoutSet};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::manager::LayoutManager;

/// Default number of undo steps kept.
pub const DEFAULT_DEPTH: usize = 50;

/// Lifecycle of the history.
///
/// A session cycles `Clean -> Editing -> Clean`. `Idle` only precedes the
/// first [`History::settle`], while there is no content to edit yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPhase {
    /// Edit mode is off and no content has been settled yet.
    #[default]
    Idle,
    /// Edit mode is off and the stacks are empty.
    Clean,
    /// An edit session is open and mutations are recorded.
    Editing,
}

/// Bounded undo/redo stacks with the session baseline.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<DashboardSnapshot>,
    redo: Vec<DashboardSnapshot>,
    baseline: Option<DashboardSnapshot>,
    depth: usize,
    phase: HistoryPhase,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl History {
    /// Creates a history keeping at most `depth` undo steps (at least one).
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            baseline: None,
            depth: depth.max(1),
            phase: HistoryPhase::Idle,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> HistoryPhase {
        self.phase
    }

    /// Returns `true` while an edit session is open.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.phase == HistoryPhase::Editing
    }

    /// Returns `true` if there is something to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Returns `true` if there is something to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Returns the number of undo steps available.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Returns the number of redo steps available.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Returns the snapshot the session started from.
    #[must_use]
    pub fn baseline(&self) -> Option<&DashboardSnapshot> {
        self.baseline.as_ref()
    }

    /// Takes `current` as the baseline outside of any session.
    ///
    /// Any open session is dropped.
    pub fn settle(&mut self, current: &DashboardSnapshot) {
        self.baseline = Some(current.clone());
        self.clear();
        self.phase = HistoryPhase::Clean;
    }

    /// Opens an edit session starting from `current`.
    pub fn begin(&mut self, current: &DashboardSnapshot) {
        self.baseline = Some(current.clone());
        self.clear();
        self.phase = HistoryPhase::Editing;
    }

    /// Records the state from before a mutation.
    ///
    /// Ignored outside an edit session. Clears the redo stack.
    pub fn record(&mut self, before: DashboardSnapshot) {
        if !self.is_editing() {
            return;
        }
        self.push_undo(before);
        self.redo.clear();
    }

    /// Steps back, returning the state to restore.
    pub fn undo(&mut self, current: &DashboardSnapshot) -> Option<DashboardSnapshot> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current.clone());
        Some(previous)
    }

    /// Steps forward, returning the state to restore.
    pub fn redo(&mut self, current: &DashboardSnapshot) -> Option<DashboardSnapshot> {
        let next = self.redo.pop()?;
        self.push_undo(current.clone());
        Some(next)
    }

    /// Closes the session keeping `current` as the new baseline.
    pub fn commit(&mut self, current: &DashboardSnapshot) {
        self.baseline = Some(current.clone());
        self.clear();
        self.phase = HistoryPhase::Clean;
    }

    /// Closes the session, returning the baseline to restore.
    pub fn rollback(&mut self) -> Option<DashboardSnapshot> {
        self.clear();
        self.phase = HistoryPhase::Clean;
        self.baseline.clone()
    }

    fn push_undo(&mut self, snapshot: DashboardSnapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.depth {
            self.undo.pop_front();
        }
    }

    fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

/// A layout manager paired with its undo history.
///
/// Every mutation goes through [`EditSession`] so that changes made while
/// editing are recorded. Rejected mutations and mutations that change
/// nothing are not recorded.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use divedash_layout::{EditSession, LayoutManager, WidgetRegistry};
///
/// let manager = LayoutManager::new(Arc::new(WidgetRegistry::builtin()));
/// let mut session = EditSession::new(manager, 50);
///
/// session.begin_edit();
/// session.add_widget("weather").unwrap();
/// assert!(session.undo());
/// assert!(session.manager().layouts().is_empty());
/// assert!(session.redo());
/// assert!(session.manager().layouts().contains_widget("weather"));
/// ```
#[derive(Debug, Clone)]
pub struct EditSession {
    manager: LayoutManager,
    history: History,
}

impl EditSession {
    /// Wraps a manager with a history of the given depth.
    #[must_use]
    pub fn new(manager: LayoutManager, depth: usize) -> Self {
        Self {
            manager,
            history: History::new(depth),
        }
    }

    /// Returns the layout manager.
    #[must_use]
    pub fn manager(&self) -> &LayoutManager {
        &self.manager
    }

    /// Returns the history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns `true` while editing.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.history.is_editing()
    }

    /// Replaces the content outside of history, e.g. when seeding.
    pub fn load(&mut self, snapshot: DashboardSnapshot) {
        self.manager.replace(snapshot);
        self.manager.set_edit_mode(false);
        self.history.settle(self.manager.snapshot());
    }

    /// Opens an edit session from the current content.
    pub fn begin_edit(&mut self) {
        self.manager.set_edit_mode(true);
        self.history.begin(self.manager.snapshot());
    }

    /// Adds a widget. See [`LayoutManager::add_widget`].
    ///
    /// # Errors
    ///
    /// Propagates the manager's rejection.
    pub fn add_widget(&mut self, id: &str) -> Result<()> {
        self.apply(|manager| manager.add_widget(id))
    }

    /// Removes a widget. See [`LayoutManager::remove_widget`].
    ///
    /// # Errors
    ///
    /// Propagates the manager's rejection.
    pub fn remove_widget(&mut self, id: &str) -> Result<bool> {
        self.apply(|manager| manager.remove_widget(id))
    }

    /// Stores a widget's configuration. See [`LayoutManager::set_widget_config`].
    ///
    /// # Errors
    ///
    /// Propagates the manager's rejection.
    pub fn set_widget_config(&mut self, id: &str, blob: Value) -> Result<()> {
        self.apply(|manager| manager.set_widget_config(id, blob))
    }

    /// Replaces the whole layout set.
    pub fn set_breakpoint_layouts(&mut self, layouts: LayoutSet) {
        let before = self.manager.snapshot().clone();
        self.manager.set_breakpoint_layouts(layouts);
        self.record_if_changed(before);
    }

    /// Moves an item on one breakpoint. See [`LayoutManager::moved`].
    ///
    /// # Errors
    ///
    /// Propagates the manager's rejection.
    pub fn move_item(
        &mut self,
        breakpoint: Breakpoint,
        id: &str,
        delta: (i16, i16),
        role_default: &LayoutSet,
    ) -> Result<()> {
        self.apply(|manager| {
            let layouts = manager.moved(breakpoint, id, delta, role_default)?;
            manager.set_breakpoint_layouts(layouts);
            Ok(())
        })
    }

    /// Resizes an item on one breakpoint. See [`LayoutManager::resized`].
    ///
    /// # Errors
    ///
    /// Propagates the manager's rejection.
    pub fn resize_item(
        &mut self,
        breakpoint: Breakpoint,
        id: &str,
        delta: (i16, i16),
        role_default: &LayoutSet,
    ) -> Result<()> {
        self.apply(|manager| {
            let layouts = manager.resized(breakpoint, id, delta, role_default)?;
            manager.set_breakpoint_layouts(layouts);
            Ok(())
        })
    }

    /// Replaces the layouts with a role default, as an undoable edit.
    pub fn reset_to(&mut self, defaults: LayoutSet) {
        self.set_breakpoint_layouts(defaults);
    }

    /// Undoes the last edit. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.manager.snapshot()) {
            Some(previous) => {
                self.manager.replace(previous);
                true
            }
            None => false,
        }
    }

    /// Redoes the last undone edit. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.manager.snapshot()) {
            Some(next) => {
                self.manager.replace(next);
                true
            }
            None => false,
        }
    }

    /// Ends the session keeping the current content.
    pub fn commit(&mut self) {
        self.history.commit(self.manager.snapshot());
        self.manager.set_edit_mode(false);
    }

    /// Ends the session restoring the content it started from.
    pub fn rollback(&mut self) {
        if let Some(baseline) = self.history.rollback() {
            self.manager.replace(baseline);
        }
        self.manager.set_edit_mode(false);
    }

    fn apply<T>(&mut self, mutate: impl FnOnce(&mut LayoutManager) -> Result<T>) -> Result<T> {
        let before = self.manager.snapshot().clone();
        let out = mutate(&mut self.manager)?;
        self.record_if_changed(before);
        Ok(out)
    }

    fn record_if_changed(&mut self, before: DashboardSnapshot) {
        if self.manager.snapshot() != &before {
            self.history.record(before);
            debug!(undo = self.history.undo_len(), "Recorded edit");
        }
    }
}
