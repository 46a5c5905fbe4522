//! The dashboard shell.
//!
//! [`Dashboard`] owns the edit session, the lazy gates and the transient
//! state around them (phase, selection, overlays, notices). It decides what
//! is allowed when; the app only maps keys to calls and draws the result.
//!
//! Phases move as follows:
//!
//! ```text
//! Loading --seed--> Viewing --toggle_edit--> Editing --begin_save--> Saving
//!                      ^                      |   ^                    |
//!                      +------ cancel --------+   +--- save failed ----+
//!                      ^                                               |
//!                      +----------------- save succeeded --------------+
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use divedash_config::{Config, StoreResult};
use divedash_layout::{
    EditSession, LayoutError, LayoutManager, LazyGate, WidgetConfigSpec, WidgetDefinition,
    WidgetRegistry, compact_vertical, defaults_for, intersection_ratio, normalize,
};
use divedash_protocol::{
    Breakpoint, DashboardSnapshot, LayoutItem, LayoutSet, LazyPolicies, Role, StoredDashboard,
    WidgetId,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config_sheet::ConfigSheet;
use crate::error::{Result, ShellError};
use crate::notice::{Notice, NoticeLevel};

/// Where the dashboard is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for the stored dashboard.
    #[default]
    Loading,
    /// Showing the dashboard.
    Viewing,
    /// Changing layout or configuration.
    Editing,
    /// Persisting the edited dashboard.
    Saving,
}

impl Phase {
    /// Returns a short label for the status bar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::Viewing => "VIEW",
            Self::Editing => "EDIT",
            Self::Saving => "SAVING",
        }
    }
}

/// A modal panel drawn over the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// The list of widgets that can be added.
    Catalog {
        /// Highlighted catalog entry.
        selected: usize,
    },
    /// Confirmation before removing a widget.
    ConfirmRemove {
        /// The widget to remove.
        id: WidgetId,
    },
    /// A widget's configuration sheet.
    Sheet(ConfigSheet),
}

/// A direction for keyboard selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards lower rows.
    Up,
    /// Towards higher rows.
    Down,
    /// Previous tile in reading order.
    Left,
    /// Next tile in reading order.
    Right,
}

/// The rows of the grid currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// First visible grid row.
    pub top: u16,
    /// Number of visible grid rows.
    pub height: u16,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(top: u16, height: u16) -> Self {
        Self { top, height }
    }
}

/// One cell of the rendered grid.
#[derive(Debug, Clone, PartialEq)]
pub enum Tile<'a> {
    /// The layout references a widget the registry does not know.
    Missing {
        /// The placement, compacted.
        item: LayoutItem,
    },
    /// A registered widget.
    Widget {
        /// The placement, compacted.
        item: LayoutItem,
        /// The widget's definition.
        def: &'a WidgetDefinition,
        /// Stored configuration, only for widgets with an editor.
        config: Option<&'a Value>,
        /// Whether the content is mounted or a placeholder is shown.
        content: bool,
    },
}

impl Tile<'_> {
    /// Returns the placement of the tile.
    #[must_use]
    pub fn item(&self) -> &LayoutItem {
        match self {
            Self::Missing { item } | Self::Widget { item, .. } => item,
        }
    }

    /// Returns the widget id of the tile.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.item().id
    }
}

/// The dashboard composition shell.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use divedash_config::Config;
/// use divedash_layout::WidgetRegistry;
/// use divedash_protocol::Breakpoint;
/// use divedash_tui::dashboard::{Dashboard, Phase};
///
/// let mut dashboard = Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &Config::default());
/// dashboard.seed(Ok(None));
/// assert_eq!(dashboard.phase(), Phase::Viewing);
///
/// dashboard.toggle_edit().unwrap();
/// dashboard.add_widget("immersions-chart").unwrap();
/// let snapshot = dashboard.begin_save().unwrap();
/// assert!(snapshot.layouts.contains_widget("immersions-chart"));
///
/// dashboard.finish_save(Ok(()));
/// assert_eq!(dashboard.phase(), Phase::Viewing);
/// ```
#[derive(Debug, Clone)]
pub struct Dashboard {
    registry: Arc<WidgetRegistry>,
    role: Role,
    role_default: LayoutSet,
    session: EditSession,
    policies: LazyPolicies,
    phase: Phase,
    overlay: Option<Overlay>,
    selected: Option<WidgetId>,
    gates: HashMap<WidgetId, LazyGate>,
    notices: Vec<Notice>,
}

impl Dashboard {
    /// Creates a shell waiting for the stored dashboard.
    ///
    /// The role, history depth and lazy policies come from `config`.
    #[must_use]
    pub fn loading(registry: Arc<WidgetRegistry>, config: &Config) -> Self {
        let role = config.role();
        let manager = LayoutManager::new(Arc::clone(&registry));
        Self {
            registry,
            role,
            role_default: defaults_for(role),
            session: EditSession::new(manager, config.history.depth),
            policies: config.lazy,
            phase: Phase::Loading,
            overlay: None,
            selected: None,
            gates: HashMap::new(),
            notices: Vec::new(),
        }
    }

    /// Seeds the dashboard from the result of loading the stored record.
    ///
    /// A missing record gives the role default layout. A failed load gives
    /// the role default too, with a warning notice. Stored configuration is
    /// kept only for placed widgets with an editor, sanitized.
    #[instrument(skip_all, fields(role = self.role.identifier()))]
    pub fn seed(&mut self, loaded: StoreResult<Option<StoredDashboard>>) {
        if self.phase != Phase::Loading {
            debug!(phase = ?self.phase, "Ignoring seed after loading");
            return;
        }

        let record = match loaded {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "Could not load dashboard, using role defaults");
                self.notify(
                    NoticeLevel::Warning,
                    "Saved dashboard unavailable; showing the default layout",
                );
                None
            }
        };
        if record.as_ref().is_some_and(|r| !r.has_consistent_shape()) {
            warn!("Versioned dashboard record uses the legacy layout shape");
        }

        let stored = record.as_ref().and_then(|r| r.layout.as_ref());
        let layouts = normalize(stored, &self.role_default, &self.registry);
        let mut manager = LayoutManager::new(Arc::clone(&self.registry));
        manager.set_breakpoint_layouts(layouts);
        for (id, blob) in record.iter().flat_map(|r| r.widgets.iter()) {
            if let Err(err) = manager.set_widget_config(id, blob.clone()) {
                debug!(widget = id, error = %err, "Dropping stored configuration");
            }
        }

        self.session.load(manager.snapshot().clone());
        self.phase = Phase::Viewing;
        self.settle_selection();
        info!(
            widgets = self.session.manager().dominant_layout().map_or(0, <[_]>::len),
            "Dashboard ready"
        );
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the viewer's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the widget registry.
    #[must_use]
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Returns the edit session.
    #[must_use]
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Returns the current layouts and configuration.
    #[must_use]
    pub fn snapshot(&self) -> &DashboardSnapshot {
        self.session.manager().snapshot()
    }

    /// Returns `true` if the dashboard differs from the start of the edit
    /// session.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.session
            .history()
            .baseline()
            .is_some_and(|baseline| baseline != self.snapshot())
    }

    /// Returns the open overlay.
    #[must_use]
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Returns the open configuration sheet.
    pub fn sheet_mut(&mut self) -> Option<&mut ConfigSheet> {
        match &mut self.overlay {
            Some(Overlay::Sheet(sheet)) => Some(sheet),
            _ => None,
        }
    }

    /// Returns the selected widget.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    // --- Rendering ---

    /// Returns the placements shown at a breakpoint, compacted.
    #[must_use]
    pub fn placed(&self, breakpoint: Breakpoint) -> Vec<LayoutItem> {
        if self.phase == Phase::Loading {
            return Vec::new();
        }
        let items = self
            .session
            .manager()
            .layout_for(breakpoint, &self.role_default);
        compact_vertical(items, breakpoint.columns())
    }

    /// Returns the number of grid rows the layout at a breakpoint occupies.
    #[must_use]
    pub fn grid_height(&self, breakpoint: Breakpoint) -> u16 {
        self.placed(breakpoint)
            .iter()
            .map(LayoutItem::bottom)
            .max()
            .unwrap_or(0)
    }

    /// Feeds the visible rows to the lazy gates.
    ///
    /// Gates latch: a widget that has rendered keeps rendering after it
    /// scrolls away.
    pub fn observe(&mut self, breakpoint: Breakpoint, viewport: Viewport) {
        let registry = Arc::clone(&self.registry);
        for item in self.placed(breakpoint) {
            let Some(def) = registry.lookup(&item.id) else {
                continue;
            };
            let margin = self.policies.for_priority(def.priority).margin_rows;
            let ratio = intersection_ratio(
                u32::from(item.y),
                u32::from(item.height),
                u32::from(viewport.top),
                u32::from(viewport.height),
                u32::from(margin),
            );
            let policies = self.policies;
            self.gates
                .entry(item.id)
                .or_insert_with(|| LazyGate::new(policies))
                .should_render_content(def.heavy, def.priority, ratio);
        }
    }

    /// Returns the tiles to draw at a breakpoint, in layout order.
    ///
    /// Unknown widgets become [`Tile::Missing`]; they are never dropped.
    #[must_use]
    pub fn tiles(&self, breakpoint: Breakpoint) -> Vec<Tile<'_>> {
        let manager = self.session.manager();
        self.placed(breakpoint)
            .into_iter()
            .map(|item| match self.registry.lookup(&item.id) {
                None => Tile::Missing { item },
                Some(def) => {
                    let config = if def.has_editor() {
                        manager.widget_config(&item.id)
                    } else {
                        None
                    };
                    let content = !LazyGate::is_gated(def.heavy, def.priority)
                        || self.gates.get(&item.id).is_some_and(LazyGate::has_rendered);
                    Tile::Widget {
                        item,
                        def,
                        config,
                        content,
                    }
                }
            })
            .collect()
    }

    // --- Selection ---

    /// Returns the placement of the selected widget at a breakpoint.
    #[must_use]
    pub fn selected_item(&self, breakpoint: Breakpoint) -> Option<LayoutItem> {
        let id = self.selected.as_deref()?;
        self.placed(breakpoint).into_iter().find(|item| item.id == id)
    }

    /// Moves the selection.
    ///
    /// Up and down pick the nearest tile above or below, preferring the one
    /// closest horizontally. Left and right step through reading order.
    pub fn select(&mut self, breakpoint: Breakpoint, direction: Direction) {
        let mut items = self.placed(breakpoint);
        items.sort_by_key(|item| (item.y, item.x));
        let Some(current) = self
            .selected
            .as_deref()
            .and_then(|id| items.iter().position(|item| item.id == id))
        else {
            self.selected = items.first().map(|item| item.id.clone());
            return;
        };

        let cur = &items[current];
        let center = |item: &LayoutItem| i32::from(item.x) * 2 + i32::from(item.width);
        let next = match direction {
            Direction::Left => current.checked_sub(1),
            Direction::Right => Some(current + 1).filter(|&i| i < items.len()),
            Direction::Up => items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.bottom() <= cur.y)
                .min_by_key(|(_, item)| (cur.y - item.bottom(), (center(item) - center(cur)).abs()))
                .map(|(i, _)| i),
            Direction::Down => items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.y >= cur.bottom())
                .min_by_key(|(_, item)| (item.y - cur.bottom(), (center(item) - center(cur)).abs()))
                .map(|(i, _)| i),
        };
        if let Some(next) = next {
            self.selected = Some(items[next].id.clone());
        }
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // --- Edit mode ---

    /// Enters edit mode, or cancels the edit session if already editing.
    ///
    /// # Errors
    ///
    /// Rejected while loading or saving.
    pub fn toggle_edit(&mut self) -> Result<()> {
        match self.phase {
            Phase::Loading => Err(ShellError::Loading),
            Phase::Saving => Err(ShellError::Saving),
            Phase::Editing => self.cancel(),
            Phase::Viewing => {
                self.session.begin_edit();
                self.phase = Phase::Editing;
                debug!("Entered edit mode");
                Ok(())
            }
        }
    }

    /// Leaves edit mode, discarding every change of the session.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode, including while a save is in flight.
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_editing()?;
        self.session.rollback();
        self.overlay = None;
        self.phase = Phase::Viewing;
        self.settle_selection();
        debug!("Edit session cancelled");
        Ok(())
    }

    /// Returns the widgets that can be added: visible to the role and not
    /// yet placed.
    #[must_use]
    pub fn catalog(&self) -> Vec<&WidgetDefinition> {
        let layouts = self.session.manager().layouts();
        self.registry
            .visible_for(self.role)
            .filter(|def| !layouts.contains_widget(def.id))
            .collect()
    }

    /// Opens the catalog.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode.
    pub fn open_catalog(&mut self) -> Result<()> {
        self.ensure_editing()?;
        if self.catalog().is_empty() {
            self.notify(NoticeLevel::Info, "Every available widget is already placed");
            return Ok(());
        }
        self.overlay = Some(Overlay::Catalog { selected: 0 });
        Ok(())
    }

    /// Moves the catalog highlight, clamped to the list.
    pub fn catalog_navigate(&mut self, delta: i32) {
        let len = self.catalog().len();
        if let Some(Overlay::Catalog { selected }) = &mut self.overlay {
            let next = i64::try_from(*selected).unwrap_or(0) + i64::from(delta);
            let max = i64::try_from(len.saturating_sub(1)).unwrap_or(0);
            *selected = usize::try_from(next.clamp(0, max)).unwrap_or(0);
        }
    }

    /// Adds the highlighted catalog entry.
    ///
    /// # Errors
    ///
    /// See [`add_widget`](Self::add_widget).
    pub fn add_from_catalog(&mut self) -> Result<()> {
        let Some(Overlay::Catalog { selected }) = self.overlay else {
            return Ok(());
        };
        let Some(id) = self.catalog().get(selected).map(|def| def.id) else {
            return Ok(());
        };
        self.add_widget(id)
    }

    /// Adds a widget below the existing ones and selects it.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode, or if the layout engine refuses it
    /// (unknown or already placed).
    pub fn add_widget(&mut self, id: &str) -> Result<()> {
        self.ensure_editing()?;
        self.session.add_widget(id)?;
        self.overlay = None;
        self.selected = Some(id.to_string());
        let name = self.display_name(id);
        self.notify(NoticeLevel::Info, format!("Added {name}"));
        Ok(())
    }

    /// Asks for confirmation before removing a widget.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode, for widgets that are not placed, and for
    /// pinned widgets.
    pub fn request_remove(&mut self, id: &str) -> Result<()> {
        self.ensure_editing()?;
        let layouts = self.session.manager().layouts();
        let items = || layouts.iter().flat_map(|(_, items)| items).filter(|i| i.id == id);
        if items().next().is_none() {
            return Err(LayoutError::NotPlaced(id.to_string()).into());
        }
        if items().any(|i| i.is_static) {
            return Err(LayoutError::StaticWidget(id.to_string()).into());
        }
        self.overlay = Some(Overlay::ConfirmRemove { id: id.to_string() });
        Ok(())
    }

    /// Removes the widget awaiting confirmation.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode, or if the layout engine refuses it.
    pub fn confirm_remove(&mut self) -> Result<()> {
        let Some(Overlay::ConfirmRemove { id }) = self.overlay.clone() else {
            return Ok(());
        };
        self.ensure_editing()?;
        self.session.remove_widget(&id)?;
        self.overlay = None;
        self.gates.remove(&id);
        self.settle_selection();
        let name = self.display_name(&id);
        self.notify(NoticeLevel::Info, format!("Removed {name}"));
        Ok(())
    }

    /// Closes the open overlay, discarding a configuration sheet's edits.
    pub fn dismiss(&mut self) {
        self.overlay = None;
    }

    /// Opens the configuration sheet of a widget.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode, and for widgets that are unknown, have
    /// no editor, or are not placed.
    pub fn open_config(&mut self, id: &str) -> Result<()> {
        self.ensure_editing()?;
        let def = self
            .registry
            .lookup(id)
            .ok_or_else(|| LayoutError::UnknownWidget(id.to_string()))?;
        let WidgetConfigSpec::WithConfig { editor, schema } = &def.config else {
            return Err(LayoutError::ConfigWithoutEditor(id.to_string()).into());
        };
        let manager = self.session.manager();
        if !manager.layouts().contains_widget(id) {
            return Err(LayoutError::NotPlaced(id.to_string()).into());
        }
        let sheet = ConfigSheet::new(id, editor.title, schema, manager.widget_config(id));
        self.overlay = Some(Overlay::Sheet(sheet));
        Ok(())
    }

    /// Stores the open sheet's blob and closes the sheet.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode or if the blob is refused; the sheet stays
    /// open in both cases.
    pub fn save_config(&mut self) -> Result<()> {
        let Some(Overlay::Sheet(sheet)) = &self.overlay else {
            return Ok(());
        };
        self.ensure_editing()?;
        let id = sheet.widget().to_string();
        self.session.set_widget_config(&id, sheet.blob())?;
        self.overlay = None;
        let name = self.display_name(&id);
        self.notify(NoticeLevel::Info, format!("Updated {name}"));
        Ok(())
    }

    /// Moves the selected widget by whole cells at a breakpoint.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode, without a selection, or for pinned
    /// widgets.
    pub fn move_selected(&mut self, breakpoint: Breakpoint, dx: i16, dy: i16) -> Result<()> {
        self.ensure_editing()?;
        let id = self.selected.clone().ok_or(ShellError::NothingSelected)?;
        self.session
            .move_item(breakpoint, &id, (dx, dy), &self.role_default)?;
        Ok(())
    }

    /// Resizes the selected widget by whole cells at a breakpoint.
    ///
    /// # Errors
    ///
    /// Same as [`move_selected`](Self::move_selected).
    pub fn resize_selected(&mut self, breakpoint: Breakpoint, dw: i16, dh: i16) -> Result<()> {
        self.ensure_editing()?;
        let id = self.selected.clone().ok_or(ShellError::NothingSelected)?;
        self.session
            .resize_item(breakpoint, &id, (dw, dh), &self.role_default)?;
        Ok(())
    }

    /// Undoes the last edit. Returns `false` if there was nothing to undo.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode.
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_editing()?;
        let undone = self.session.undo();
        self.settle_selection();
        Ok(undone)
    }

    /// Redoes the last undone edit. Returns `false` if there was nothing to
    /// redo.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode.
    pub fn redo(&mut self) -> Result<bool> {
        self.ensure_editing()?;
        let redone = self.session.redo();
        self.settle_selection();
        Ok(redone)
    }

    /// Replaces the layouts with the role default, as an undoable edit.
    ///
    /// # Errors
    ///
    /// Rejected outside edit mode.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_editing()?;
        self.session.reset_to(self.role_default.clone());
        self.overlay = None;
        self.settle_selection();
        self.notify(NoticeLevel::Info, "Restored the default layout");
        Ok(())
    }

    // --- Saving ---

    /// Enters the saving phase and returns the snapshot to persist.
    ///
    /// Returns `None` outside edit mode.
    pub fn begin_save(&mut self) -> Option<DashboardSnapshot> {
        if self.phase != Phase::Editing {
            debug!(phase = ?self.phase, "Ignoring save request");
            return None;
        }
        self.overlay = None;
        self.phase = Phase::Saving;
        debug!("Save started");
        Some(self.snapshot().clone())
    }

    /// Completes a save started with [`begin_save`](Self::begin_save).
    ///
    /// On success the session is committed and the dashboard returns to
    /// viewing. On failure it returns to editing with every edit and the
    /// undo history intact, so the save can be retried.
    pub fn finish_save(&mut self, result: StoreResult<()>) {
        if self.phase != Phase::Saving {
            debug!(phase = ?self.phase, "Ignoring save result");
            return;
        }
        match result {
            Ok(()) => {
                self.session.commit();
                self.phase = Phase::Viewing;
                info!("Dashboard saved");
                self.notify(NoticeLevel::Info, "Dashboard saved");
            }
            Err(err) => {
                warn!(error = %err, "Dashboard save failed");
                self.phase = Phase::Editing;
                self.notify(
                    NoticeLevel::Error,
                    format!("Could not save the dashboard: {err}. Press s to retry."),
                );
            }
        }
    }

    // --- Notices ---

    /// Raises a notice.
    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice::new(level, text, Instant::now()));
    }

    /// Returns the live notices, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drops notices that have expired at `now`.
    pub fn expire_notices(&mut self, now: Instant) {
        self.notices.retain(|notice| !notice.is_expired(now));
    }

    fn ensure_editing(&self) -> Result<()> {
        match self.phase {
            Phase::Editing => Ok(()),
            Phase::Saving => Err(ShellError::Saving),
            Phase::Loading => Err(ShellError::Loading),
            Phase::Viewing => Err(ShellError::NotEditing),
        }
    }

    fn display_name(&self, id: &str) -> String {
        self.registry
            .lookup(id)
            .map_or_else(|| id.to_string(), |def| def.name.to_string())
    }

    /// Drops gates of widgets no longer shown and keeps the selection on a
    /// shown widget.
    fn settle_selection(&mut self) {
        let manager = self.session.manager();
        let mut shown: HashSet<&str> = manager
            .layouts()
            .iter()
            .flat_map(|(_, items)| items)
            .map(|item| item.id.as_str())
            .collect();
        shown.extend(
            manager
                .resolve_layout(&self.role_default)
                .iter()
                .map(|item| item.id.as_str()),
        );

        self.gates.retain(|id, _| shown.contains(id.as_str()));
        if self
            .selected
            .as_deref()
            .is_none_or(|id| !shown.contains(id))
        {
            self.selected = manager
                .resolve_layout(&self.role_default)
                .iter()
                .min_by_key(|item| (item.y, item.x))
                .map(|item| item.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use divedash_config::StoreError;
    use divedash_protocol::StoredLayout;
    use serde_json::json;
    use std::time::Duration;

    fn config(role: &str) -> Config {
        Config {
            role: Some(role.to_string()),
            ..Default::default()
        }
    }

    fn seeded(role: &str) -> Dashboard {
        let mut dashboard = Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &config(role));
        dashboard.seed(Ok(None));
        dashboard
    }

    fn editing(role: &str) -> Dashboard {
        let mut dashboard = seeded(role);
        dashboard.toggle_edit().expect("edit");
        dashboard
    }

    fn ids(dashboard: &Dashboard, bp: Breakpoint) -> Vec<String> {
        dashboard.tiles(bp).iter().map(|t| t.id().to_string()).collect()
    }

    fn record(layout: serde_json::Value, widgets: serde_json::Value) -> StoredDashboard {
        StoredDashboard::from_json(
            &json!({"version": 2, "layout": layout, "widgets": widgets}).to_string(),
        )
        .expect("record")
    }

    #[test]
    fn loading_shows_nothing_and_rejects_edits() {
        let mut dashboard =
            Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &config("supervisor"));
        assert_eq!(dashboard.phase(), Phase::Loading);
        assert!(dashboard.tiles(Breakpoint::Lg).is_empty());
        assert_eq!(dashboard.toggle_edit(), Err(ShellError::Loading));
        assert!(dashboard.begin_save().is_none());
    }

    #[test]
    fn seed_without_record_uses_role_defaults() {
        let dashboard = seeded("buzo");
        assert_eq!(dashboard.phase(), Phase::Viewing);
        let lg = ids(&dashboard, Breakpoint::Lg);
        assert_eq!(lg.first().map(String::as_str), Some("quick-actions"));
        assert!(lg.contains(&"diver-profile".to_string()));
        assert_eq!(dashboard.selected(), Some("quick-actions"));
        assert!(dashboard.notices().is_empty());
    }

    #[test]
    fn seed_failure_falls_back_with_warning() {
        let mut dashboard =
            Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &config("supervisor"));
        dashboard.seed(Err(StoreError::Unavailable("offline".to_string())));

        assert_eq!(dashboard.phase(), Phase::Viewing);
        assert_eq!(ids(&dashboard, Breakpoint::Lg), ids(&seeded("supervisor"), Breakpoint::Lg));
        assert_eq!(dashboard.notices().len(), 1);
        assert_eq!(dashboard.notices()[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn seed_keeps_only_usable_configuration() {
        let stored = record(
            json!({"lg": [
                {"i": "weather", "x": 0, "y": 0, "w": 4, "h": 6},
                {"i": "recent-immersions", "x": 4, "y": 0, "w": 8, "h": 6},
                {"i": "retired-widget", "x": 0, "y": 6, "w": 4, "h": 4},
            ]}),
            json!({
                "weather": {"units": "imperial"},
                "recent-immersions": {"rows": 5},
                "calendar": {"view": "week"},
            }),
        );
        let mut dashboard =
            Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &config("supervisor"));
        dashboard.seed(Ok(Some(stored)));

        assert_eq!(
            ids(&dashboard, Breakpoint::Lg),
            vec!["weather".to_string(), "recent-immersions".to_string()]
        );
        let widgets = &dashboard.snapshot().widgets;
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets.get("weather").map(|b| &b["units"]), Some(&json!("imperial")));
    }

    #[test]
    fn seed_accepts_legacy_records() {
        let stored = StoredDashboard::from_json(
            r#"{"layout": [{"i": "calendar", "x": 0, "y": 0, "w": 8, "h": 8}], "widgets": null}"#,
        )
        .expect("record");
        let mut dashboard =
            Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &config("buzo"));
        dashboard.seed(Ok(Some(stored)));

        // Every breakpoint falls back to the stored lg layout.
        assert_eq!(ids(&dashboard, Breakpoint::Xs), vec!["calendar".to_string()]);
        assert_eq!(dashboard.tiles(Breakpoint::Xs)[0].item().width, 4);
    }

    #[test]
    fn seed_is_ignored_once_loaded() {
        let mut dashboard = seeded("supervisor");
        dashboard.seed(Ok(Some(record(json!({"lg": []}), json!({})))));
        assert!(!dashboard.tiles(Breakpoint::Lg).is_empty());
    }

    #[test]
    fn unknown_widgets_render_as_missing_tiles() {
        let defs: Vec<WidgetDefinition> = WidgetRegistry::builtin()
            .iter()
            .filter(|def| def.id != "calendar")
            .cloned()
            .collect();
        let registry = Arc::new(WidgetRegistry::new(defs).expect("registry"));
        let mut dashboard = Dashboard::loading(registry, &config("other"));
        dashboard.seed(Ok(None));
        assert!(!ids(&dashboard, Breakpoint::Lg).contains(&"calendar".to_string()));

        // The role default still names it; resetting brings it back as an
        // error tile instead of dropping it.
        dashboard.toggle_edit().expect("edit");
        dashboard.reset().expect("reset");
        let tiles = dashboard.tiles(Breakpoint::Lg);
        let missing: Vec<&str> = tiles
            .iter()
            .filter(|t| matches!(t, Tile::Missing { .. }))
            .map(Tile::id)
            .collect();
        assert_eq!(missing, vec!["calendar"]);
    }

    #[test]
    fn light_widgets_render_before_any_observation() {
        let mut dashboard = editing("other");
        dashboard.add_widget("service-status").expect("add");
        dashboard.add_widget("system-health").expect("add");

        let content: HashMap<String, bool> = dashboard
            .tiles(Breakpoint::Lg)
            .into_iter()
            .filter_map(|t| match t {
                Tile::Widget { item, content, .. } => Some((item.id, content)),
                Tile::Missing { .. } => None,
            })
            .collect();
        assert_eq!(content.get("service-status"), Some(&true));
        assert_eq!(content.get("weather"), Some(&true));
        assert_eq!(content.get("system-health"), Some(&false));
        assert_eq!(content.get("calendar"), Some(&false));
    }

    #[test]
    fn heavy_widgets_wait_for_the_viewport_then_latch() {
        let mut dashboard = seeded("other");
        let calendar = |d: &Dashboard| {
            d.tiles(Breakpoint::Lg)
                .into_iter()
                .find_map(|t| match t {
                    Tile::Widget { item, content, .. } if item.id == "calendar" => Some(content),
                    _ => None,
                })
                .expect("calendar tile")
        };
        let weather = |d: &Dashboard| {
            d.tiles(Breakpoint::Lg)
                .into_iter()
                .any(|t| matches!(t, Tile::Widget { item, content: true, .. } if item.id == "weather"))
        };

        // Rows 0..2 grown by the normal margin reach row 4, where the
        // calendar starts.
        dashboard.observe(Breakpoint::Lg, Viewport::new(0, 2));
        assert!(!calendar(&dashboard));
        assert!(weather(&dashboard));

        dashboard.observe(Breakpoint::Lg, Viewport::new(0, 4));
        assert!(calendar(&dashboard));

        dashboard.observe(Breakpoint::Lg, Viewport::new(40, 4));
        assert!(calendar(&dashboard));
    }

    #[test]
    fn tiles_carry_configuration_of_editable_widgets() {
        let stored = record(
            json!({"lg": [
                {"i": "notifications", "x": 0, "y": 0, "w": 4, "h": 8},
                {"i": "recent-immersions", "x": 4, "y": 0, "w": 8, "h": 6},
            ]}),
            json!({"notifications": {"max_items": 5}}),
        );
        let mut dashboard =
            Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &config("other"));
        dashboard.seed(Ok(Some(stored)));

        for tile in dashboard.tiles(Breakpoint::Lg) {
            let Tile::Widget { item, config, .. } = tile else {
                panic!("unexpected missing tile");
            };
            match item.id.as_str() {
                "notifications" => {
                    assert_eq!(config.map(|c| &c["max_items"]), Some(&json!(5)));
                }
                _ => assert!(config.is_none()),
            }
        }
    }

    #[test]
    fn edits_need_edit_mode() {
        let mut dashboard = seeded("supervisor");
        assert_eq!(dashboard.add_widget("weather"), Err(ShellError::NotEditing));
        assert_eq!(dashboard.undo(), Err(ShellError::NotEditing));
        assert_eq!(dashboard.reset(), Err(ShellError::NotEditing));
        assert_eq!(dashboard.cancel(), Err(ShellError::NotEditing));
    }

    #[test]
    fn catalog_lists_visible_unplaced_widgets() {
        let dashboard = editing("buzo");
        let catalog: Vec<&str> = dashboard.catalog().iter().map(|d| d.id).collect();
        assert!(catalog.contains(&"kpi-cards"));
        assert!(!catalog.contains(&"weather"));
        assert!(!catalog.contains(&"system-health"));
    }

    #[test]
    fn add_from_catalog_places_and_selects() {
        let mut dashboard = editing("buzo");
        dashboard.open_catalog().expect("catalog");
        dashboard.catalog_navigate(-5);
        let first = dashboard.catalog()[0].id;
        dashboard.add_from_catalog().expect("add");

        assert!(dashboard.overlay().is_none());
        assert_eq!(dashboard.selected(), Some(first));
        assert!(dashboard.snapshot().layouts.contains_widget(first));
        assert!(dashboard.is_modified());
    }

    #[test]
    fn duplicate_add_is_a_reported_no_op() {
        let mut dashboard = editing("other");
        let before = dashboard.snapshot().clone();
        assert_eq!(
            dashboard.add_widget("weather"),
            Err(ShellError::Layout(LayoutError::DuplicateWidget("weather".to_string())))
        );
        assert_eq!(dashboard.snapshot(), &before);
        assert!(!dashboard.session().history().can_undo());
    }

    #[test]
    fn remove_goes_through_confirmation() {
        let mut dashboard = editing("other");
        dashboard.request_remove("weather").expect("request");
        assert!(dashboard.snapshot().layouts.contains_widget("weather"));

        dashboard.dismiss();
        dashboard.confirm_remove().expect("nothing pending");
        assert!(dashboard.snapshot().layouts.contains_widget("weather"));

        dashboard.request_remove("weather").expect("request");
        dashboard.confirm_remove().expect("remove");
        assert!(!dashboard.snapshot().layouts.contains_widget("weather"));
        assert!(dashboard.overlay().is_none());
    }

    #[test]
    fn pinned_widgets_cannot_be_removed_or_moved() {
        let mut dashboard = editing("buzo");
        assert_eq!(
            dashboard.request_remove("quick-actions"),
            Err(ShellError::Layout(LayoutError::StaticWidget("quick-actions".to_string())))
        );
        assert_eq!(dashboard.selected(), Some("quick-actions"));
        assert!(matches!(
            dashboard.move_selected(Breakpoint::Lg, 0, 1),
            Err(ShellError::Layout(LayoutError::StaticWidget(_)))
        ));
    }

    #[test]
    fn config_sheet_commits_on_save_only() {
        let mut dashboard = editing("other");
        dashboard.open_config("weather").expect("open");
        dashboard
            .sheet_mut()
            .expect("sheet")
            .change("units", json!("imperial"))
            .expect("change");
        dashboard.dismiss();
        assert!(dashboard.snapshot().widgets.get("weather").is_none());

        dashboard.open_config("weather").expect("open");
        dashboard
            .sheet_mut()
            .expect("sheet")
            .change("units", json!("imperial"))
            .expect("change");
        dashboard.save_config().expect("save");
        assert_eq!(
            dashboard.snapshot().widgets.get("weather").map(|b| &b["units"]),
            Some(&json!("imperial"))
        );

        dashboard.undo().expect("undo");
        assert!(dashboard.snapshot().widgets.get("weather").is_none());
    }

    #[test]
    fn open_config_rejects_widgets_without_editor() {
        let mut dashboard = editing("other");
        assert_eq!(
            dashboard.open_config("recent-immersions"),
            Err(ShellError::Layout(LayoutError::ConfigWithoutEditor(
                "recent-immersions".to_string()
            )))
        );
        assert_eq!(
            dashboard.open_config("immersions-chart"),
            Err(ShellError::Layout(LayoutError::NotPlaced("immersions-chart".to_string())))
        );
    }

    #[test]
    fn move_and_resize_selected_item() {
        let mut dashboard = editing("other");
        dashboard.select(Breakpoint::Lg, Direction::Down);
        dashboard.select(Breakpoint::Lg, Direction::Left);
        assert_eq!(dashboard.selected(), Some("weather"));

        dashboard.resize_selected(Breakpoint::Lg, 0, 2).expect("resize");
        let weather = dashboard.selected_item(Breakpoint::Lg).expect("placed");
        assert_eq!(weather.height, 8);

        dashboard.move_selected(Breakpoint::Lg, 1, 0).expect("move");
        let weather = dashboard.selected_item(Breakpoint::Lg).expect("placed");
        assert_eq!((weather.x, weather.y), (1, 4));
        let calendar = dashboard
            .placed(Breakpoint::Lg)
            .into_iter()
            .find(|item| item.id == "calendar")
            .expect("calendar");
        assert_eq!(calendar.y, 12);

        assert_eq!(dashboard.undo(), Ok(true));
        assert_eq!(dashboard.undo(), Ok(true));
        assert_eq!(dashboard.undo(), Ok(false));
        assert_eq!(dashboard.redo(), Ok(true));
    }

    #[test]
    fn selection_follows_the_grid() {
        let mut dashboard = seeded("other");
        assert_eq!(dashboard.selected(), Some("kpi-cards"));
        // Straight below the centre of the full-width row.
        dashboard.select(Breakpoint::Lg, Direction::Down);
        assert_eq!(dashboard.selected(), Some("calendar"));
        dashboard.select(Breakpoint::Lg, Direction::Left);
        assert_eq!(dashboard.selected(), Some("weather"));
        dashboard.select(Breakpoint::Lg, Direction::Down);
        assert_eq!(dashboard.selected(), Some("notifications"));
        dashboard.select(Breakpoint::Lg, Direction::Right);
        assert_eq!(dashboard.selected(), Some("recent-immersions"));
        dashboard.select(Breakpoint::Lg, Direction::Right);
        assert_eq!(dashboard.selected(), Some("recent-immersions"));

        dashboard.clear_selection();
        dashboard.select(Breakpoint::Lg, Direction::Up);
        assert_eq!(dashboard.selected(), Some("kpi-cards"));
        dashboard.select(Breakpoint::Lg, Direction::Up);
        assert_eq!(dashboard.selected(), Some("kpi-cards"));
        dashboard.select(Breakpoint::Lg, Direction::Left);
        assert_eq!(dashboard.selected(), Some("kpi-cards"));
    }

    #[test]
    fn cancel_restores_the_session_start() {
        let mut dashboard = editing("other");
        let before = dashboard.snapshot().clone();
        dashboard.add_widget("immersions-chart").expect("add");
        dashboard.request_remove("weather").expect("request");
        dashboard.confirm_remove().expect("remove");

        dashboard.toggle_edit().expect("cancel");
        assert_eq!(dashboard.phase(), Phase::Viewing);
        assert_eq!(dashboard.snapshot(), &before);
        assert_eq!(dashboard.selected(), Some("kpi-cards"));
    }

    #[test]
    fn reset_is_undoable() {
        let mut dashboard = editing("other");
        dashboard.request_remove("weather").expect("request");
        dashboard.confirm_remove().expect("remove");
        dashboard.reset().expect("reset");
        assert!(dashboard.snapshot().layouts.contains_widget("weather"));

        dashboard.undo().expect("undo");
        assert!(!dashboard.snapshot().layouts.contains_widget("weather"));
    }

    #[test]
    fn saving_rejects_edits_until_finished() {
        let mut dashboard = editing("other");
        dashboard.add_widget("immersions-chart").expect("add");
        let snapshot = dashboard.begin_save().expect("snapshot");
        assert!(snapshot.layouts.contains_widget("immersions-chart"));
        assert_eq!(dashboard.phase(), Phase::Saving);

        assert_eq!(dashboard.add_widget("weather"), Err(ShellError::Saving));
        assert_eq!(dashboard.reset(), Err(ShellError::Saving));
        assert_eq!(dashboard.cancel(), Err(ShellError::Saving));
        assert_eq!(dashboard.toggle_edit(), Err(ShellError::Saving));
        assert!(dashboard.begin_save().is_none());
    }

    #[test]
    fn failed_save_keeps_edits_and_history() {
        let mut dashboard = editing("other");
        dashboard.add_widget("immersions-chart").expect("add");
        dashboard.begin_save().expect("snapshot");
        dashboard.finish_save(Err(StoreError::Unavailable("disk full".to_string())));

        assert_eq!(dashboard.phase(), Phase::Editing);
        assert!(dashboard.snapshot().layouts.contains_widget("immersions-chart"));
        assert!(dashboard.session().history().can_undo());
        let last = dashboard.notices().last().expect("notice");
        assert_eq!(last.level, NoticeLevel::Error);
        assert!(last.text.contains("disk full"));

        // Retry.
        dashboard.begin_save().expect("snapshot");
        dashboard.finish_save(Ok(()));
        assert_eq!(dashboard.phase(), Phase::Viewing);
        assert!(!dashboard.is_modified());
        assert!(dashboard.snapshot().layouts.contains_widget("immersions-chart"));
    }

    #[test]
    fn successful_save_starts_a_fresh_session() {
        let mut dashboard = editing("other");
        dashboard.add_widget("immersions-chart").expect("add");
        dashboard.begin_save().expect("snapshot");
        dashboard.finish_save(Ok(()));

        dashboard.toggle_edit().expect("edit");
        assert!(!dashboard.session().history().can_undo());
        dashboard.toggle_edit().expect("cancel");
        assert!(dashboard.snapshot().layouts.contains_widget("immersions-chart"));
    }

    #[test]
    fn saved_snapshot_round_trips_through_the_record() {
        let mut dashboard = editing("other");
        dashboard.open_config("notifications").expect("open");
        dashboard
            .sheet_mut()
            .expect("sheet")
            .change("only_unread", json!(true))
            .expect("change");
        dashboard.save_config().expect("save");
        let snapshot = dashboard.begin_save().expect("snapshot");

        let record = StoredDashboard::from_snapshot(&snapshot);
        assert!(matches!(record.layout, Some(StoredLayout::Breakpoints(_))));
        let mut reloaded =
            Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &config("other"));
        reloaded.seed(Ok(Some(record)));
        assert_eq!(reloaded.snapshot(), &snapshot);
    }

    #[test]
    fn notices_expire() {
        let mut dashboard = seeded("other");
        dashboard.notify(NoticeLevel::Info, "hello");
        dashboard.notify(NoticeLevel::Error, "oops");
        dashboard.expire_notices(Instant::now() + Duration::from_secs(5));
        assert_eq!(dashboard.notices().len(), 1);
        assert_eq!(dashboard.notices()[0].text, "oops");
    }
}
