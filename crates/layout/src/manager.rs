//! The layout state manager.
//!
//! [`LayoutManager`] owns the dashboard's layouts and widget configuration
//! and applies the structural mutations: replace, add, remove, configure,
//! and the keyboard move/resize helpers. Every mutation validates first
//! and only then touches the state, so a rejected call leaves nothing
//! behind.

use std::sync::Arc;

use divedash_protocol::{Breakpoint, DashboardSnapshot, LayoutItem, LayoutSet, WidgetConfigMap};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{LayoutError, Result};
use crate::registry::{WidgetConfigSpec, WidgetRegistry};

/// The mutable dashboard state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Layouts and widget configuration.
    pub snapshot: DashboardSnapshot,
    /// Whether the dashboard is being edited.
    pub edit_mode: bool,
}

/// Applies layout mutations against the widget registry.
#[derive(Debug, Clone)]
pub struct LayoutManager {
    registry: Arc<WidgetRegistry>,
    state: DashboardState,
}

impl LayoutManager {
    /// Creates a manager with an empty dashboard.
    #[must_use]
    pub fn new(registry: Arc<WidgetRegistry>) -> Self {
        Self::with_snapshot(registry, DashboardSnapshot::default())
    }

    /// Creates a manager holding the given content.
    #[must_use]
    pub fn with_snapshot(registry: Arc<WidgetRegistry>, snapshot: DashboardSnapshot) -> Self {
        Self {
            registry,
            state: DashboardState {
                snapshot,
                edit_mode: false,
            },
        }
    }

    /// Returns the widget registry.
    #[must_use]
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Returns the full state.
    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Returns the current layouts and configuration.
    #[must_use]
    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.state.snapshot
    }

    /// Returns the per-breakpoint layouts.
    #[must_use]
    pub fn layouts(&self) -> &LayoutSet {
        &self.state.snapshot.layouts
    }

    /// Returns the widget configuration map.
    #[must_use]
    pub fn widgets(&self) -> &WidgetConfigMap {
        &self.state.snapshot.widgets
    }

    /// Returns the stored configuration blob of a widget.
    #[must_use]
    pub fn widget_config(&self, id: &str) -> Option<&Value> {
        self.state.snapshot.widgets.get(id)
    }

    /// Returns `true` while editing.
    #[must_use]
    pub fn edit_mode(&self) -> bool {
        self.state.edit_mode
    }

    /// Turns edit mode on or off.
    pub fn set_edit_mode(&mut self, editing: bool) {
        self.state.edit_mode = editing;
    }

    /// Replaces the layouts and configuration wholesale.
    pub fn replace(&mut self, snapshot: DashboardSnapshot) {
        self.state.snapshot = snapshot;
    }

    /// Replaces the whole layout set.
    ///
    /// Unknown widget ids are kept; they render as error tiles. Configuration
    /// of widgets that are no longer placed anywhere is dropped.
    pub fn set_breakpoint_layouts(&mut self, layouts: LayoutSet) {
        let snapshot = &mut self.state.snapshot;
        snapshot.layouts = layouts;
        let placed = &snapshot.layouts;
        snapshot.widgets.retain(|id| placed.contains_widget(id));
    }

    /// Adds a widget to every present breakpoint.
    ///
    /// On an empty set the widget is added to all five breakpoints. Each
    /// new item takes the registry's default size (width capped to the
    /// breakpoint's columns) and is appended below the lowest occupied row.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownWidget`] if the id is not registered,
    /// or [`LayoutError::DuplicateWidget`] if any breakpoint already places
    /// it.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use divedash_layout::{LayoutManager, WidgetRegistry};
    /// use divedash_protocol::Breakpoint;
    ///
    /// let mut manager = LayoutManager::new(Arc::new(WidgetRegistry::builtin()));
    /// manager.add_widget("calendar").unwrap();
    ///
    /// let lg = manager.layouts().get(Breakpoint::Lg).unwrap();
    /// assert_eq!((lg[0].x, lg[0].width, lg[0].height), (0, 8, 8));
    /// assert!(manager.add_widget("calendar").is_err());
    /// ```
    #[instrument(skip(self))]
    pub fn add_widget(&mut self, id: &str) -> Result<()> {
        let def = self.registry.lookup(id).ok_or_else(|| {
            debug!("Rejecting unknown widget");
            LayoutError::UnknownWidget(id.to_string())
        })?;
        let layouts = &mut self.state.snapshot.layouts;
        if layouts.contains_widget(id) {
            debug!("Rejecting duplicate widget");
            return Err(LayoutError::DuplicateWidget(id.to_string()));
        }

        if layouts.is_empty() {
            for bp in Breakpoint::all() {
                layouts.insert(bp, Vec::new());
            }
        }
        let size = def.default_size;
        for (bp, items) in layouts.iter_mut() {
            let columns = bp.columns();
            let width = size.width.clamp(1, columns);
            let count = u16::try_from(items.len()).unwrap_or(u16::MAX);
            let x = (u32::from(count) * u32::from(size.width)) % u32::from(columns);
            let x = u16::try_from(x).unwrap_or(0).min(columns - width);
            let y = items.iter().map(LayoutItem::bottom).max().unwrap_or(0);
            items.push(LayoutItem {
                id: id.to_string(),
                x,
                y,
                width,
                height: size.height.max(1),
                is_static: def.is_static,
            });
        }
        debug!("Widget added");
        Ok(())
    }

    /// Removes a widget from every breakpoint and drops its configuration.
    ///
    /// Returns `false` if the widget was not placed. Removing the last item
    /// leaves an empty set, as before the first add.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::StaticWidget`] if any breakpoint pins it.
    #[instrument(skip(self))]
    pub fn remove_widget(&mut self, id: &str) -> Result<bool> {
        let snapshot = &mut self.state.snapshot;
        let pinned = snapshot
            .layouts
            .iter()
            .flat_map(|(_, items)| items)
            .any(|item| item.id == id && item.is_static);
        if pinned {
            debug!("Rejecting removal of pinned widget");
            return Err(LayoutError::StaticWidget(id.to_string()));
        }

        let removed = snapshot.layouts.remove_widget(id);
        if removed && !snapshot.layouts.has_items() {
            // Back to an unset layout so the role default applies again.
            snapshot.layouts.clear();
        }
        snapshot.widgets.remove(id);
        Ok(removed)
    }

    /// Stores a widget's configuration blob.
    ///
    /// The blob is sanitized against the widget's schema before it is
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownWidget`], [`LayoutError::ConfigWithoutEditor`],
    /// [`LayoutError::NotPlaced`] or [`LayoutError::InvalidConfig`]; the
    /// configuration map is unchanged in every case.
    #[instrument(skip(self, blob))]
    pub fn set_widget_config(&mut self, id: &str, blob: Value) -> Result<()> {
        let def = self
            .registry
            .lookup(id)
            .ok_or_else(|| LayoutError::UnknownWidget(id.to_string()))?;
        let WidgetConfigSpec::WithConfig { schema, .. } = &def.config else {
            debug!("Rejecting configuration for widget without editor");
            return Err(LayoutError::ConfigWithoutEditor(id.to_string()));
        };
        if !self.state.snapshot.layouts.contains_widget(id) {
            return Err(LayoutError::NotPlaced(id.to_string()));
        }
        let blob = schema.sanitize(id, &blob)?;
        self.state.snapshot.widgets.upsert(id, blob);
        Ok(())
    }

    /// Returns the widest of `lg`, `md` and `sm` that is present.
    #[must_use]
    pub fn dominant_layout(&self) -> Option<&[LayoutItem]> {
        let layouts = &self.state.snapshot.layouts;
        [Breakpoint::Lg, Breakpoint::Md, Breakpoint::Sm]
            .into_iter()
            .find_map(|bp| layouts.get(bp))
    }

    /// Returns the dominant layout, falling back to the role default's `lg`.
    #[must_use]
    pub fn resolve_layout<'a>(&'a self, role_default: &'a LayoutSet) -> &'a [LayoutItem] {
        self.dominant_layout()
            .or_else(|| role_default.get(Breakpoint::Lg))
            .unwrap_or_default()
    }

    /// Returns the layout to show at a breakpoint.
    ///
    /// An exact match wins; otherwise the dominant chain applies.
    #[must_use]
    pub fn layout_for<'a>(
        &'a self,
        breakpoint: Breakpoint,
        role_default: &'a LayoutSet,
    ) -> &'a [LayoutItem] {
        self.state
            .snapshot
            .layouts
            .get(breakpoint)
            .unwrap_or_else(|| self.resolve_layout(role_default))
    }

    /// Returns a copy of the layouts with one item moved by whole cells.
    ///
    /// The item stays inside the grid. If the breakpoint is absent, it is
    /// created from the layout currently shown there.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotPlaced`] if the breakpoint does not show
    /// the widget, or [`LayoutError::StaticWidget`] if it is pinned.
    pub fn moved(
        &self,
        breakpoint: Breakpoint,
        id: &str,
        (dx, dy): (i16, i16),
        role_default: &LayoutSet,
    ) -> Result<LayoutSet> {
        self.adjusted(breakpoint, id, role_default, |item, columns| {
            let max_x = columns.saturating_sub(item.width);
            item.x = item.x.saturating_add_signed(dx).min(max_x);
            item.y = item.y.saturating_add_signed(dy);
        })
    }

    /// Returns a copy of the layouts with one item resized by whole cells.
    ///
    /// Sizes stay at least one cell and within the grid's right edge.
    ///
    /// # Errors
    ///
    /// Same as [`moved`](Self::moved).
    pub fn resized(
        &self,
        breakpoint: Breakpoint,
        id: &str,
        (dw, dh): (i16, i16),
        role_default: &LayoutSet,
    ) -> Result<LayoutSet> {
        self.adjusted(breakpoint, id, role_default, |item, columns| {
            let max_width = columns.saturating_sub(item.x).max(1);
            item.width = item.width.saturating_add_signed(dw).clamp(1, max_width);
            item.height = item.height.saturating_add_signed(dh).max(1);
        })
    }

    fn adjusted(
        &self,
        breakpoint: Breakpoint,
        id: &str,
        role_default: &LayoutSet,
        adjust: impl FnOnce(&mut LayoutItem, u16),
    ) -> Result<LayoutSet> {
        let mut items = self.layout_for(breakpoint, role_default).to_vec();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| LayoutError::NotPlaced(id.to_string()))?;
        if item.is_static {
            return Err(LayoutError::StaticWidget(id.to_string()));
        }
        adjust(item, breakpoint.columns());

        let mut layouts = self.state.snapshot.layouts.clone();
        layouts.insert(breakpoint, items);
        Ok(layouts)
    }
}
