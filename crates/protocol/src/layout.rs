//! Layout data model for the dashboard grid.
//!
//! This module defines the position record for a single widget
//! ([`LayoutItem`]), the per-breakpoint collection of those records
//! ([`LayoutSet`]), the per-widget configuration blobs
//! ([`WidgetConfigMap`]) and the pair persisted together
//! ([`DashboardSnapshot`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::breakpoint::Breakpoint;

/// Identifier of a widget, as registered in the widget catalog.
pub type WidgetId = String;

/// Position and size of one widget within one breakpoint's grid.
///
/// Coordinates and sizes are expressed in grid units. The wire names follow
/// the persisted layout format (`i`, `x`, `y`, `w`, `h`, `static`).
///
/// # Examples
///
/// ```
/// use divedash_protocol::LayoutItem;
///
/// let item = LayoutItem::new("weather", 0, 0, 4, 6);
/// assert_eq!(item.bottom(), 6);
/// assert!(!item.is_static);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutItem {
    /// The widget this item places.
    #[serde(rename = "i")]
    pub id: WidgetId,
    /// Column of the left edge.
    pub x: u16,
    /// Row of the top edge.
    pub y: u16,
    /// Width in columns.
    #[serde(rename = "w")]
    pub width: u16,
    /// Height in rows.
    #[serde(rename = "h")]
    pub height: u16,
    /// Static items cannot be dragged, resized or removed.
    #[serde(rename = "static", default, skip_serializing_if = "is_false")]
    pub is_static: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl LayoutItem {
    /// Creates a movable item.
    #[must_use]
    pub fn new(id: impl Into<WidgetId>, x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            is_static: false,
        }
    }

    /// Marks the item as static.
    #[must_use]
    pub fn pinned(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Returns the first row below this item.
    #[must_use]
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Returns the first column right of this item.
    #[must_use]
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Returns `true` if the two items occupy at least one common cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use divedash_protocol::LayoutItem;
    ///
    /// let a = LayoutItem::new("a", 0, 0, 4, 4);
    /// let b = LayoutItem::new("b", 3, 3, 2, 2);
    /// let c = LayoutItem::new("c", 4, 0, 2, 2);
    /// assert!(a.overlaps(&b));
    /// assert!(!a.overlaps(&c));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Per-breakpoint layouts.
///
/// Any breakpoint may be absent; consumers resolve a missing breakpoint
/// through the fallback chain of the layout manager.
///
/// # Examples
///
/// ```
/// use divedash_protocol::{Breakpoint, LayoutItem, LayoutSet};
///
/// let mut set = LayoutSet::new();
/// set.insert(Breakpoint::Lg, vec![LayoutItem::new("weather", 0, 0, 4, 6)]);
/// assert!(set.contains_widget("weather"));
/// assert!(set.get(Breakpoint::Md).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutSet(BTreeMap<Breakpoint, Vec<LayoutItem>>);

impl LayoutSet {
    /// Creates an empty layout set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single `lg` layout.
    #[must_use]
    pub fn with_lg(items: Vec<LayoutItem>) -> Self {
        let mut set = Self::new();
        set.insert(Breakpoint::Lg, items);
        set
    }

    /// Returns the items of a breakpoint, if that breakpoint is present.
    #[must_use]
    pub fn get(&self, breakpoint: Breakpoint) -> Option<&[LayoutItem]> {
        self.0.get(&breakpoint).map(Vec::as_slice)
    }

    /// Returns a mutable handle to a breakpoint's items, if present.
    pub fn get_mut(&mut self, breakpoint: Breakpoint) -> Option<&mut Vec<LayoutItem>> {
        self.0.get_mut(&breakpoint)
    }

    /// Replaces the items of a breakpoint, returning the previous list.
    pub fn insert(
        &mut self,
        breakpoint: Breakpoint,
        items: Vec<LayoutItem>,
    ) -> Option<Vec<LayoutItem>> {
        self.0.insert(breakpoint, items)
    }

    /// Returns `true` if the breakpoint is present (even with no items).
    #[must_use]
    pub fn has(&self, breakpoint: Breakpoint) -> bool {
        self.0.contains_key(&breakpoint)
    }

    /// Returns `true` if no breakpoint is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if any breakpoint holds at least one item.
    #[must_use]
    pub fn has_items(&self) -> bool {
        self.0.values().any(|items| !items.is_empty())
    }

    /// Removes every breakpoint.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the present breakpoints, widest first.
    pub fn breakpoints(&self) -> impl Iterator<Item = Breakpoint> + '_ {
        self.0.keys().copied()
    }

    /// Iterates over `(breakpoint, items)` pairs, widest first.
    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, &[LayoutItem])> {
        self.0.iter().map(|(bp, items)| (*bp, items.as_slice()))
    }

    /// Iterates mutably over every breakpoint's items.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Breakpoint, &mut Vec<LayoutItem>)> {
        self.0.iter_mut().map(|(bp, items)| (*bp, items))
    }

    /// Returns `true` if any breakpoint places the widget.
    #[must_use]
    pub fn contains_widget(&self, id: &str) -> bool {
        self.0.values().flatten().any(|item| item.id == id)
    }

    /// Removes the widget from every breakpoint.
    ///
    /// Returns `true` if at least one item was removed.
    pub fn remove_widget(&mut self, id: &str) -> bool {
        let mut removed = false;
        for items in self.0.values_mut() {
            let before = items.len();
            items.retain(|item| item.id != id);
            removed |= items.len() < before;
        }
        removed
    }
}

impl FromIterator<(Breakpoint, Vec<LayoutItem>)> for LayoutSet {
    fn from_iter<T: IntoIterator<Item = (Breakpoint, Vec<LayoutItem>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Configuration blobs keyed by widget id.
///
/// Blobs are opaque to the layout engine; only the widget's own editor
/// interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetConfigMap(BTreeMap<WidgetId, serde_json::Value>);

impl WidgetConfigMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the blob stored for a widget.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&serde_json::Value> {
        self.0.get(id)
    }

    /// Inserts or replaces a widget's blob.
    pub fn upsert(&mut self, id: impl Into<WidgetId>, blob: serde_json::Value) {
        self.0.insert(id.into(), blob);
    }

    /// Deletes a widget's blob, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<serde_json::Value> {
        self.0.remove(id)
    }

    /// Keeps only the entries for which the predicate holds.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|id, _| keep(id));
    }

    /// Returns the number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no blob is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the stored blobs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(id, blob)| (id.as_str(), blob))
    }
}

/// The persisted and snapshotted dashboard content.
///
/// This is the `{layout, widgets}` pair handed to the store on save and
/// captured by the undo history before each edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Per-breakpoint layouts.
    pub layouts: LayoutSet,
    /// Per-widget configuration.
    pub widgets: WidgetConfigMap,
}

impl DashboardSnapshot {
    /// Creates a snapshot from its parts.
    #[must_use]
    pub fn new(layouts: LayoutSet, widgets: WidgetConfigMap) -> Self {
        Self { layouts, widgets }
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    impl Arbitrary for Breakpoint {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            prop_oneof![
                Just(Breakpoint::Lg),
                Just(Breakpoint::Md),
                Just(Breakpoint::Sm),
                Just(Breakpoint::Xs),
                Just(Breakpoint::Xxs),
            ]
            .boxed()
        }
    }

    prop_compose! {
        fn arb_item()(
            id in "[a-z]{1,8}",
            x in 0u16..12,
            y in 0u16..40,
            width in 1u16..12,
            height in 1u16..10,
            is_static in any::<bool>(),
        ) -> LayoutItem {
            LayoutItem { id, x, y, width, height, is_static }
        }
    }

    proptest! {
        /// Overlap is a symmetric relation.
        #[test]
        fn overlap_is_symmetric(a in arb_item(), b in arb_item()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        /// An item always overlaps itself.
        #[test]
        fn item_overlaps_itself(a in arb_item()) {
            prop_assert!(a.overlaps(&a));
        }

        /// Layout sets survive the JSON wire format unchanged.
        #[test]
        fn layout_set_roundtrip(
            entries in proptest::collection::vec((any::<Breakpoint>(), proptest::collection::vec(arb_item(), 0..6)), 0..5)
        ) {
            let set: LayoutSet = entries.into_iter().collect();
            let json = serde_json::to_string(&set).expect("serialize");
            let parsed: LayoutSet = serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(set, parsed);
        }

        /// Removing a widget leaves no trace of it in any breakpoint.
        #[test]
        fn remove_widget_is_complete(
            items in proptest::collection::vec(arb_item(), 0..8),
            bp in any::<Breakpoint>(),
        ) {
            let mut set = LayoutSet::new();
            set.insert(bp, items.clone());
            if let Some(first) = items.first() {
                let id = first.id.clone();
                prop_assert!(set.remove_widget(&id));
                prop_assert!(!set.contains_widget(&id));
            }
        }
    }
}
