//! Lazy rendering gate.
//!
//! Heavy and low-priority widgets are not rendered until enough of their
//! tile is close to the viewport. Once a widget has been rendered it stays
//! rendered: the gate latches.

use divedash_protocol::{LazyPolicies, Priority};

/// Per-instance gate deciding whether a widget's content is mounted.
///
/// # Examples
///
/// ```
/// use divedash_layout::LazyGate;
/// use divedash_protocol::{LazyPolicies, Priority};
///
/// let mut gate = LazyGate::new(LazyPolicies::default());
/// assert!(!gate.should_render_content(true, Priority::Normal, 0.0));
/// assert!(gate.should_render_content(true, Priority::Normal, 0.5));
/// // Scrolled away again: still rendered.
/// assert!(gate.should_render_content(true, Priority::Normal, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LazyGate {
    rendered: bool,
    policies: LazyPolicies,
}

impl LazyGate {
    /// Creates a gate that has not rendered yet.
    #[must_use]
    pub fn new(policies: LazyPolicies) -> Self {
        Self {
            rendered: false,
            policies,
        }
    }

    /// Returns `true` once the content has been rendered.
    #[must_use]
    pub fn has_rendered(&self) -> bool {
        self.rendered
    }

    /// Returns `true` if a widget with these traits waits for the viewport.
    #[must_use]
    pub fn is_gated(heavy: bool, priority: Priority) -> bool {
        heavy || priority == Priority::Low
    }

    /// Returns `true` if the widget's content should be rendered now.
    ///
    /// Widgets that are neither heavy nor low priority render immediately.
    /// Others render once `intersection_ratio` satisfies the policy for
    /// their priority, and keep rendering from then on.
    pub fn should_render_content(
        &mut self,
        heavy: bool,
        priority: Priority,
        intersection_ratio: f32,
    ) -> bool {
        if !self.rendered {
            self.rendered = !Self::is_gated(heavy, priority)
                || self.policies.for_priority(priority).admits(intersection_ratio);
        }
        self.rendered
    }
}

/// Returns the fraction of a tile inside a viewport grown by `margin` rows
/// on both ends.
///
/// Zero-height tiles count as fully visible when their row is inside the
/// grown viewport.
///
/// # Examples
///
/// ```
/// use divedash_layout::intersection_ratio;
///
/// // Tile rows 10..20, viewport rows 0..15 grown by 0.
/// assert_eq!(intersection_ratio(10, 10, 0, 15, 0), 0.5);
/// // The margin pulls the tile in.
/// assert_eq!(intersection_ratio(20, 10, 0, 15, 5), 0.0);
/// assert_eq!(intersection_ratio(20, 10, 0, 15, 10), 0.5);
/// ```
#[must_use]
pub fn intersection_ratio(
    tile_top: u32,
    tile_height: u32,
    viewport_top: u32,
    viewport_height: u32,
    margin: u32,
) -> f32 {
    let view_start = viewport_top.saturating_sub(margin);
    let view_end = viewport_top
        .saturating_add(viewport_height)
        .saturating_add(margin);
    let tile_end = tile_top.saturating_add(tile_height);

    if tile_height == 0 {
        return if (view_start..view_end).contains(&tile_top) { 1.0 } else { 0.0 };
    }
    let visible = tile_end.min(view_end).saturating_sub(tile_top.max(view_start));
    #[allow(clippy::cast_precision_loss)]
    let ratio = visible as f32 / tile_height as f32;
    ratio.clamp(0.0, 1.0)
}
