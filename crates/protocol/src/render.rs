//! Rendering hints shared between the widget catalog and the lazy gate.

use serde::{Deserialize, Serialize};

/// How eagerly a widget's content should be mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Preloaded early, with a wide margin around the viewport.
    High,
    /// Default priority.
    #[default]
    Normal,
    /// Deferred until visible, even for light widgets.
    Low,
}

/// Visibility policy for gated widgets of one priority.
///
/// A gated widget becomes eligible once the fraction of it inside the
/// viewport (grown by `margin_rows` on both ends) reaches `threshold`.
///
/// # Examples
///
/// ```
/// use divedash_protocol::GatePolicy;
///
/// let policy = GatePolicy::new(0.1, 2);
/// assert!(policy.admits(0.1));
/// assert!(!policy.admits(0.05));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GatePolicy {
    /// Minimum visible fraction, in `0.0..=1.0`.
    pub threshold: f32,
    /// Rows of pre-load margin added above and below the viewport.
    pub margin_rows: u16,
}

impl GatePolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(threshold: f32, margin_rows: u16) -> Self {
        Self {
            threshold,
            margin_rows,
        }
    }

    /// Returns `true` if a widget with this visible fraction is eligible.
    ///
    /// Nothing is admitted while the widget is entirely outside the
    /// (margin-grown) viewport, even with a zero threshold.
    #[must_use]
    pub fn admits(&self, intersection_ratio: f32) -> bool {
        intersection_ratio > 0.0 && intersection_ratio >= self.threshold
    }
}

/// Gate policies for each priority.
///
/// # Examples
///
/// ```
/// use divedash_protocol::{LazyPolicies, Priority};
///
/// let policies = LazyPolicies::default();
/// assert!(policies.for_priority(Priority::High).margin_rows
///     > policies.for_priority(Priority::Low).margin_rows);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyPolicies {
    /// Policy for high-priority widgets.
    pub high: GatePolicy,
    /// Policy for normal-priority widgets.
    pub normal: GatePolicy,
    /// Policy for low-priority widgets.
    pub low: GatePolicy,
}

impl Default for LazyPolicies {
    fn default() -> Self {
        Self {
            high: GatePolicy::new(0.0, 4),
            normal: GatePolicy::new(0.1, 2),
            low: GatePolicy::new(0.25, 1),
        }
    }
}

impl LazyPolicies {
    /// Returns the policy that applies to a priority.
    #[must_use]
    pub const fn for_priority(&self, priority: Priority) -> GatePolicy {
        match priority {
            Priority::High => self.high,
            Priority::Normal => self.normal,
            Priority::Low => self.low,
        }
    }
}
