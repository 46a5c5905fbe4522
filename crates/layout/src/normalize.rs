//! Normalization of stored layouts.
//!
//! A stored layout may be a legacy bare list, a breakpoint map, empty, or
//! absent, and may reference widgets that no longer exist. [`normalize`]
//! turns any of these into a [`LayoutSet`] whose items are all registered,
//! unique per breakpoint and well formed.

use std::collections::HashSet;

use divedash_protocol::wire::RawItem;
use divedash_protocol::{Breakpoint, LayoutItem, LayoutSet, StoredLayout};
use serde_json::Value;
use tracing::debug;

use crate::registry::WidgetRegistry;

/// Normalizes a stored layout against the registry.
///
/// - A non-empty legacy list becomes the `lg` layout.
/// - A non-empty map keeps every recognized breakpoint whose value is a
///   list; other keys are dropped. A map with no recognized breakpoint is
///   treated as empty.
/// - An empty or absent layout yields the role default's `lg` layout.
///
/// Within each list, unknown ids, malformed items and repeated ids are
/// dropped, keeping item order. The result is a fixed point: normalizing
/// it again yields the same set.
///
/// # Examples
///
/// ```
/// use divedash_layout::{WidgetRegistry, defaults_for, normalize};
/// use divedash_protocol::{Breakpoint, Role, StoredLayout};
/// use serde_json::json;
///
/// let registry = WidgetRegistry::builtin();
/// let stored: StoredLayout = serde_json::from_value(json!([
///     {"i": "weather", "x": 0, "y": 0, "w": 4, "h": 6},
///     {"i": "ghost-widget", "x": 4, "y": 0, "w": 4, "h": 6},
/// ]))
/// .unwrap();
///
/// let set = normalize(Some(&stored), &defaults_for(Role::Other), &registry);
/// let lg = set.get(Breakpoint::Lg).unwrap();
/// assert_eq!(lg.len(), 1);
/// assert_eq!(lg[0].id, "weather");
/// ```
#[must_use]
pub fn normalize(
    stored: Option<&StoredLayout>,
    role_default: &LayoutSet,
    registry: &WidgetRegistry,
) -> LayoutSet {
    match stored {
        Some(StoredLayout::Legacy(items)) if !items.is_empty() => {
            LayoutSet::with_lg(filter_values(items, registry))
        }
        Some(StoredLayout::Breakpoints(map)) if !map.is_empty() => {
            let set: LayoutSet = map
                .iter()
                .filter_map(|(key, value)| {
                    let Ok(bp) = Breakpoint::from_name(key) else {
                        debug!(key = %key, "Dropping unrecognized breakpoint");
                        return None;
                    };
                    let Some(items) = value.as_array() else {
                        debug!(breakpoint = %bp, "Dropping breakpoint without item list");
                        return None;
                    };
                    Some((bp, filter_values(items, registry)))
                })
                .collect();
            if set.is_empty() {
                fallback(role_default, registry)
            } else {
                set
            }
        }
        _ => fallback(role_default, registry),
    }
}

fn fallback(role_default: &LayoutSet, registry: &WidgetRegistry) -> LayoutSet {
    let source = role_default
        .get(Breakpoint::Lg)
        .or_else(|| role_default.iter().next().map(|(_, items)| items))
        .unwrap_or_default();
    let values: Vec<Value> = source
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect();
    LayoutSet::with_lg(filter_values(&values, registry))
}

fn filter_values(values: &[Value], registry: &WidgetRegistry) -> Vec<LayoutItem> {
    let mut seen = HashSet::new();
    let mut out: Vec<LayoutItem> = Vec::with_capacity(values.len());

    for value in values {
        let Some(raw) = RawItem::from_value(value) else {
            debug!(item = %value, "Dropping malformed layout item");
            continue;
        };
        let Some(def) = registry.lookup(&raw.id) else {
            debug!(widget = %raw.id, "Dropping unknown widget");
            continue;
        };
        if !seen.insert(raw.id.clone()) {
            debug!(widget = %raw.id, "Dropping repeated widget");
            continue;
        }

        let width = coord(raw.w).filter(|&w| w > 0).unwrap_or(def.default_size.width);
        let height = coord(raw.h).filter(|&h| h > 0).unwrap_or(def.default_size.height);
        let y = coord(raw.y)
            .unwrap_or_else(|| out.iter().map(LayoutItem::bottom).max().unwrap_or(0));
        out.push(LayoutItem {
            id: raw.id,
            x: coord(raw.x).unwrap_or(0),
            y,
            width,
            height,
            is_static: raw.is_static || def.is_static,
        });
    }
    out
}

/// Converts a stored number to a grid coordinate.
///
/// Fractions are floored and the value is clamped to the `u16` range;
/// non-finite numbers count as missing.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coord(value: Option<f64>) -> Option<u16> {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.floor().clamp(0.0, f64::from(u16::MAX)) as u16)
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::defaults::defaults_for;
    use divedash_protocol::Role;
    use proptest::prelude::*;
    use serde_json::{Map, json};

    const IDS: &[&str] = &[
        "kpi-cards",
        "weather",
        "calendar",
        "notifications",
        "quick-actions",
        "ghost-widget",
        "legacy-map",
        "",
    ];
    const KEYS: &[&str] = &["lg", "md", "sm", "xs", "xxs", "xl", "desktop"];

    fn arb_number() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            (-5i64..40).prop_map(Value::from),
            (-5.0f64..40.0).prop_map(Value::from),
        ]
    }

    fn arb_raw_item() -> impl Strategy<Value = Value> {
        (
            proptest::sample::select(IDS),
            arb_number(),
            arb_number(),
            arb_number(),
            arb_number(),
            any::<bool>(),
        )
            .prop_map(|(id, x, y, w, h, is_static)| {
                json!({"i": id, "x": x, "y": y, "w": w, "h": h, "static": is_static})
            })
    }

    fn arb_stored() -> impl Strategy<Value = Option<StoredLayout>> {
        let list = || proptest::collection::vec(arb_raw_item(), 0..8);
        prop_oneof![
            Just(None),
            list().prop_map(|items| Some(StoredLayout::Legacy(items))),
            proptest::collection::vec((proptest::sample::select(KEYS), list()), 0..4).prop_map(
                |entries| {
                    let map: Map<String, Value> = entries
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), Value::Array(v)))
                        .collect();
                    Some(StoredLayout::Breakpoints(map))
                }
            ),
        ]
    }

    fn arb_role() -> impl Strategy<Value = Role> {
        proptest::sample::select(vec![
            Role::Diver,
            Role::Supervisor,
            Role::AdminSalmonera,
            Role::AdminServicio,
            Role::Superuser,
            Role::Other,
        ])
    }

    proptest! {
        /// Normalizing a normalized layout changes nothing.
        #[test]
        fn normalize_is_idempotent(stored in arb_stored(), role in arb_role()) {
            let registry = WidgetRegistry::builtin();
            let defaults = defaults_for(role);

            let once = normalize(stored.as_ref(), &defaults, &registry);
            let again = normalize(Some(&StoredLayout::from(&once)), &defaults, &registry);
            prop_assert_eq!(once, again);
        }

        /// Every surviving item is registered and unique within its list.
        #[test]
        fn output_is_registered_and_unique(stored in arb_stored(), role in arb_role()) {
            let registry = WidgetRegistry::builtin();
            let set = normalize(stored.as_ref(), &defaults_for(role), &registry);

            for (_, items) in set.iter() {
                let mut seen = HashSet::new();
                for item in items {
                    prop_assert!(registry.contains(&item.id));
                    prop_assert!(seen.insert(item.id.as_str()));
                    prop_assert!(item.width >= 1 && item.height >= 1);
                }
            }
        }

        /// A legacy list and the equivalent `lg` map normalize identically.
        #[test]
        fn legacy_list_matches_lg_map(items in proptest::collection::vec(arb_raw_item(), 1..8)) {
            let registry = WidgetRegistry::builtin();
            let defaults = defaults_for(Role::Other);

            let mut map = Map::new();
            map.insert("lg".to_string(), Value::Array(items.clone()));

            let legacy = normalize(Some(&StoredLayout::Legacy(items)), &defaults, &registry);
            let current = normalize(Some(&StoredLayout::Breakpoints(map)), &defaults, &registry);
            prop_assert_eq!(legacy, current);
        }
    }
}
