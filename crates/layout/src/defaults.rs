//! Role default layouts.
//!
//! Each role has a fixed `lg` table. The narrower breakpoints are derived
//! from it: widths are capped to the breakpoint's columns and, on the
//! single-column phone grids, every widget spans the full width.

use divedash_protocol::{Breakpoint, LayoutItem, LayoutSet, Role};

type Row = (&'static str, u16, u16, u16, u16);

const DIVER: &[Row] = &[
    ("quick-actions", 0, 0, 12, 2),
    ("diver-profile", 0, 2, 4, 6),
    ("recent-immersions", 4, 2, 8, 6),
    ("weather", 0, 8, 4, 6),
    ("calendar", 4, 8, 8, 8),
    ("notifications", 0, 14, 4, 8),
];

const SUPERVISOR: &[Row] = &[
    ("kpi-cards", 0, 0, 12, 4),
    ("operations-summary", 0, 4, 6, 6),
    ("network-maintenance", 6, 4, 6, 6),
    ("immersions-chart", 0, 10, 6, 6),
    ("recent-immersions", 6, 10, 6, 6),
    ("calendar", 0, 16, 8, 8),
    ("weather", 8, 16, 4, 6),
    ("notifications", 8, 22, 4, 8),
];

const ADMIN_SALMONERA: &[Row] = &[
    ("kpi-cards", 0, 0, 12, 4),
    ("company-overview", 0, 4, 6, 6),
    ("operations-summary", 6, 4, 6, 6),
    ("immersions-chart", 0, 10, 6, 6),
    ("user-activity", 6, 10, 6, 6),
    ("notifications", 0, 16, 4, 8),
    ("calendar", 4, 16, 8, 8),
];

const ADMIN_SERVICIO: &[Row] = &[
    ("kpi-cards", 0, 0, 12, 4),
    ("service-status", 0, 4, 6, 4),
    ("network-maintenance", 6, 4, 6, 6),
    ("company-overview", 0, 8, 6, 6),
    ("operations-summary", 6, 10, 6, 6),
    ("notifications", 0, 14, 4, 8),
    ("calendar", 4, 16, 8, 8),
];

const SUPERUSER: &[Row] = &[
    ("kpi-cards", 0, 0, 12, 4),
    ("system-health", 0, 4, 6, 6),
    ("user-activity", 6, 4, 6, 6),
    ("service-status", 0, 10, 6, 4),
    ("company-overview", 6, 10, 6, 6),
    ("notifications", 0, 14, 4, 8),
    ("calendar", 4, 16, 8, 8),
];

const GENERIC: &[Row] = &[
    ("kpi-cards", 0, 0, 12, 4),
    ("weather", 0, 4, 4, 6),
    ("calendar", 4, 4, 8, 8),
    ("notifications", 0, 10, 4, 8),
    ("recent-immersions", 4, 12, 8, 6),
];

const PINNED: &[&str] = &["quick-actions"];

fn table(role: Role) -> &'static [Row] {
    match role {
        Role::Diver => DIVER,
        Role::Supervisor => SUPERVISOR,
        Role::AdminSalmonera => ADMIN_SALMONERA,
        Role::AdminServicio => ADMIN_SERVICIO,
        Role::Superuser => SUPERUSER,
        Role::Other => GENERIC,
    }
}

/// Returns the `lg` default layout of a role.
#[must_use]
pub fn lg_defaults(role: Role) -> Vec<LayoutItem> {
    table(role)
        .iter()
        .map(|&(id, x, y, w, h)| {
            let item = LayoutItem::new(id, x, y, w, h);
            if PINNED.contains(&id) { item.pinned() } else { item }
        })
        .collect()
}

/// Returns the full default layout set of a role.
///
/// # Examples
///
/// ```
/// use divedash_layout::defaults_for;
/// use divedash_protocol::{Breakpoint, Role};
///
/// let set = defaults_for(Role::Diver);
/// let xs = set.get(Breakpoint::Xs).unwrap();
/// assert!(xs.iter().all(|item| item.x == 0 && item.width == 4));
/// ```
#[must_use]
pub fn defaults_for(role: Role) -> LayoutSet {
    derive_breakpoints(&lg_defaults(role))
}

/// Derives a full layout set from an `lg` layout.
///
/// The `lg` list is kept as is. Items are never dropped or reordered.
#[must_use]
pub fn derive_breakpoints(lg: &[LayoutItem]) -> LayoutSet {
    Breakpoint::all()
        .iter()
        .map(|&bp| (bp, lg.iter().map(|item| fit(item, bp)).collect()))
        .collect()
}

fn fit(item: &LayoutItem, bp: Breakpoint) -> LayoutItem {
    let cols = bp.columns();
    let mut out = item.clone();
    if bp.is_single_column() {
        out.x = 0;
        out.width = cols;
    } else {
        out.width = item.width.clamp(1, cols);
        out.x = item.x.min(cols - out.width);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::WidgetRegistry;

    const ROLES: [Role; 6] = [
        Role::Diver,
        Role::Supervisor,
        Role::AdminSalmonera,
        Role::AdminServicio,
        Role::Superuser,
        Role::Other,
    ];

    #[test]
    fn every_default_widget_is_registered_and_visible() {
        let registry = WidgetRegistry::builtin();
        for role in ROLES {
            for item in lg_defaults(role) {
                let def = registry
                    .lookup(&item.id)
                    .unwrap_or_else(|| panic!("{} is not registered", item.id));
                assert!(def.visibility.allows(role), "{} hidden from {role:?}", item.id);
            }
        }
    }

    #[test]
    fn lg_tables_are_overlap_free() {
        for role in ROLES {
            let items = lg_defaults(role);
            for (i, a) in items.iter().enumerate() {
                for b in &items[i + 1..] {
                    assert!(!a.overlaps(b), "{role:?}: {} overlaps {}", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn derivation_preserves_order_and_count() {
        for role in ROLES {
            let lg = lg_defaults(role);
            let ids: Vec<_> = lg.iter().map(|i| i.id.clone()).collect();
            for (bp, items) in derive_breakpoints(&lg).iter() {
                let derived: Vec<_> = items.iter().map(|i| i.id.clone()).collect();
                assert_eq!(derived, ids, "{bp}");
                assert!(items.iter().all(|i| i.right() <= bp.columns()));
            }
        }
    }

    #[test]
    fn medium_grid_pulls_wide_items_in() {
        let set = derive_breakpoints(&[LayoutItem::new("calendar", 4, 0, 8, 8)]);
        let md = &set.get(Breakpoint::Md).expect("md present")[0];
        assert_eq!((md.x, md.width), (2, 8));
        let sm = &set.get(Breakpoint::Sm).expect("sm present")[0];
        assert_eq!((sm.x, sm.width), (0, 6));
    }

    #[test]
    fn diver_pins_quick_actions() {
        let lg = lg_defaults(Role::Diver);
        assert!(lg[0].is_static);
        assert!(lg[1..].iter().all(|i| !i.is_static));
    }
}
