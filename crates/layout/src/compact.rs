//! Vertical compaction of layouts.
//!
//! Compaction is a separate, deterministic step applied before rendering.
//! It corrects out-of-bounds items, keeps static items where they are and
//! floats every movable item up to the highest row where it collides with
//! nothing already placed.

use divedash_protocol::{LayoutItem, LayoutSet};

/// Compacts one breakpoint's items for a grid of `columns` columns.
///
/// Movable items are placed in `(y, x)` order; the output keeps the input
/// order.
///
/// # Examples
///
/// ```
/// use divedash_layout::compact_vertical;
/// use divedash_protocol::LayoutItem;
///
/// let items = vec![
///     LayoutItem::new("weather", 0, 10, 4, 6),
///     LayoutItem::new("calendar", 0, 30, 8, 8),
/// ];
/// let compacted = compact_vertical(&items, 12);
/// assert_eq!(compacted[0].y, 0);
/// assert_eq!(compacted[1].y, 6);
/// ```
#[must_use]
pub fn compact_vertical(items: &[LayoutItem], columns: u16) -> Vec<LayoutItem> {
    let columns = columns.max(1);
    let mut result: Vec<LayoutItem> = items.iter().map(|i| within_bounds(i, columns)).collect();

    let mut placed: Vec<LayoutItem> = result.iter().filter(|i| i.is_static).cloned().collect();
    let mut order: Vec<usize> = (0..result.len()).filter(|&i| !result[i].is_static).collect();
    order.sort_by_key(|&i| (result[i].y, result[i].x, i));

    for index in order {
        let mut item = result[index].clone();

        // Nothing can collide below the lowest placed item.
        let floor = placed.iter().map(LayoutItem::bottom).max().unwrap_or(0);
        item.y = item.y.min(floor);
        while item.y > 0 && !collides(&placed, &item, item.y - 1) {
            item.y -= 1;
        }
        while let Some(bottom) = placed
            .iter()
            .filter(|other| other.overlaps(&item))
            .map(LayoutItem::bottom)
            .max()
        {
            item.y = bottom;
        }

        placed.push(item.clone());
        result[index] = item;
    }
    result
}

/// Compacts every breakpoint of a set with its own column count.
#[must_use]
pub fn compact_set(set: &LayoutSet) -> LayoutSet {
    set.iter()
        .map(|(bp, items)| (bp, compact_vertical(items, bp.columns())))
        .collect()
}

fn within_bounds(item: &LayoutItem, columns: u16) -> LayoutItem {
    let mut out = item.clone();
    out.width = item.width.clamp(1, columns);
    out.height = item.height.max(1);
    out.x = item.x.min(columns - out.width);
    out
}

fn collides(placed: &[LayoutItem], item: &LayoutItem, y: u16) -> bool {
    let probe = LayoutItem { y, ..item.clone() };
    placed.iter().any(|other| other.overlaps(&probe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use divedash_protocol::Breakpoint;

    #[test]
    fn static_items_stay_and_block() {
        let items = vec![
            LayoutItem::new("weather", 0, 5, 4, 6),
            LayoutItem::new("quick-actions", 0, 2, 12, 2).pinned(),
        ];
        let compacted = compact_vertical(&items, 12);
        assert_eq!(compacted[1].y, 2);
        assert_eq!(compacted[0].y, 4);
    }

    #[test]
    fn items_float_into_gap_above_static() {
        let items = vec![
            LayoutItem::new("quick-actions", 0, 6, 12, 2).pinned(),
            LayoutItem::new("weather", 0, 4, 4, 2),
        ];
        let compacted = compact_vertical(&items, 12);
        assert_eq!(compacted[1].y, 0);
    }

    #[test]
    fn items_do_not_jump_over_static() {
        let items = vec![
            LayoutItem::new("quick-actions", 0, 6, 12, 2).pinned(),
            LayoutItem::new("weather", 0, 9, 4, 2),
        ];
        let compacted = compact_vertical(&items, 12);
        assert_eq!(compacted[1].y, 8);
    }

    #[test]
    fn tall_item_stops_below_static() {
        let items = vec![
            LayoutItem::new("quick-actions", 0, 3, 12, 2).pinned(),
            LayoutItem::new("calendar", 0, 9, 8, 8),
        ];
        let compacted = compact_vertical(&items, 12);
        assert_eq!(compacted[1].y, 5);
    }

    #[test]
    fn out_of_bounds_items_are_corrected() {
        let items = vec![LayoutItem::new("calendar", 10, 0, 8, 0)];
        let compacted = compact_vertical(&items, 6);
        assert_eq!(compacted[0], LayoutItem::new("calendar", 0, 0, 6, 1));
    }

    #[test]
    fn output_keeps_input_order() {
        let items = vec![
            LayoutItem::new("b", 0, 8, 2, 2),
            LayoutItem::new("a", 0, 0, 2, 2),
        ];
        let compacted = compact_vertical(&items, 2);
        assert_eq!(compacted[0].id, "b");
        assert_eq!(compacted[0].y, 2);
        assert_eq!(compacted[1].y, 0);
    }

    #[test]
    fn compact_set_uses_breakpoint_columns() {
        let set: LayoutSet = [
            (Breakpoint::Lg, vec![LayoutItem::new("kpi-cards", 0, 0, 12, 4)]),
            (Breakpoint::Xxs, vec![LayoutItem::new("kpi-cards", 0, 0, 12, 4)]),
        ]
        .into_iter()
        .collect();
        let compacted = compact_set(&set);
        assert_eq!(compacted.get(Breakpoint::Lg).expect("lg")[0].width, 12);
        assert_eq!(compacted.get(Breakpoint::Xxs).expect("xxs")[0].width, 2);
    }
}
