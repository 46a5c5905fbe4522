//! The dashboard grid.
//!
//! Grid columns are spread evenly over the available width; each grid row
//! takes [`ROW_HEIGHT`] terminal rows. Tiles partly scrolled out of view
//! are clipped to the grid area.

use divedash_layout::WidgetConfigSpec;
use divedash_protocol::LayoutItem;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Widget},
};
use serde_json::Value;

use super::display_value;
use crate::dashboard::Tile;
use crate::layout::ROW_HEIGHT;

/// How a grid is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridView<'a> {
    /// Columns of the active breakpoint.
    pub columns: u16,
    /// First grid row shown at the top of the area.
    pub scroll: u16,
    /// The selected widget.
    pub selected: Option<&'a str>,
    /// Whether edit affordances are shown.
    pub editing: bool,
}

/// Returns the on-screen rectangle of an item, clipped to `area`.
///
/// Returns `None` when the item is entirely scrolled out of view.
///
/// # Examples
///
/// ```
/// use divedash_protocol::LayoutItem;
/// use divedash_tui::widgets::tile_rect;
/// use ratatui::layout::Rect;
///
/// let area = Rect::new(0, 0, 120, 20);
/// let item = LayoutItem::new("weather", 6, 1, 6, 3);
/// assert_eq!(tile_rect(&item, 12, 0, area), Some(Rect::new(60, 2, 60, 6)));
/// assert_eq!(tile_rect(&item, 12, 4, area), None);
/// ```
#[must_use]
pub fn tile_rect(item: &LayoutItem, columns: u16, scroll: u16, area: Rect) -> Option<Rect> {
    let columns = u32::from(columns.max(1));
    let column_x = |column: u16| {
        let offset = u32::from(area.width) * u32::from(column).min(columns) / columns;
        area.x.saturating_add(u16::try_from(offset).unwrap_or(area.width))
    };
    let left = column_x(item.x);
    let right = column_x(item.right());

    let row = i32::from(ROW_HEIGHT);
    let top = i32::from(area.y) + (i32::from(item.y) - i32::from(scroll)) * row;
    let bottom = top + i32::from(item.height) * row;
    let top = top.max(i32::from(area.y));
    let bottom = bottom.min(i32::from(area.bottom()));
    if bottom <= top || right <= left {
        return None;
    }

    Some(Rect::new(
        left,
        u16::try_from(top).ok()?,
        right - left,
        u16::try_from(bottom - top).ok()?,
    ))
}

/// Renders every visible tile into the grid area.
pub fn render_grid(tiles: &[Tile<'_>], view: GridView<'_>, area: Rect, buf: &mut Buffer) {
    for tile in tiles {
        let Some(rect) = tile_rect(tile.item(), view.columns, view.scroll, area) else {
            continue;
        };
        let selected = view.selected == Some(tile.id());
        render_tile(tile, selected, view.editing, rect, buf);
    }
}

/// Renders one tile.
///
/// Unknown widgets get an error tile. Widgets still behind the lazy gate
/// get a placeholder body.
pub fn render_tile(tile: &Tile<'_>, selected: bool, editing: bool, area: Rect, buf: &mut Buffer) {
    let (title, border_color, body) = match tile {
        Tile::Missing { item } => (
            " Missing ".to_string(),
            Color::Red,
            vec![Line::from(Span::styled(
                item.id.clone(),
                Style::default().fg(Color::Red),
            ))],
        ),
        Tile::Widget {
            item,
            def,
            config,
            content,
        } => {
            let mut title = format!(" {} ", def.name);
            if editing && item.is_static {
                title.push_str("[pinned] ");
            }
            let body = if *content {
                config_lines(&def.config, *config)
            } else {
                vec![Line::from(Span::styled(
                    "···",
                    Style::default().fg(Color::DarkGray),
                ))]
            };
            (title, Color::Gray, body)
        }
    };

    let border_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(border_color)
    };
    let border_type = if selected && editing {
        BorderType::Double
    } else {
        BorderType::Rounded
    };

    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .padding(Padding::horizontal(1));
    Paragraph::new(body).block(block).render(area, buf);
}

/// Summarizes a widget's configuration, one `label: value` line per field.
fn config_lines(spec: &WidgetConfigSpec, config: Option<&Value>) -> Vec<Line<'static>> {
    let WidgetConfigSpec::WithConfig { schema, .. } = spec else {
        return Vec::new();
    };
    schema
        .fields
        .iter()
        .map(|field| {
            let value = config
                .and_then(|blob| blob.get(field.key))
                .unwrap_or(&field.default);
            Line::from(vec![
                Span::styled(
                    format!("{}: ", field.label),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(display_value(value)),
            ])
        })
        .collect()
}
