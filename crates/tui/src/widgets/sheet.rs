//! The widget configuration sheet.

use divedash_layout::FieldKind;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::{centered_rect, display_value};
use crate::config_sheet::ConfigSheet;

const SHEET_WIDTH: u16 = 56;

/// Renders a configuration sheet over the grid.
///
/// One line per field with its current value; the selected field is
/// highlighted and text fields show a cursor.
pub fn render_config_sheet(sheet: &ConfigSheet, area: Rect, buf: &mut Buffer) {
    let fields = sheet.fields();
    // Borders, fields, a separator and the hint.
    let height = u16::try_from(fields.len()).unwrap_or(u16::MAX).saturating_add(4);
    let popup = centered_rect(SHEET_WIDTH, height, area);
    Clear.render(popup, buf);

    let mut title = format!(" {} ", sheet.title());
    if sheet.is_dirty() {
        title.push_str("* ");
    }
    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    block.render(popup, buf);

    let [fields_area, _, help_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let label_width = fields.iter().map(|f| f.label.len()).max().unwrap_or(0);
    let lines: Vec<Line> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let selected = i == sheet.selected();
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if selected { "> " } else { "  " };
            let mut value = sheet.value(field.key).map(display_value).unwrap_or_default();
            if selected && matches!(field.kind, FieldKind::Text { .. }) {
                value.push('_');
            }
            Line::from(vec![
                Span::styled(format!("{prefix}{:<label_width$}  ", field.label), style),
                Span::styled(value, style.remove_modifier(Modifier::BOLD)),
            ])
        })
        .collect();
    Paragraph::new(lines).render(fields_area, buf);

    let hint = if sheet.is_text_field() {
        "type to edit · Enter save · Esc discard"
    } else {
        "←/→ change · Enter save · Esc discard"
    };
    Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))).render(help_area, buf);
}
