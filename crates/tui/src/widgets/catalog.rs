//! The widget catalog overlay.

use divedash_layout::WidgetDefinition;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::centered_rect;

const CATALOG_WIDTH: u16 = 48;

/// Renders the catalog of widgets that can be added.
///
/// Each entry shows the widget name and its default size in grid cells;
/// heavy widgets are marked.
pub fn render_catalog(entries: &[&WidgetDefinition], selected: usize, area: Rect, buf: &mut Buffer) {
    // Borders, one line per entry, a blank line and the hint.
    let height = u16::try_from(entries.len()).unwrap_or(u16::MAX).saturating_add(4);
    let popup = centered_rect(CATALOG_WIDTH, height, area);
    Clear.render(popup, buf);

    let block = Block::default()
        .title(Span::styled(
            " Add widget ",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .map(|(i, def)| {
            let style = if i == selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            let mut spans = vec![
                Span::styled(format!("{prefix}{}", def.name), style),
                Span::styled(
                    format!("  {}×{}", def.default_size.width, def.default_size.height),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if def.heavy {
                spans.push(Span::styled(" heavy", Style::default().fg(Color::Magenta)));
            }
            Line::from(spans)
        })
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Enter add · Esc close",
        Style::default().fg(Color::DarkGray),
    )));

    Paragraph::new(lines).block(block).render(popup, buf);
}
