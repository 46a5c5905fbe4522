//! Confirmation dialog for removing a widget.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::centered_rect;

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 6;

/// Renders the "remove widget?" confirmation over the grid.
pub fn render_confirm_remove(name: &str, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    Clear.render(popup, buf);

    let block = Block::default()
        .title(Span::styled(
            " Remove widget ",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Red));

    let lines = vec![
        Line::from(vec![
            Span::raw("Remove "),
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" from every layout?"),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Yellow)),
            Span::styled(" remove  ", Style::default().fg(Color::DarkGray)),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::styled(" keep", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn dialog_names_the_widget() {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);

        render_confirm_remove("Weather", area, &mut buf);

        let out = buffer_to_string(&buf);
        assert!(out.contains("Remove widget"));
        assert!(out.contains("Remove Weather from every layout?"));
        assert!(out.contains("y remove  n keep"));
    }
}
