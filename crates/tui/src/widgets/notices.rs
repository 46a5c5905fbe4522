//! Transient notices stacked in the top-right corner.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::notice::{Notice, NoticeLevel};

const NOTICE_WIDTH: u16 = 44;

/// Renders the newest notices, newest on top, as long as they fit.
pub fn render_notices(notices: &[Notice], area: Rect, buf: &mut Buffer) {
    let width = NOTICE_WIDTH.min(area.width);
    let inner_width = usize::from(width.saturating_sub(2)).max(1);
    let mut y = area.y;

    for notice in notices.iter().rev() {
        let text_width = notice.level.label().len() + 2 + notice.text.chars().count();
        let lines = u16::try_from(text_width.div_ceil(inner_width)).unwrap_or(u16::MAX);
        let height = lines.saturating_add(2);
        if y.saturating_add(height) > area.bottom() {
            break;
        }

        let rect = Rect::new(area.right().saturating_sub(width), y, width, height);
        Clear.render(rect, buf);

        let color = match notice.level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color));
        let line = Line::from(vec![
            Span::styled(
                format!("{}: ", notice.level.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(notice.text.as_str()),
        ]);
        Paragraph::new(line)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(rect, buf);

        y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use std::time::Instant;

    #[test]
    fn newest_notice_is_on_top() {
        let now = Instant::now();
        let notices = vec![
            Notice::new(NoticeLevel::Info, "Added Weather", now),
            Notice::new(NoticeLevel::Error, "Could not save", now),
        ];
        let area = Rect::new(0, 0, 80, 10);
        let mut buf = Buffer::empty(area);

        render_notices(&notices, area, &mut buf);

        let out = buffer_to_string(&buf);
        let error = out.find("error: Could not save").expect("error notice shown");
        let info = out.find("info: Added Weather").expect("info notice shown");
        assert!(error < info);
    }

    #[test]
    fn notices_that_do_not_fit_are_skipped() {
        let now = Instant::now();
        let notices = vec![
            Notice::new(NoticeLevel::Info, "first", now),
            Notice::new(NoticeLevel::Info, "second", now),
        ];
        let area = Rect::new(0, 0, 80, 4);
        let mut buf = Buffer::empty(area);

        render_notices(&notices, area, &mut buf);

        let out = buffer_to_string(&buf);
        assert!(out.contains("second"));
        assert!(!out.contains("first"));
    }
}
