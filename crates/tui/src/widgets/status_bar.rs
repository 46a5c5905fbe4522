//! The status bar at the bottom of the screen.

use divedash_protocol::Breakpoint;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::dashboard::Phase;

/// What the status bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    /// Current phase.
    pub phase: Phase,
    /// Breakpoint of the terminal width.
    pub breakpoint: Breakpoint,
    /// Whether there are unsaved edits.
    pub modified: bool,
    /// Whether undo is available.
    pub can_undo: bool,
    /// Whether redo is available.
    pub can_redo: bool,
}

/// Renders the phase badge and breakpoint on the left and key hints on the
/// right.
pub fn render_status_bar(status: StatusLine, area: Rect, buf: &mut Buffer) {
    let badge_color = match status.phase {
        Phase::Loading => Color::DarkGray,
        Phase::Viewing => Color::Blue,
        Phase::Editing => Color::Yellow,
        Phase::Saving => Color::Magenta,
    };
    let mut left = vec![
        Span::styled(
            format!(" {} ", status.phase.label()),
            Style::default()
                .fg(Color::Black)
                .bg(badge_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", status.breakpoint),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if status.modified {
        left.push(Span::styled("modified", Style::default().fg(Color::Yellow)));
    }

    let hints: &[(&str, &str)] = match status.phase {
        Phase::Loading => &[("q", "quit")],
        Phase::Saving => &[("q", "quit after saving")],
        Phase::Viewing => &[("arrows", "select"), ("e", "edit"), ("q", "quit")],
        Phase::Editing => &[
            ("a", "add"),
            ("x", "remove"),
            ("c", "configure"),
            ("shift+arrows", "move"),
            ("ctrl+arrows", "resize"),
            ("u", "undo"),
            ("s", "save"),
            ("e", "cancel"),
        ],
    };
    let mut right = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        let disabled = (*action == "undo" && !status.can_undo)
            || (*action == "save" && !status.modified);
        let key_style = if disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Yellow)
        };
        right.push(Span::styled(*key, key_style));
        right.push(Span::styled(
            format!(" {action}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if status.phase == Phase::Editing && status.can_redo {
        right.push(Span::styled("ctrl+r", Style::default().fg(Color::Yellow)));
        right.push(Span::styled(" redo ", Style::default().fg(Color::DarkGray)));
    }

    let left_width =
        u16::try_from(left.iter().map(Span::width).sum::<usize>()).unwrap_or(u16::MAX);
    let [left_area, right_area] =
        Layout::horizontal([Constraint::Length(left_width), Constraint::Min(0)]).areas(area);
    Paragraph::new(Line::from(left)).render(left_area, buf);
    Paragraph::new(Line::from(right))
        .alignment(Alignment::Right)
        .render(right_area, buf);
}
