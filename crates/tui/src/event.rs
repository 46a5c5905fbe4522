//! Event handling and key mappings.
//!
//! Terminal events are turned into [`Message`]s. Which keys mean what
//! depends on what has focus: the grid, a list overlay, or the
//! configuration sheet.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use divedash_protocol::Message;

/// Default poll timeout for events.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Grid rows scrolled per mouse wheel notch.
const WHEEL_ROWS: i16 = 2;

/// Grid rows scrolled per page key.
const PAGE_ROWS: i16 = 8;

/// What receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// The dashboard grid.
    Grid,
    /// The catalog or the remove confirmation.
    List,
    /// The configuration sheet.
    Sheet {
        /// Whether the highlighted field takes typed text.
        text_field: bool,
    },
}

/// Polls for a terminal event with the default timeout.
///
/// Returns `None` if the timeout expires without an event.
///
/// # Errors
///
/// Returns an error if polling the terminal fails.
pub fn poll_event() -> std::io::Result<Option<Event>> {
    if event::poll(POLL_TIMEOUT)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Converts a terminal event to a message for the given context.
///
/// Key releases and unbound keys yield `None`. The mouse wheel scrolls the
/// grid.
#[must_use]
pub fn event_to_message(event: &Event, context: InputContext) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Release => None,
        Event::Key(key) => match context {
            InputContext::Grid => key_to_message(*key),
            InputContext::List => key_to_list_message(*key),
            InputContext::Sheet { text_field } => key_to_sheet_message(*key, text_field),
        },
        Event::Mouse(mouse) if context == InputContext::Grid => match mouse.kind {
            MouseEventKind::ScrollUp => Some(Message::Scroll { delta: -WHEEL_ROWS }),
            MouseEventKind::ScrollDown => Some(Message::Scroll { delta: WHEEL_ROWS }),
            _ => None,
        },
        _ => None,
    }
}

fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Converts a key press on the grid to a message.
///
/// # Key Bindings
///
/// | Key | Action |
/// |-----|--------|
/// | `Ctrl+C` or `q` | Quit |
/// | `Esc` | Cancel editing or clear selection |
/// | Arrows | Select neighbouring widget |
/// | `Shift` + arrows | Move selected widget |
/// | `Ctrl` + arrows | Resize selected widget |
/// | `PageUp` / `PageDown` | Scroll |
/// | `Enter` or `Space` | Configure selected widget (edit mode) |
/// | `e` | Toggle edit mode |
/// | `s` | Save |
/// | `a` | Add widget |
/// | `x` or `Delete` | Remove selected widget |
/// | `c` | Configure selected widget |
/// | `u` | Undo |
/// | `Ctrl+R` | Redo |
/// | `R` | Reset to the role default |
#[must_use]
pub fn key_to_message(key: KeyEvent) -> Option<Message> {
    if is_ctrl_c(key) {
        return Some(Message::Quit);
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('r') => Some(Message::Redo),
            KeyCode::Left => Some(Message::ResizeItem { dw: -1, dh: 0 }),
            KeyCode::Right => Some(Message::ResizeItem { dw: 1, dh: 0 }),
            KeyCode::Up => Some(Message::ResizeItem { dw: 0, dh: -1 }),
            KeyCode::Down => Some(Message::ResizeItem { dw: 0, dh: 1 }),
            _ => None,
        };
    }

    if key.modifiers.contains(KeyModifiers::SHIFT) {
        match key.code {
            KeyCode::Left => return Some(Message::MoveItem { dx: -1, dy: 0 }),
            KeyCode::Right => return Some(Message::MoveItem { dx: 1, dy: 0 }),
            KeyCode::Up => return Some(Message::MoveItem { dx: 0, dy: -1 }),
            KeyCode::Down => return Some(Message::MoveItem { dx: 0, dy: 1 }),
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('q') => Some(Message::Quit),
        KeyCode::Esc => Some(Message::Escape),

        KeyCode::Left => Some(Message::NavigateLeft),
        KeyCode::Right => Some(Message::NavigateRight),
        KeyCode::Up => Some(Message::NavigateUp),
        KeyCode::Down => Some(Message::NavigateDown),
        KeyCode::PageUp => Some(Message::Scroll { delta: -PAGE_ROWS }),
        KeyCode::PageDown => Some(Message::Scroll { delta: PAGE_ROWS }),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Message::Select),

        KeyCode::Char('e') => Some(Message::ToggleEdit),
        KeyCode::Char('s') => Some(Message::Save),
        KeyCode::Char('a') => Some(Message::OpenCatalog),
        KeyCode::Char('x') | KeyCode::Delete => Some(Message::RequestRemove),
        KeyCode::Char('c') => Some(Message::Configure),
        KeyCode::Char('u') => Some(Message::Undo),
        KeyCode::Char('R') => Some(Message::Reset),

        _ => None,
    }
}

/// Converts a key press on the catalog or confirmation dialog.
///
/// Up and down move the highlight, `Enter` (or `y`) confirms and `Esc`
/// (or `n`) closes.
#[must_use]
pub fn key_to_list_message(key: KeyEvent) -> Option<Message> {
    if is_ctrl_c(key) {
        return Some(Message::Quit);
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('n') => Some(Message::Escape),
        KeyCode::Up => Some(Message::NavigateUp),
        KeyCode::Down => Some(Message::NavigateDown),
        KeyCode::Enter | KeyCode::Char('y') => Some(Message::Select),
        _ => None,
    }
}

/// Converts a key press on the configuration sheet.
///
/// On a text field every printable key is typed into the field; elsewhere
/// `Space` and `s` step and save.
#[must_use]
pub fn key_to_sheet_message(key: KeyEvent, text_field: bool) -> Option<Message> {
    if is_ctrl_c(key) {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Esc => Some(Message::Escape),
        KeyCode::Up => Some(Message::NavigateUp),
        KeyCode::Down => Some(Message::NavigateDown),
        KeyCode::Left => Some(Message::SheetAdjust { delta: -1 }),
        KeyCode::Right => Some(Message::SheetAdjust { delta: 1 }),
        KeyCode::Enter => Some(Message::SheetSave),
        KeyCode::Backspace if text_field => Some(Message::SheetBackspace),
        KeyCode::Char(ch) if text_field && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Message::SheetInput { ch })
        }
        KeyCode::Char(' ') => Some(Message::SheetAdjust { delta: 1 }),
        KeyCode::Char('s') => Some(Message::SheetSave),
        _ => None,
    }
}
