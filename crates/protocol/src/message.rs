//! Dashboard message types for event handling.
//!
//! This module defines the message enum used for communication between
//! the terminal input handler and the dashboard shell.

use serde::{Deserialize, Serialize};

/// Messages that represent user actions on the dashboard.
///
/// These messages are produced by the input handler and consumed by the
/// dashboard shell. Which ones take effect depends on the shell's phase and
/// on the overlay currently open.
///
/// # Examples
///
/// ```
/// use divedash_protocol::Message;
///
/// let msg = Message::MoveItem { dx: 1, dy: 0 };
/// assert!(msg.is_layout_edit());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Select the previous tile, or the previous entry of an open list.
    NavigateUp,
    /// Select the next tile, or the next entry of an open list.
    NavigateDown,
    /// Select the tile to the left.
    NavigateLeft,
    /// Select the tile to the right.
    NavigateRight,
    /// Scroll the grid by the given number of rows.
    Scroll {
        /// Rows to scroll (positive = down).
        delta: i16,
    },
    /// Activate the highlighted entry (add from catalog, confirm dialog).
    Select,
    /// Close the open overlay, or cancel editing.
    Escape,
    /// Quit the application.
    Quit,

    // --- Edit mode ---
    /// Enter edit mode, or cancel it when already editing.
    ToggleEdit,
    /// Persist the current layout and leave edit mode.
    Save,
    /// Undo the last edit.
    Undo,
    /// Redo the last undone edit.
    Redo,
    /// Replace the layout with the role's default layout.
    Reset,
    /// Open the widget catalog.
    OpenCatalog,
    /// Ask to remove the selected widget.
    RequestRemove,
    /// Open the configuration sheet of the selected widget.
    Configure,
    /// Move the selected item by whole grid cells.
    MoveItem {
        /// Columns to move (positive = right).
        dx: i16,
        /// Rows to move (positive = down).
        dy: i16,
    },
    /// Resize the selected item by whole grid cells.
    ResizeItem {
        /// Columns to add (negative shrinks).
        dw: i16,
        /// Rows to add (negative shrinks).
        dh: i16,
    },

    // --- Configuration sheet ---
    /// Step the highlighted field's value (toggle, number, choice).
    SheetAdjust {
        /// Direction of the step.
        delta: i16,
    },
    /// Type a character into the highlighted text field.
    SheetInput {
        /// The character typed.
        ch: char,
    },
    /// Delete the last character of the highlighted text field.
    SheetBackspace,
    /// Commit the sheet's configuration.
    SheetSave,
}

impl Message {
    /// Returns `true` if this message should terminate the application.
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Quit)
    }

    /// Returns `true` if this message changes the layout or widget
    /// configuration, and therefore only applies in edit mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use divedash_protocol::Message;
    ///
    /// assert!(Message::Reset.is_layout_edit());
    /// assert!(Message::Undo.is_layout_edit());
    /// assert!(!Message::ToggleEdit.is_layout_edit());
    /// ```
    #[must_use]
    pub fn is_layout_edit(&self) -> bool {
        matches!(
            self,
            Self::Undo
                | Self::Redo
                | Self::Reset
                | Self::OpenCatalog
                | Self::RequestRemove
                | Self::Configure
                | Self::MoveItem { .. }
                | Self::ResizeItem { .. }
        )
    }

    /// Returns `true` if this message targets the configuration sheet.
    #[must_use]
    pub fn is_sheet(&self) -> bool {
        matches!(
            self,
            Self::SheetAdjust { .. } | Self::SheetInput { .. } | Self::SheetBackspace | Self::SheetSave
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_terminating_detection() {
        assert!(Message::Quit.is_terminating());
        assert!(!Message::Escape.is_terminating());
        assert!(!Message::Save.is_terminating());
    }

    #[test]
    fn message_layout_edit_detection() {
        assert!(Message::MoveItem { dx: 0, dy: 1 }.is_layout_edit());
        assert!(Message::ResizeItem { dw: 1, dh: 0 }.is_layout_edit());
        assert!(Message::RequestRemove.is_layout_edit());
        assert!(Message::Configure.is_layout_edit());
        assert!(!Message::Save.is_layout_edit());
        assert!(!Message::SheetSave.is_layout_edit());
    }

    #[test]
    fn message_sheet_detection() {
        assert!(Message::SheetAdjust { delta: 1 }.is_sheet());
        assert!(Message::SheetInput { ch: 'a' }.is_sheet());
        assert!(Message::SheetBackspace.is_sheet());
        assert!(Message::SheetSave.is_sheet());
        assert!(!Message::Save.is_sheet());
    }

    #[test]
    fn message_json_format() {
        let json = serde_json::to_string(&Message::ToggleEdit).expect("serialize");
        assert_eq!(json, r#""toggle_edit""#);

        let json = serde_json::to_string(&Message::MoveItem { dx: -1, dy: 2 }).expect("serialize");
        assert_eq!(json, r#"{"move_item":{"dx":-1,"dy":2}}"#);
    }
}
