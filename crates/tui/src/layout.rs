//! Centralized layout measurements for the TUI.
//!
//! Grid rows and columns are abstract cells; these constants decide how
//! many terminal cells each one takes.

/// Height of the header bar in rows.
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the status bar in rows.
pub const STATUS_HEIGHT: u16 = 1;

/// Terminal rows per grid row.
pub const ROW_HEIGHT: u16 = 2;

/// Minimum terminal height for useful rendering.
///
/// Room for the status bar and at least one tile of three grid rows.
pub const MIN_HEIGHT: u16 = STATUS_HEIGHT + 3 * ROW_HEIGHT + 1;

/// Minimum terminal height for rendering with the header.
///
/// Between `MIN_HEIGHT` and this, the header is hidden to give the grid
/// its rows.
pub const MIN_HEIGHT_WITH_HEADER: u16 = MIN_HEIGHT + HEADER_HEIGHT + 4;

/// Minimum terminal width for useful rendering.
///
/// The narrowest grid has two columns; each needs room for a bordered
/// title.
pub const MIN_WIDTH: u16 = 40;

/// Returns how many grid rows fit in a height of terminal rows.
#[must_use]
pub const fn visible_rows(height: u16) -> u16 {
    height / ROW_HEIGHT
}
