//! Rendering functions for the dashboard TUI.
//!
//! Each widget is a plain function that draws a piece of state into a
//! buffer, which keeps them easy to test and compose.
//!
//! # Modules
//!
//! - [`grid`]: The dashboard grid and its tiles
//! - [`catalog`]: The list of widgets that can be added
//! - [`dialog`]: Confirmation before removing a widget
//! - [`sheet`]: A widget's configuration sheet
//! - [`status_bar`]: Phase, breakpoint and key hints
//! - [`notices`]: Transient notifications
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use divedash_config::Config;
//! use divedash_layout::WidgetRegistry;
//! use divedash_protocol::Breakpoint;
//! use divedash_tui::Dashboard;
//! use divedash_tui::widgets::{GridView, render_grid};
//! use ratatui::buffer::Buffer;
//! use ratatui::layout::Rect;
//!
//! let mut dashboard = Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &Config::default());
//! dashboard.seed(Ok(None));
//!
//! let area = Rect::new(0, 0, 160, 40);
//! let mut buf = Buffer::empty(area);
//! let view = GridView { columns: Breakpoint::Lg.columns(), ..GridView::default() };
//! render_grid(&dashboard.tiles(Breakpoint::Lg), view, area, &mut buf);
//! ```

pub mod catalog;
pub mod dialog;
pub mod grid;
pub mod notices;
pub mod sheet;
pub mod status_bar;

use ratatui::layout::Rect;
use serde_json::Value;

// Re-export primary rendering functions for convenience
pub use catalog::render_catalog;
pub use dialog::render_confirm_remove;
pub use grid::{GridView, render_grid, render_tile, tile_rect};
pub use notices::render_notices;
pub use sheet::render_config_sheet;
pub use status_bar::{StatusLine, render_status_bar};

/// Calculates a centered rectangle within the given area.
///
/// The size is clamped to the area.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let popup_width = width.min(area.width);
    let popup_height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    Rect::new(x, y, popup_width, popup_height)
}

/// Formats a configuration value for display.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Bool(true) => "on".to_string(),
        Value::Bool(false) => "off".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
