//! Terminal UI for the divedash dashboard.
//!
//! This crate provides a Ratatui-based shell around the layout engine:
//! it loads a user's dashboard, draws it at the breakpoint of the terminal
//! width, and drives edit sessions down to the store.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`app`]: Main application struct and run loop
//! - [`dashboard`]: Phases, selection, overlays and edit actions
//! - [`config_sheet`]: State of a widget's configuration sheet
//! - [`notice`]: Transient notifications
//! - [`terminal`]: Terminal setup, teardown, and panic handling
//! - [`event`]: Event handling and key mappings
//! - [`widgets`]: Rendering functions
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use divedash_config::{Config, FileLayoutStore};
//! use divedash_layout::WidgetRegistry;
//! use divedash_tui::{App, Dashboard, terminal};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load().await?;
//!     let store = Arc::new(FileLayoutStore::from_config(&config)?);
//!     let dashboard = Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &config);
//!
//!     terminal::install_panic_hook();
//!     let mut terminal = terminal::setup_terminal()?;
//!     let mut app = App::new(dashboard, store, &config.user);
//!     let result = app.run(&mut terminal).await;
//!
//!     terminal::restore_terminal(&mut terminal)?;
//!     result
//! }
//! ```

pub mod app;
pub mod config_sheet;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod layout;
pub mod notice;
pub mod terminal;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export primary types at crate root for convenience
pub use app::App;
pub use config_sheet::ConfigSheet;
pub use dashboard::{Dashboard, Direction, Overlay, Phase, Tile, Viewport};
pub use error::{Result, ShellError};
pub use notice::{Notice, NoticeLevel};
