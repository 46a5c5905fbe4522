//! Dashboard layout engine for divedash.
//!
//! This crate holds everything that decides *where* widgets go and *whether*
//! they render, independent of any presentation:
//!
//! - [`registry`]: The immutable widget catalog
//! - [`normalize`](mod@normalize): Turning stored layouts into clean layout sets
//! - [`defaults`]: Per-role default layouts and breakpoint derivation
//! - [`compact`]: Deterministic vertical compaction
//! - [`manager`]: Structural mutations (add, remove, configure, move, resize)
//! - [`history`]: Undo/redo and edit sessions
//! - [`lazy`]: The lazy rendering gate
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use divedash_layout::{EditSession, LayoutManager, WidgetRegistry, defaults_for, normalize};
//! use divedash_protocol::{Breakpoint, Role};
//!
//! let registry = Arc::new(WidgetRegistry::builtin());
//! let role_default = defaults_for(Role::Supervisor);
//! let layouts = normalize(None, &role_default, &registry);
//!
//! let mut manager = LayoutManager::new(Arc::clone(&registry));
//! manager.set_breakpoint_layouts(layouts);
//!
//! let mut session = EditSession::new(manager, 50);
//! session.begin_edit();
//! session.remove_widget("weather").unwrap();
//! session.rollback();
//! assert!(session.manager().layouts().contains_widget("weather"));
//! ```

mod catalog;
pub mod compact;
pub mod defaults;
pub mod error;
pub mod history;
pub mod lazy;
pub mod manager;
pub mod normalize;
pub mod registry;

// Re-export primary types at crate root for convenience
pub use compact::{compact_set, compact_vertical};
pub use defaults::{defaults_for, derive_breakpoints, lg_defaults};
pub use error::{LayoutError, Result};
pub use history::{DEFAULT_DEPTH, EditSession, History, HistoryPhase};
pub use lazy::{LazyGate, intersection_ratio};
pub use manager::{DashboardState, LayoutManager};
pub use normalize::normalize;
pub use registry::{
    ConfigEditor, ConfigField, ConfigSchema, FieldKind, Size, Visibility, WidgetConfigSpec,
    WidgetDefinition, WidgetRegistry,
};
