//! Shared protocol types for the divedash application.
//!
//! This crate defines the core types used across all divedash components:
//! breakpoints, layout items and sets, widget configuration, user roles, the
//! persisted dashboard record, and the messages exchanged between the input
//! handler and the dashboard shell.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`breakpoint`]: Responsive breakpoints and their column counts
//! - [`layout`]: Layout items, per-breakpoint layout sets, widget configuration
//! - [`role`]: User roles as supplied by the role resolver
//! - [`render`]: Rendering priority and lazy-gate policies
//! - [`wire`]: The persisted dashboard record, legacy and current
//! - [`message`]: Dashboard event messages
//! - [`error`]: Error types for protocol operations
//!
//! # Examples
//!
//! ```
//! use divedash_protocol::{Breakpoint, DashboardSnapshot, LayoutItem, LayoutSet, StoredDashboard};
//!
//! let mut layouts = LayoutSet::new();
//! layouts.insert(Breakpoint::Lg, vec![LayoutItem::new("kpi-cards", 0, 0, 12, 4)]);
//!
//! let snapshot = DashboardSnapshot::new(layouts, Default::default());
//! let record = StoredDashboard::from_snapshot(&snapshot);
//! assert!(!record.is_legacy());
//! ```

pub mod breakpoint;
pub mod error;
pub mod layout;
pub mod message;
pub mod render;
pub mod role;
pub mod wire;

// Re-export primary types at crate root for convenience
pub use breakpoint::Breakpoint;
pub use error::{ProtocolError, Result};
pub use layout::{DashboardSnapshot, LayoutItem, LayoutSet, WidgetConfigMap, WidgetId};
pub use message::Message;
pub use render::{GatePolicy, LazyPolicies, Priority};
pub use role::Role;
pub use wire::{CURRENT_VERSION, StoredDashboard, StoredLayout};
