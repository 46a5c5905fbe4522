//! Configuration management and dashboard storage for divedash.
//!
//! This crate handles loading, validating, and persisting configuration,
//! and storing each user's dashboard.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`history`]: Undo history depth
//! - [`persistence`]: Config file location, reading and writing
//! - [`store`]: Per-user dashboard records on disk or in memory
//! - [`error`]: Error types for configuration and storage
//!
//! # Configuration Sources (Priority)
//!
//! 1. Local config (`./divedash.json5` or `./divedash.json`)
//! 2. User config (`~/.config/divedash/config.json5` or `~/.config/divedash/config.json`)
//! 3. Built-in defaults
//!
//! ```json5
//! {
//!   user: "mrojas",
//!   role: "supervisor",
//!   history: { depth: 50 },
//!   // Heavy widgets further than one row away stay unrendered.
//!   lazy: { low: { threshold: 0.25, margin_rows: 1 } },
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use divedash_config::{Config, FileLayoutStore, LayoutStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load().await?;
//! let store = FileLayoutStore::from_config(&config)?;
//! if let Some(record) = store.load(&config.user).await? {
//!     println!("Stored dashboard version {}", record.version);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod persistence;
pub mod store;

// Re-export primary types at crate root for convenience
pub use config::Config;
pub use error::{ConfigError, Result, StoreError, StoreResult};
pub use history::HistoryConfig;
pub use store::{FileLayoutStore, LayoutStore, MemoryLayoutStore};
