//! Error types for configuration and dashboard storage.
//!
//! This module defines the errors that can occur while loading, parsing,
//! and validating configuration ([`ConfigError`]) and while reading or
//! writing stored dashboards ([`StoreError`]).

use std::path::PathBuf;

use divedash_protocol::ProtocolError;

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a configuration file.
    #[error("failed to write config file at {path}: {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON5 configuration.
    #[error("failed to parse config: {0}")]
    ParseJson5(#[from] serde_json5::Error),

    /// Failed to serialize configuration to JSON.
    #[error("failed to serialize config: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// The user id cannot name a dashboard file.
    #[error("invalid user id: {0:?}")]
    InvalidUser(String),

    /// Invalid undo history depth.
    #[error("invalid history depth: {reason}")]
    InvalidHistoryDepth {
        /// The reason the depth is invalid.
        reason: String,
    },

    /// Invalid lazy rendering policy.
    #[error("invalid lazy policy for {priority} priority: {reason}")]
    InvalidLazyPolicy {
        /// The priority the policy applies to.
        priority: &'static str,
        /// The reason the policy is invalid.
        reason: String,
    },

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading or saving a dashboard.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to read a stored dashboard.
    #[error("failed to read dashboard at {path}: {source}")]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a stored dashboard.
    #[error("failed to write dashboard at {path}: {source}")]
    Write {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A stored dashboard is not a valid record.
    #[error("corrupt dashboard record at {path}: {source}")]
    Corrupt {
        /// The path of the record.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: ProtocolError,
    },

    /// Failed to serialize a dashboard record.
    #[error(transparent)]
    Serialize(#[from] ProtocolError),

    /// The user id cannot name a dashboard file.
    #[error("invalid user id: {0:?}")]
    InvalidUser(String),

    /// The store refused the operation.
    #[error("dashboard store unavailable: {0}")]
    Unavailable(String),
}

/// A specialized Result type for dashboard storage.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
