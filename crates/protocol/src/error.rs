//! Error types for the divedash-protocol crate.
//!
//! This module defines the errors that can occur when working with protocol
//! types, including serialization failures and unknown names.

use thiserror::Error;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Failed to serialize a protocol type to JSON.
    #[error("failed to serialize to JSON: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    /// Failed to deserialize a protocol type from JSON.
    #[error("failed to deserialize from JSON: {0}")]
    DeserializationFailed(#[source] serde_json::Error),

    /// A breakpoint name is not one of `lg`, `md`, `sm`, `xs`, `xxs`.
    #[error("unknown breakpoint: {0}")]
    UnknownBreakpoint(String),
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
