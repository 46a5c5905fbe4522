//! Error types for layout operations.
//!
//! Most of these are rejections rather than failures: the operation was a
//! no-op and the dashboard state is unchanged.

use thiserror::Error;

/// Errors that can occur during layout operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The widget id is not in the registry.
    #[error("unknown widget: {0}")]
    UnknownWidget(String),

    /// The widget is already placed on the dashboard.
    #[error("widget already on the dashboard: {0}")]
    DuplicateWidget(String),

    /// The widget has no configuration editor.
    #[error("widget has no configuration: {0}")]
    ConfigWithoutEditor(String),

    /// The widget is not placed on the dashboard.
    #[error("widget not on the dashboard: {0}")]
    NotPlaced(String),

    /// The widget is static and cannot be moved, resized or removed.
    #[error("widget is pinned: {0}")]
    StaticWidget(String),

    /// Two registry definitions share an id.
    #[error("duplicate widget definition: {0}")]
    DuplicateDefinition(String),

    /// A configuration blob does not match the widget's schema.
    #[error("invalid configuration for {widget}: {reason}")]
    InvalidConfig {
        /// The widget being configured.
        widget: String,
        /// What is wrong with the blob.
        reason: String,
    },
}

/// A specialized Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = LayoutError::DuplicateWidget("weather".to_string());
        assert_eq!(err.to_string(), "widget already on the dashboard: weather");

        let err = LayoutError::InvalidConfig {
            widget: "notifications".to_string(),
            reason: "expected an object".to_string(),
        };
        assert!(err.to_string().contains("notifications"));
    }
}
