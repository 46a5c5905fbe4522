//! Undo history configuration.
//!
//! Every edit keeps a full snapshot of the dashboard on the undo stack, so
//! the depth bounds memory use per edit session.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default number of undo steps.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Minimum allowed history depth.
pub const MIN_HISTORY_DEPTH: usize = 1;

/// Maximum allowed history depth.
pub const MAX_HISTORY_DEPTH: usize = 500;

/// Configuration of the undo history.
///
/// # Examples
///
/// ```
/// use divedash_config::HistoryConfig;
///
/// let config = HistoryConfig::default();
/// assert_eq!(config.depth, 50);
/// assert!(HistoryConfig::with_depth(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept per edit session.
    #[serde(default = "default_depth")]
    pub depth: usize,
}

fn default_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

impl HistoryConfig {
    /// Creates a history configuration with the given depth.
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        Self { depth }
    }

    /// Validates the depth.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHistoryDepth`] if the depth is outside
    /// `MIN_HISTORY_DEPTH..=MAX_HISTORY_DEPTH`.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_HISTORY_DEPTH..=MAX_HISTORY_DEPTH).contains(&self.depth) {
            return Err(ConfigError::InvalidHistoryDepth {
                reason: format!(
                    "{} is outside {MIN_HISTORY_DEPTH}..={MAX_HISTORY_DEPTH}",
                    self.depth
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert!(HistoryConfig::with_depth(MIN_HISTORY_DEPTH).validate().is_ok());
        assert!(HistoryConfig::with_depth(MAX_HISTORY_DEPTH).validate().is_ok());
        assert!(HistoryConfig::with_depth(MAX_HISTORY_DEPTH + 1).validate().is_err());
    }

    #[test]
    fn missing_depth_uses_default() {
        let config: HistoryConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config, HistoryConfig::default());
    }
}
