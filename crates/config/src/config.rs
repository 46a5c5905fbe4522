//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the divedash application.

use std::path::{Path, PathBuf};

use divedash_protocol::{GatePolicy, LazyPolicies, Role};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::history::HistoryConfig;
use crate::persistence::{find_config_file, read_config_file, user_data_dir, write_config_file};
use crate::store::is_valid_user;

/// Default user id when none is configured.
pub const DEFAULT_USER: &str = "local";

/// The main configuration struct for the divedash application.
///
/// # Examples
///
/// ```
/// use divedash_config::{Config, HistoryConfig};
/// use divedash_protocol::Role;
///
/// let config = Config::default();
/// assert_eq!(config.user, "local");
/// assert_eq!(config.role(), Role::Other);
///
/// let config = Config {
///     user: "mrojas".to_string(),
///     role: Some("supervisor".to_string()),
///     history: HistoryConfig::with_depth(20),
///     ..Default::default()
/// };
/// assert_eq!(config.role(), Role::Supervisor);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The user whose dashboard is shown.
    ///
    /// Also names the dashboard file, so it is restricted to letters,
    /// digits, `-`, `_` and `.`.
    #[serde(default = "default_user")]
    pub user: String,

    /// Role identifier, as issued by the account system.
    ///
    /// Unknown or missing roles get the generic layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Directory for stored dashboards and the log file.
    ///
    /// Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Undo history settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Lazy rendering policies per priority.
    #[serde(default)]
    pub lazy: LazyPolicies,
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: default_user(),
            role: None,
            data_dir: None,
            history: HistoryConfig::default(),
            lazy: LazyPolicies::default(),
        }
    }
}

impl Config {
    /// Creates a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations.
    ///
    /// If no configuration file is found, returns a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read, parsed or validated.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use divedash_config::Config;
    ///
    /// # async fn example() -> divedash_config::Result<()> {
    /// let config = Config::load().await?;
    /// println!("Dashboard of {}", config.user);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the user id cannot name a file, the history depth
    /// is out of range, or a lazy threshold is not a fraction.
    ///
    /// # Examples
    ///
    /// ```
    /// use divedash_config::Config;
    ///
    /// let mut config = Config::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.lazy.low.threshold = 1.5;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !is_valid_user(&self.user) {
            return Err(ConfigError::InvalidUser(self.user.clone()));
        }
        self.history.validate()?;
        validate_policy("high", self.lazy.high)?;
        validate_policy("normal", self.lazy.normal)?;
        validate_policy("low", self.lazy.low)?;
        Ok(())
    }

    /// Returns the configured role, [`Role::Other`] when unset.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
            .as_deref()
            .map_or(Role::Other, Role::from_identifier)
    }

    /// Returns the data directory, resolving the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the home directory
    /// cannot be determined.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => user_data_dir(),
        }
    }

    /// Returns the path of the log file.
    ///
    /// # Errors
    ///
    /// Same as [`data_dir`](Self::data_dir).
    pub fn log_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("divedash.log"))
    }
}

fn validate_policy(priority: &'static str, policy: GatePolicy) -> Result<()> {
    if !(0.0..=1.0).contains(&policy.threshold) {
        return Err(ConfigError::InvalidLazyPolicy {
            priority,
            reason: format!("threshold {} is outside 0.0..=1.0", policy.threshold),
        });
    }
    Ok(())
}
