//! Configuration file reading and writing.
//!
//! # File Formats
//!
//! Configuration is read as JSON5, which also accepts plain JSON, and
//! written back as pretty-printed JSON.
//!
//! # File Locations
//!
//! Configuration is searched in the following order:
//!
//! 1. Local: `./divedash.json5` or `./divedash.json`
//! 2. User: `~/.config/divedash/config.json5` or `~/.config/divedash/config.json`
//!
//! Dashboards and the log file live under the data directory, by default
//! `~/.local/share/divedash/` on Linux.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, Result};

/// Configuration file names to search for, in priority order.
const CONFIG_FILE_NAMES: &[&str] = &["divedash.json5", "divedash.json"];

/// User config and data directory name.
const APP_DIR: &str = "divedash";

/// User config file names to search for, in priority order.
const USER_CONFIG_FILE_NAMES: &[&str] = &["config.json5", "config.json"];

/// Finds the configuration file path.
///
/// Searches the working directory first, then the user config directory.
///
/// # Examples
///
/// ```no_run
/// use divedash_config::persistence::find_config_file;
///
/// if let Some(path) = find_config_file() {
///     println!("Found config at: {}", path.display());
/// }
/// ```
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    let user_dir = dirs::config_dir().map(|d| d.join(APP_DIR));
    find_config_file_in(Path::new("."), user_dir.as_deref())
}

/// Finds the configuration file in explicit local and user directories.
///
/// Returns the first existing candidate, local names before user names.
#[must_use]
pub fn find_config_file_in(local_dir: &Path, user_dir: Option<&Path>) -> Option<PathBuf> {
    let local = CONFIG_FILE_NAMES.iter().map(|name| local_dir.join(name));
    let user = user_dir
        .into_iter()
        .flat_map(|dir| USER_CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)));

    let found = local.chain(user).find(|path| path.exists());
    if let Some(path) = &found {
        debug!(path = %path.display(), "Found config file");
    }
    found
}

/// Returns the default data directory for dashboards and logs.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn user_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Reads and parses a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content cannot be
/// parsed.
///
/// # Examples
///
/// ```no_run
/// use divedash_config::persistence::read_config_file;
/// use divedash_config::Config;
///
/// # fn main() -> divedash_config::Result<()> {
/// let config: Config = read_config_file("divedash.json5")?;
/// # Ok(())
/// # }
/// ```
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    // JSON5 parser handles both JSON5 and JSON
    serde_json5::from_str(&content).map_err(ConfigError::from)
}

/// Writes a configuration to a file as pretty-printed JSON.
///
/// Parent directories are created as needed. The file is replaced
/// atomically through a sibling temporary file.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized or the file
/// cannot be written.
pub fn write_config_file<T: serde::Serialize>(path: impl AsRef<Path>, config: &T) -> Result<()> {
    let path = path.as_ref();
    let write_err = |e: std::io::Error| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        user: String,
        depth: u32,
    }

    #[test]
    fn read_json5_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("prefs.json5");
        std::fs::write(
            &path,
            r#"
            {
                // the supervisor on shift
                user: "mrojas",
                depth: 20,
            }
            "#,
        )
        .expect("write");

        let prefs: Prefs = read_config_file(&path).expect("read");
        assert_eq!(prefs.user, "mrojas");
        assert_eq!(prefs.depth, 20);
    }

    #[test]
    fn read_invalid_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "user = mrojas").expect("write");

        let result: Result<Prefs> = read_config_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseJson5(_))));

        let missing: Result<Prefs> = read_config_file(dir.path().join("absent.json"));
        assert!(matches!(missing, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn write_creates_parents_and_roundtrips() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("config.json");
        let prefs = Prefs {
            user: "buzo-7".to_string(),
            depth: 50,
        };

        write_config_file(&path, &prefs).expect("write");
        let loaded: Prefs = read_config_file(&path).expect("read");
        assert_eq!(loaded, prefs);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn local_file_wins_over_user_file() {
        let local = TempDir::new().expect("tempdir");
        let user = TempDir::new().expect("tempdir");
        std::fs::write(user.path().join("config.json5"), "{}").expect("write");

        let found = find_config_file_in(local.path(), Some(user.path()));
        assert_eq!(found, Some(user.path().join("config.json5")));

        std::fs::write(local.path().join("divedash.json"), "{}").expect("write");
        let found = find_config_file_in(local.path(), Some(user.path()));
        assert_eq!(found, Some(local.path().join("divedash.json")));
    }

    #[test]
    fn json5_preferred_over_json() {
        let local = TempDir::new().expect("tempdir");
        std::fs::write(local.path().join("divedash.json"), "{}").expect("write");
        std::fs::write(local.path().join("divedash.json5"), "{}").expect("write");

        let found = find_config_file_in(local.path(), None);
        assert_eq!(found, Some(local.path().join("divedash.json5")));
    }

    #[test]
    fn nothing_found() {
        let local = TempDir::new().expect("tempdir");
        assert_eq!(find_config_file_in(local.path(), None), None);
    }
}
