//! Dashboard persistence.
//!
//! A [`LayoutStore`] loads and saves one dashboard record per user.
//! [`FileLayoutStore`] keeps them as JSON files under the data directory;
//! [`MemoryLayoutStore`] keeps them in process and can be told to fail,
//! which the shell's tests rely on.
//!
//! Records are always written in the current versioned format. Loading
//! returns the raw record; normalizing it against the widget catalog is
//! the caller's job.

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use divedash_protocol::{DashboardSnapshot, StoredDashboard};
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::{Result, StoreError, StoreResult};

/// Directory under the data directory holding dashboard files.
const DASHBOARDS_DIR: &str = "dashboards";

/// Returns `true` if the user id can safely name a file.
///
/// # Examples
///
/// ```
/// use divedash_config::store::is_valid_user;
///
/// assert!(is_valid_user("buzo-7"));
/// assert!(!is_valid_user("../root"));
/// ```
#[must_use]
pub fn is_valid_user(user: &str) -> bool {
    !user.is_empty()
        && !user.starts_with('.')
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Loads and saves per-user dashboard records.
pub trait LayoutStore: Send + Sync {
    /// Loads a user's record. `Ok(None)` means nothing is stored.
    fn load(&self, user: &str) -> impl Future<Output = StoreResult<Option<StoredDashboard>>> + Send;

    /// Saves a user's dashboard as a current-version record.
    fn save(
        &self,
        user: &str,
        snapshot: &DashboardSnapshot,
    ) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Stores one JSON file per user under `<root>/dashboards/`.
#[derive(Debug, Clone)]
pub struct FileLayoutStore {
    root: PathBuf,
}

impl FileLayoutStore {
    /// Creates a store rooted at a data directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a store rooted at the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.data_dir()?))
    }

    /// Returns the data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file holding a user's dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidUser`] if the id cannot name a file.
    pub fn path_for(&self, user: &str) -> StoreResult<PathBuf> {
        if !is_valid_user(user) {
            return Err(StoreError::InvalidUser(user.to_string()));
        }
        Ok(self.root.join(DASHBOARDS_DIR).join(format!("{user}.json")))
    }
}

impl LayoutStore for FileLayoutStore {
    #[instrument(skip(self))]
    async fn load(&self, user: &str) -> StoreResult<Option<StoredDashboard>> {
        let path = self.path_for(user)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No stored dashboard");
                return Ok(None);
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        match StoredDashboard::from_json(&content) {
            Ok(record) => {
                debug!(version = record.version, "Loaded dashboard");
                Ok(Some(record))
            }
            Err(source) => {
                warn!(path = %path.display(), error = %source, "Stored dashboard is corrupt");
                Err(StoreError::Corrupt { path, source })
            }
        }
    }

    #[instrument(skip(self, snapshot))]
    async fn save(&self, user: &str, snapshot: &DashboardSnapshot) -> StoreResult<()> {
        let path = self.path_for(user)?;
        let content = StoredDashboard::from_snapshot(snapshot).to_json()?;
        let write_err = |path: &Path, source: std::io::Error| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_err(parent, e))?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| write_err(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| write_err(&path, e))?;

        debug!(path = %path.display(), "Saved dashboard");
        Ok(())
    }
}

/// Keeps records in memory.
///
/// Loads and saves can be made to fail to exercise error paths.
///
/// # Examples
///
/// ```
/// use divedash_config::store::{LayoutStore, MemoryLayoutStore};
/// use divedash_protocol::DashboardSnapshot;
///
/// # async fn example() {
/// let store = MemoryLayoutStore::new();
/// store.save("local", &DashboardSnapshot::default()).await.unwrap();
/// assert!(store.load("local").await.unwrap().is_some());
///
/// store.fail_saves(true);
/// assert!(store.save("local", &DashboardSnapshot::default()).await.is_err());
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryLayoutStore {
    records: Mutex<HashMap<String, StoredDashboard>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryLayoutStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding one record.
    #[must_use]
    pub fn with_record(user: impl Into<String>, record: StoredDashboard) -> Self {
        let store = Self::new();
        store.records().insert(user.into(), record);
        store
    }

    /// Makes subsequent loads fail (or succeed again).
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent saves fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Returns the stored record of a user.
    #[must_use]
    pub fn record(&self, user: &str) -> Option<StoredDashboard> {
        self.records().get(user).cloned()
    }

    /// Returns the number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredDashboard>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LayoutStore for MemoryLayoutStore {
    async fn load(&self, user: &str) -> StoreResult<Option<StoredDashboard>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("load refused".to_string()));
        }
        Ok(self.record(user))
    }

    async fn save(&self, user: &str, snapshot: &DashboardSnapshot) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("save refused".to_string()));
        }
        let record = StoredDashboard::from_snapshot(snapshot);
        self.records().insert(user.to_string(), record);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use divedash_protocol::{
        Breakpoint, CURRENT_VERSION, LayoutItem, LayoutSet, StoredLayout, WidgetConfigMap,
    };
    use serde_json::json;
    use tempfile::TempDir;

    fn snapshot() -> DashboardSnapshot {
        let mut widgets = WidgetConfigMap::new();
        widgets.upsert("weather", json!({"units": "imperial"}));
        DashboardSnapshot::new(
            LayoutSet::with_lg(vec![
                LayoutItem::new("quick-actions", 0, 0, 12, 2).pinned(),
                LayoutItem::new("weather", 0, 2, 4, 6),
            ]),
            widgets,
        )
    }

    #[tokio::test]
    async fn file_store_roundtrip() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileLayoutStore::new(dir.path());

        assert!(store.load("buzo-7").await.expect("load").is_none());
        store.save("buzo-7", &snapshot()).await.expect("save");

        let record = store.load("buzo-7").await.expect("load").expect("record");
        assert_eq!(record.version, CURRENT_VERSION);
        assert!(record.saved_at.is_some());
        assert_eq!(record.widgets, snapshot().widgets);
        let Some(StoredLayout::Breakpoints(map)) = record.layout else {
            panic!("expected breakpoint map");
        };
        assert_eq!(map["lg"][0]["static"], json!(true));
        assert!(!dir.path().join("dashboards/buzo-7.json.tmp").exists());
    }

    #[tokio::test]
    async fn file_store_reads_legacy_records() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileLayoutStore::new(dir.path());
        let path = store.path_for("local").expect("path");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(
            &path,
            r#"{"layout": [{"i": "kpi-cards", "x": 0, "y": 0, "w": 12, "h": 4}], "widgets": {}}"#,
        )
        .expect("write");

        let record = store.load("local").await.expect("load").expect("record");
        assert!(record.is_legacy());
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_records() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileLayoutStore::new(dir.path());
        let path = store.path_for("local").expect("path");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "{ not json").expect("write");

        assert!(matches!(
            store.load("local").await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn file_store_rejects_path_like_users() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileLayoutStore::new(dir.path());
        assert!(matches!(
            store.save("../escape", &snapshot()).await,
            Err(StoreError::InvalidUser(_))
        ));
    }

    #[tokio::test]
    async fn memory_store_failure_injection() {
        let store = MemoryLayoutStore::new();
        store.fail_loads(true);
        assert!(store.load("local").await.is_err());
        store.fail_loads(false);
        assert!(store.load("local").await.expect("load").is_none());

        store.fail_saves(true);
        assert!(store.save("local", &snapshot()).await.is_err());
        assert_eq!(store.save_count(), 0);
        store.fail_saves(false);
        store.save("local", &snapshot()).await.expect("save");
        assert_eq!(store.save_count(), 1);

        let record = store.record("local").expect("record");
        let Some(StoredLayout::Breakpoints(map)) = record.layout else {
            panic!("expected breakpoint map");
        };
        assert!(map.contains_key(Breakpoint::Lg.name()));
    }
}
