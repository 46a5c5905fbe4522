//! Logging initialization.
//!
//! The terminal belongs to the dashboard, so logs go to a file under the
//! data directory. Filter directives come from `DIVEDASH_LOG` and default
//! to `warn`.
//!
//! ```bash
//! DIVEDASH_LOG=debug divedash
//! DIVEDASH_LOG=divedash_tui=debug,warn divedash
//! ```

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "DIVEDASH_LOG";

/// Returns the filter from `DIVEDASH_LOG`, or `warn` when it is unset or
/// invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initializes the tracing subscriber, appending to the file at `path`.
///
/// # Errors
///
/// Returns an error if the log file or its directory cannot be created, or
/// if a global subscriber is already set.
pub fn init(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}
