//! divedash - an operations console dashboard for diving and aquaculture
//! field work.
//!
//! This is the main binary that launches the TUI application.

mod logging;

use std::sync::Arc;

use divedash_config::{Config, FileLayoutStore};
use divedash_layout::WidgetRegistry;
use divedash_tui::{App, Dashboard, terminal};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().await?;
    logging::init(&config.log_path()?)?;
    info!(user = %config.user, role = config.role().identifier(), "Starting divedash");

    let registry = Arc::new(WidgetRegistry::builtin());
    let store = Arc::new(FileLayoutStore::from_config(&config)?);
    let dashboard = Dashboard::loading(registry, &config);
    let mut app = App::new(dashboard, store, &config.user);

    // Install panic hook to restore terminal on panic
    terminal::install_panic_hook();
    let mut terminal = terminal::setup_terminal()?;

    let result = app.run(&mut terminal).await;

    // Always restore terminal, even if app.run() failed
    terminal::restore_terminal(&mut terminal)?;

    result
}
