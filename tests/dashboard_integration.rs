//! End-to-end tests: configuration, file storage and the dashboard shell.

use std::fs;
use std::sync::Arc;

use divedash_config::{Config, FileLayoutStore, LayoutStore};
use divedash_layout::WidgetRegistry;
use divedash_protocol::{Breakpoint, Message, Role};
use divedash_tui::{App, Dashboard, NoticeLevel, Phase};
use serde_json::json;
use tempfile::TempDir;

fn config_in(dir: &TempDir, role: &str) -> Config {
    Config {
        user: "mrojas".to_string(),
        role: Some(role.to_string()),
        data_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    }
}

fn app_for(config: &Config) -> App<FileLayoutStore> {
    let store = FileLayoutStore::from_config(config).expect("store");
    let dashboard = Dashboard::loading(Arc::new(WidgetRegistry::builtin()), config);
    App::new(dashboard, Arc::new(store), &config.user)
}

#[tokio::test]
async fn config_file_selects_role_and_history() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("divedash.json5");
    fs::write(
        &path,
        r#"
        {
            // Supervisor on the southern sites
            user: "mrojas",
            role: "supervisor",
            history: { depth: 5 },
        }
        "#,
    )
    .expect("write config");

    let config = Config::load_from(&path).expect("load config");
    assert_eq!(config.user, "mrojas");
    assert_eq!(config.role(), Role::Supervisor);
    assert_eq!(config.history.depth, 5);
}

#[tokio::test]
async fn edits_survive_a_restart() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(&dir, "other");

    let mut app = app_for(&config);
    app.load().await;
    assert_eq!(app.dashboard().phase(), Phase::Viewing);

    app.update(Message::ToggleEdit);
    app.update(Message::OpenCatalog);
    let added = app.dashboard().catalog()[0].id;
    app.update(Message::Select);
    app.update(Message::Save);
    app.flush_save().await;
    assert_eq!(app.dashboard().phase(), Phase::Viewing);
    let saved = app.dashboard().snapshot().clone();

    let stored = dir.path().join("dashboards").join("mrojas.json");
    let content = fs::read_to_string(&stored).expect("dashboard file written");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(value["version"], json!(2));
    assert!(value["layout"].is_object());

    let mut restarted = app_for(&config);
    restarted.load().await;
    assert_eq!(restarted.dashboard().snapshot(), &saved);
    assert!(
        restarted
            .dashboard()
            .placed(Breakpoint::Lg)
            .iter()
            .any(|item| item.id == added)
    );
}

#[tokio::test]
async fn legacy_record_is_upgraded_on_save() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(&dir, "other");
    let dashboards = dir.path().join("dashboards");
    fs::create_dir_all(&dashboards).expect("mkdir");
    fs::write(
        dashboards.join("mrojas.json"),
        r#"{
            "layout": [
                {"i": "weather", "x": 0, "y": 0, "w": 6, "h": 6},
                {"i": "calendar", "x": 6, "y": null},
                {"i": "retired-widget", "x": 0, "y": 6, "w": 6, "h": 4}
            ],
            "widgets": {"weather": {"units": "imperial"}}
        }"#,
    )
    .expect("write legacy record");

    let mut app = app_for(&config);
    app.load().await;
    let dashboard = app.dashboard();
    let ids: Vec<_> = dashboard
        .placed(Breakpoint::Lg)
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert!(ids.contains(&"weather".to_string()));
    assert!(ids.contains(&"calendar".to_string()));
    assert!(!ids.contains(&"retired-widget".to_string()));
    assert_eq!(
        dashboard.snapshot().widgets.get("weather").map(|b| &b["units"]),
        Some(&json!("imperial"))
    );

    app.update(Message::ToggleEdit);
    app.update(Message::Save);
    app.flush_save().await;

    let store = FileLayoutStore::from_config(&config).expect("store");
    let record = store.load("mrojas").await.expect("load").expect("record");
    assert!(!record.is_legacy());
    assert!(record.has_consistent_shape());
}

#[tokio::test]
async fn corrupt_record_falls_back_to_role_default() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(&dir, "buzo");
    let dashboards = dir.path().join("dashboards");
    fs::create_dir_all(&dashboards).expect("mkdir");
    fs::write(dashboards.join("mrojas.json"), "{ not json").expect("write");

    let mut app = app_for(&config);
    app.load().await;

    let dashboard = app.dashboard();
    assert_eq!(dashboard.phase(), Phase::Viewing);
    assert_eq!(dashboard.role(), Role::Diver);
    assert!(
        dashboard
            .placed(Breakpoint::Lg)
            .iter()
            .any(|item| item.id == "quick-actions" && item.is_static)
    );
    assert_eq!(dashboard.notices()[0].level, NoticeLevel::Warning);
}
