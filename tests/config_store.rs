//! Configuration loading, lookup, validation and reload.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use serde_json::json;
use textmorph::config::ConfigStore;
use textmorph::{AppContext, ConfigSlot, ErrorKind};

#[test]
fn test_lookup_and_accessors() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "config.yaml", &common::full_config(dir.path()));
    let store = ConfigStore::load(&path).unwrap();

    assert_eq!(store.app_name(), "Text Morph");
    assert_eq!(store.app_version(), "2.1.0");
    assert_eq!(store.timeout("huggingface"), 45);
    assert_eq!(store.timeout("groq"), 60);
    assert_eq!(store.max_input_length(), 5000);
    assert!(store.is_feature_enabled("export"));
    assert!(!store.is_feature_enabled("dark_mode"));

    assert_eq!(
        store.get("summarization.abstractive.short.max_length"),
        Some(json!(60))
    );
    assert_eq!(store.get("app.name.first"), None);
    assert_eq!(store.get_or("missing.key", json!("fallback")), json!("fallback"));
    assert_eq!(store.summarization_params("abstractive", "short").len(), 2);
    assert!(store.theme_colors().is_empty());
}

#[test]
fn test_error_message_templates() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "config.yaml", &common::full_config(dir.path()));
    let store = ConfigStore::load(&path).unwrap();

    assert_eq!(
        store.error_message("text_too_long", &[("current", "6000"), ("max", "5000")]),
        "Text too long: 6000 > 5000"
    );
    // Missing argument: the raw template comes back.
    assert_eq!(
        store.error_message("text_too_long", &[("current", "6000")]),
        "Text too long: {current} > {max}"
    );
    assert_eq!(store.error_message("unknown_kind", &[]), "An error occurred");
    assert_eq!(store.success_message("copied", &[]), "Success!");
}

#[test]
fn test_validate_reports_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(
        dir.path(),
        "config.yaml",
        "app:\n  name: Partial\napi:\n  huggingface: {}\n",
    );
    let store = ConfigStore::load(&path).unwrap();

    let err = store.validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("api.groq"));
    assert!(store.validate_keys(&["app", "api.huggingface"]).is_ok());
}

#[test]
fn test_missing_and_empty_files() {
    let dir = tempfile::tempdir().unwrap();

    let err = ConfigStore::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().starts_with("Configuration file not found"));
    assert!(err.is_fatal());

    let empty = common::write_config(dir.path(), "empty.yaml", "# nothing here\n");
    let err = ConfigStore::load(&empty).unwrap_err();
    assert_eq!(err.code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("empty"));
}

#[test]
fn test_toml_and_json_documents() {
    let dir = tempfile::tempdir().unwrap();

    let toml = common::write_config(
        dir.path(),
        "config.toml",
        "[app]\nname = \"Toml Morph\"\n[limits]\nmax_input_length = 42\n",
    );
    let store = ConfigStore::load(&toml).unwrap();
    assert_eq!(store.app_name(), "Toml Morph");
    assert_eq!(store.max_input_length(), 42);

    let json = common::write_config(
        dir.path(),
        "config.json",
        r#"{"app": {"version": "9.9.9"}}"#,
    );
    assert_eq!(ConfigStore::load(&json).unwrap().app_version(), "9.9.9");
}

#[test]
fn test_reload_swaps_whole_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "config.yaml", "app:\n  name: Before\n  version: \"1\"\n");
    let store = ConfigStore::load(&path).unwrap();
    let before = store.snapshot();

    std::fs::write(&path, "app:\n  name: After\n").unwrap();
    store.reload().unwrap();

    assert_eq!(store.generation(), 2);
    assert_eq!(store.app_name(), "After");
    // Keys absent from the new file are gone, not merged.
    assert_eq!(store.get("app.version"), None);
    // An earlier snapshot is unaffected.
    assert_eq!(before.lookup("app.name"), Some(&json!("Before")));
}

#[test]
fn test_failed_reload_keeps_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "config.yaml", "app:\n  name: Stable\n");
    let store = ConfigStore::load(&path).unwrap();

    std::fs::write(&path, "app: [unclosed\n").unwrap();
    assert!(store.reload().is_err());
    assert_eq!(store.app_name(), "Stable");
    assert_eq!(store.generation(), 1);
}

#[test]
fn test_slot_loads_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "config.yaml", &common::full_config(dir.path()));
    let slot = ConfigSlot::new();

    let first = slot.get_or_load(&path).unwrap();
    // Later edits are not observed without an explicit reload.
    std::fs::write(&path, "app:\n  name: Edited\n").unwrap();
    let second = slot.get_or_load(&path).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.app_name(), "Text Morph");
}

#[test]
fn test_app_context_initialize() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "config.yaml", &common::full_config(dir.path()));

    let ctx = AppContext::initialize(&path).unwrap();
    assert_eq!(ctx.logging.file_path, Some(dir.path().join("app.log")));
    assert!(!ctx.logging.console);

    let lines = ctx.log.tail(2);
    assert_eq!(
        lines,
        vec![
            "INFO - Logging system initialized successfully",
            "INFO - Text Morph v2.1.0 starting",
        ]
    );

    let bad = common::write_config(dir.path(), "bad.yaml", "app:\n  name: x\n");
    assert!(AppContext::initialize(&bad).is_err());
}

fn tagged_document(tag: &str) -> String {
    format!("app:\n  name: {tag}\n  version: {tag}\nlimits:\n  tag: {tag}\n")
}

#[test]
fn test_readers_never_see_mixed_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "config.yaml", &tagged_document("A"));
    let store = Arc::new(ConfigStore::load(&path).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let stop = Arc::clone(&stop);
            thread::spawn(move || loop {
                let app = store.get("app").unwrap();
                assert_eq!(app["name"], app["version"]);

                let snapshot = store.snapshot();
                assert_eq!(snapshot.lookup("app.name"), snapshot.lookup("limits.tag"));

                if stop.load(Ordering::Relaxed) {
                    break;
                }
            })
        })
        .collect();

    for round in 0..50 {
        let tag = if round % 2 == 0 { "B" } else { "A" };
        std::fs::write(&path, tagged_document(tag)).unwrap();
        store.reload().unwrap();
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.generation(), 51);
    assert_eq!(store.app_name(), "A");
}
