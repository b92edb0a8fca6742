use sandpad_settings::{DisplayMode, Preferences, PreferencesStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let store = PreferencesStore::load(&path).expect("load defaults");
    assert_eq!(store.preferences().editor.default_entry, "src/app.jsx");
    assert!(store.preferences().editor.preview_on_single_click);
    assert_eq!(store.preferences().ui.display_mode, DisplayMode::Dark);
    assert!(!path.exists());
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let mut store = PreferencesStore::new(path.clone(), Preferences::default());
    store
        .update(|prefs| {
            prefs.editor.preview_on_single_click = false;
            prefs.editor.default_entry = "src/main.tsx".to_string();
            prefs.ui.display_mode = DisplayMode::Light;
        })
        .expect("save");

    let reloaded = PreferencesStore::load(&path).expect("reload");
    assert!(!reloaded.preferences().editor.preview_on_single_click);
    assert_eq!(reloaded.preferences().editor.default_entry, "src/main.tsx");
    assert_eq!(reloaded.preferences().ui.display_mode, DisplayMode::Light);
}

#[test]
fn overwrite_sanitizes_values() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let mut store = PreferencesStore::load(&path).expect("default");
    let mut prefs = store.preferences().clone();
    prefs.editor.default_entry = "   ".to_string();
    prefs.ui.display_mode = DisplayMode::Light;

    store.overwrite(prefs).expect("overwrite");

    let current = store.preferences();
    assert_eq!(current.editor.default_entry, "src/app.jsx");
    assert_eq!(current.ui.display_mode, DisplayMode::Light);
    assert!(path.exists());
}

#[test]
fn legacy_version_is_upgraded_on_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(
        &path,
        r#"{
            "version": 0,
            "editor": {
                "default_entry": "/src/index.jsx"
            },
            "ui": {
                "display_mode": "light"
            }
        }"#,
    )
    .expect("write legacy prefs");

    let store = PreferencesStore::load(&path).expect("load legacy file");
    let prefs = store.preferences();
    assert_eq!(
        prefs.version, 1,
        "legacy preferences should be upgraded to schema version 1"
    );
    assert_eq!(
        prefs.editor.default_entry, "src/index.jsx",
        "leading slash should be stripped from the default entry"
    );
    assert!(
        prefs.editor.preview_on_single_click,
        "missing click behaviour should fall back to preview"
    );
    assert_eq!(prefs.ui.display_mode, DisplayMode::Light);
}
