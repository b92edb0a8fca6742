use std::fs;
use std::sync::{mpsc, Arc};

use sandpad_core::EditingSession;
use sandpad_sandbox::{
    FileSystemAdapter, MemoryFileSystem, SandboxRuntime, SubmitOutcome, WriteBackEvent,
    WriteBackQueue,
};
use sandpad_settings::{DisplayMode, Preferences};
use sandpad_template::{CompilerConfig, Manifest, TemplateCompiler};
use tempfile::tempdir;

fn scanned_manifest() -> Manifest {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src/pages")).unwrap();
    fs::write(root.join("src/app.jsx"), "export default function App() {}").unwrap();
    fs::write(root.join("src/main.jsx"), "import App from './app';").unwrap();
    fs::write(root.join("src/pages/home.jsx"), "export const Home = 1;").unwrap();
    fs::write(root.join("package.json"), "{}").unwrap();
    TemplateCompiler::new(CompilerConfig::for_source(root))
        .scan()
        .unwrap()
        .to_manifest()
}

#[test]
fn click_edit_and_close_flow() {
    let runtime = SandboxRuntime::new().unwrap();
    let fs = Arc::new(MemoryFileSystem::new());
    let (events_tx, events_rx) = mpsc::channel();
    let queue = WriteBackQueue::spawn(&runtime.handle(), fs.clone(), Some(events_tx));
    let manifest = scanned_manifest();
    let mut session = EditingSession::new(manifest.clone(), queue, DisplayMode::Dark);

    assert_eq!(session.active_file(), "src/app.jsx");
    assert_eq!(
        session.active_contents(),
        Some("export default function App() {}")
    );

    // Edits before mount stay local.
    assert_eq!(session.record_edit("draft"), SubmitOutcome::NotMounted);
    assert_eq!(session.active_contents(), Some("draft"));

    runtime.block_on(fs.mount(&manifest.files)).unwrap();

    session.click("src/pages/home.jsx");
    let strip = session.tab_strip();
    assert_eq!(strip.len(), 2);
    assert!(strip.tabs[1].is_preview && strip.tabs[1].is_active);

    assert_eq!(session.record_edit("export const Home = 2;"), SubmitOutcome::Queued);
    runtime.block_on(session.flush());
    assert_eq!(
        fs.read("src/pages/home.jsx").as_deref(),
        Some("export const Home = 2;")
    );
    assert_eq!(
        events_rx.try_recv().unwrap(),
        WriteBackEvent::Written {
            path: "src/pages/home.jsx".to_string()
        }
    );

    session.double_click("src/pages/home.jsx");
    assert_eq!(
        session.tabs().session().opened_files(),
        ["src/app.jsx", "src/pages/home.jsx"]
    );
    assert!(session.close("src/pages/home.jsx"));
    assert_eq!(session.active_file(), "src/app.jsx");
}

#[test]
fn clicks_on_unknown_keys_leave_tabs_untouched() {
    let runtime = SandboxRuntime::new().unwrap();
    let queue = WriteBackQueue::spawn(&runtime.handle(), Arc::new(MemoryFileSystem::new()), None);
    let mut session = EditingSession::new(scanned_manifest(), queue, DisplayMode::Light);
    let before = session.tabs().session().clone();

    session.click("src/deleted.jsx");
    session.double_click("src/gone.jsx");
    assert_eq!(session.tabs().session(), &before);
    assert_eq!(session.tab_strip().len(), 1);
    assert_eq!(session.tabs().session().preview_file(), None);

    session.click("/src/main.jsx");
    assert_eq!(session.tabs().session().preview_file(), Some("src/main.jsx"));

    session.close("src/app.jsx");
    assert!(session.active_contents().is_some());
}

#[test]
fn preferences_switch_single_click_to_pinning() {
    let runtime = SandboxRuntime::new().unwrap();
    let queue = WriteBackQueue::spawn(&runtime.handle(), Arc::new(MemoryFileSystem::new()), None);
    let mut session = EditingSession::new(scanned_manifest(), queue, DisplayMode::Dark);

    let mut preferences = Preferences::default();
    preferences.editor.preview_on_single_click = false;
    preferences.ui.display_mode = DisplayMode::Light;
    session.apply_preferences(&preferences);

    session.click("package.json");
    assert_eq!(session.tabs().session().preview_file(), None);
    assert_eq!(
        session.tabs().session().opened_files(),
        ["src/app.jsx", "package.json"]
    );
    assert_eq!(session.sidebar().display_mode(), DisplayMode::Light);
    let strip = session.tab_strip();
    assert_eq!(strip.background, "#F5F5F5");
    assert_eq!(strip.active().unwrap().style.background, Some("#FFFFFF"));
    let rows = session.sidebar().rows(session.active_file());
    assert!(rows.iter().any(|row| row.is_active && row.node.name == "package.json"));
}
