use std::collections::{BTreeMap, BTreeSet};

use sandpad_project::{Sidebar, TreeNode};
use sandpad_sandbox::{SubmitOutcome, WriteBackQueue};
use sandpad_settings::{DisplayMode, Preferences};
use sandpad_template::{Descriptor, Manifest};
use tracing::debug;

use crate::tab_strip::TabStrip;
use crate::tabs::TabSessionManager;

/// Ties the sidebar, tabs, edit buffers and write-back together.
/// 整合側欄、分頁、編輯緩衝與寫回佇列的編輯工作階段。
pub struct EditingSession {
    manifest: Manifest,
    known: BTreeSet<String>,
    sidebar: Sidebar,
    tabs: TabSessionManager,
    buffers: BTreeMap<String, String>,
    queue: WriteBackQueue,
    preview_on_single_click: bool,
}

impl EditingSession {
    pub fn new(manifest: Manifest, queue: WriteBackQueue, display_mode: DisplayMode) -> Self {
        let known: BTreeSet<String> = manifest.files.file_keys().into_iter().collect();
        let sidebar = Sidebar::new(&manifest.files, display_mode);
        let mut tabs = TabSessionManager::new(manifest.entry.clone());
        tabs.reconcile(&known);
        Self {
            manifest,
            known,
            sidebar,
            tabs,
            buffers: BTreeMap::new(),
            queue,
            preview_on_single_click: true,
        }
    }

    /// 套用使用者偏好。 / Applies display mode and click behaviour.
    pub fn apply_preferences(&mut self, preferences: &Preferences) {
        self.sidebar.set_display_mode(preferences.ui.display_mode);
        self.preview_on_single_click = preferences.editor.preview_on_single_click;
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.manifest.files
    }

    pub fn visible_files(&self) -> &[String] {
        &self.manifest.visible_files
    }

    pub fn tree(&self) -> &[TreeNode] {
        self.sidebar.nodes()
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn sidebar_mut(&mut self) -> &mut Sidebar {
        &mut self.sidebar
    }

    pub fn tabs(&self) -> &TabSessionManager {
        &self.tabs
    }

    pub fn tab_strip(&self) -> TabStrip {
        TabStrip::from_session(self.tabs.session(), self.sidebar.display_mode())
    }

    pub fn active_file(&self) -> &str {
        self.tabs.session().active_file()
    }

    /// 單擊檔案。 / Single click on a sidebar file. Keys outside the
    /// descriptor are ignored.
    pub fn click(&mut self, key: &str) {
        let key = key.trim_start_matches('/');
        if !self.is_known(key) {
            return;
        }
        if self.preview_on_single_click {
            self.tabs.open_preview(key);
        } else {
            self.tabs.open_persistent(key);
        }
        self.tabs.reconcile(&self.known);
    }

    /// 雙擊檔案。 / Double click pins the file.
    pub fn double_click(&mut self, key: &str) {
        let key = key.trim_start_matches('/');
        if !self.is_known(key) {
            return;
        }
        self.tabs.open_persistent(key);
        self.tabs.reconcile(&self.known);
    }

    fn is_known(&self, key: &str) -> bool {
        let known = self.known.contains(key);
        if !known {
            debug!(path = key, "ignored click on unknown file");
        }
        known
    }

    pub fn close(&mut self, key: &str) -> bool {
        let closed = self.tabs.close(key);
        self.tabs.reconcile(&self.known);
        closed
    }

    /// Edited text for the active file, falling back to the descriptor.
    /// 目前檔案的內容；有編輯緩衝時優先使用。
    pub fn active_contents(&self) -> Option<&str> {
        let key = self.active_file();
        self.buffers
            .get(key)
            .map(String::as_str)
            .or_else(|| self.manifest.files.file_contents(key))
    }

    /// Keeps `contents` for the active file and queues a write-back.
    pub fn record_edit(&mut self, contents: impl Into<String>) -> SubmitOutcome {
        let key = self.active_file().to_string();
        let contents = contents.into();
        let outcome = self.queue.submit(key.clone(), contents.clone());
        debug!(path = %key, ?outcome, "recorded edit");
        self.buffers.insert(key, contents);
        outcome
    }

    /// Resolves once queued write-backs have been applied.
    pub async fn flush(&self) {
        self.queue.flush().await;
    }
}
