use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

/// 分頁狀態快照。 / Snapshot of the open tabs.
///
/// `preview_file` is never one of `opened_files`, and `opened_files` never repeats a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSession {
    opened_files: Vec<String>,
    preview_file: Option<String>,
    active_file: String,
}

impl TabSession {
    /// 已釘選的分頁。 / Pinned tabs in the order they were opened.
    pub fn opened_files(&self) -> &[String] {
        &self.opened_files
    }

    pub fn preview_file(&self) -> Option<&str> {
        self.preview_file.as_deref()
    }

    pub fn active_file(&self) -> &str {
        &self.active_file
    }

    pub fn is_pinned(&self, key: &str) -> bool {
        self.opened_files.iter().any(|opened| opened == key)
    }

    pub fn is_preview(&self, key: &str) -> bool {
        self.preview_file.as_deref() == Some(key)
    }
}

/// Owns the single [`TabSession`] and applies every transition to it.
/// 管理唯一的分頁狀態並執行所有轉換。
#[derive(Debug, Clone)]
pub struct TabSessionManager {
    session: TabSession,
    default_file: String,
}

impl TabSessionManager {
    /// 以進入點建立。 / Starts with `entry` as the only pinned and active tab.
    pub fn new(entry: impl Into<String>) -> Self {
        let entry = entry.into();
        Self {
            session: TabSession {
                opened_files: vec![entry.clone()],
                preview_file: None,
                active_file: entry.clone(),
            },
            default_file: entry,
        }
    }

    /// No pinned tabs; `default_file` is active until something is opened.
    /// 無釘選分頁的初始狀態。
    pub fn empty(default_file: impl Into<String>) -> Self {
        let default_file = default_file.into();
        Self {
            session: TabSession {
                opened_files: Vec::new(),
                preview_file: None,
                active_file: default_file.clone(),
            },
            default_file,
        }
    }

    pub fn session(&self) -> &TabSession {
        &self.session
    }

    /// Fallback used when nothing else is available.
    pub fn default_file(&self) -> &str {
        &self.default_file
    }

    /// 單擊：以預覽開啟。 / Shows `key` in the transient preview slot.
    pub fn open_preview(&mut self, key: &str) {
        if self.session.is_pinned(key) {
            self.session.preview_file = None;
        } else {
            self.session.preview_file = Some(key.to_string());
        }
        self.activate(key);
    }

    /// 雙擊：釘選開啟。 / Pins `key`, promoting it out of preview if needed.
    pub fn open_persistent(&mut self, key: &str) {
        if !self.session.is_pinned(key) {
            self.session.opened_files.push(key.to_string());
        }
        if self.session.is_preview(key) {
            self.session.preview_file = None;
        }
        self.activate(key);
    }

    /// Closes `key`. Returns `false` when it was neither pinned nor previewed.
    /// 關閉分頁；若非開啟中的分頁則回傳 `false`。
    pub fn close(&mut self, key: &str) -> bool {
        let was_active = self.session.active_file == key;

        if self.session.is_preview(key) {
            self.session.preview_file = None;
            if was_active {
                let next = self
                    .session
                    .opened_files
                    .last()
                    .cloned()
                    .unwrap_or_else(|| self.default_file.clone());
                self.activate(&next);
            }
            return true;
        }

        let Some(index) = self
            .session
            .opened_files
            .iter()
            .position(|opened| opened == key)
        else {
            return false;
        };
        self.session.opened_files.remove(index);

        if was_active {
            let opened = &self.session.opened_files;
            let next = index
                .checked_sub(1)
                .and_then(|left| opened.get(left))
                .or_else(|| opened.get(index))
                .cloned()
                .or_else(|| self.session.preview_file.clone())
                .unwrap_or_else(|| self.default_file.clone());
            self.activate(&next);
        }
        true
    }

    /// Re-points the active tab when it no longer names a known file.
    /// 當目前分頁不在已知檔案中時重新選擇。
    pub fn reconcile(&mut self, known: &BTreeSet<String>) {
        if known.is_empty() || known.contains(&self.session.active_file) {
            return;
        }
        let next = self
            .session
            .opened_files
            .iter()
            .find(|opened| known.contains(*opened))
            .or_else(|| {
                self.session
                    .preview_file
                    .as_ref()
                    .filter(|preview| known.contains(*preview))
            })
            .or_else(|| Some(&self.default_file).filter(|entry| known.contains(*entry)))
            .or_else(|| known.iter().next())
            .cloned();
        if let Some(next) = next {
            debug!(from = %self.session.active_file, to = %next, "reconciled active tab");
            self.session.active_file = next;
        }
    }

    fn activate(&mut self, key: &str) {
        if self.session.active_file != key {
            debug!(from = %self.session.active_file, to = key, "activated tab");
            self.session.active_file = key.to_string();
        }
    }
}
