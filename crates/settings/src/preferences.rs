use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::display::DisplayMode;

const PREFERENCES_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub editor: EditorPreferences,
    #[serde(default)]
    pub ui: UiPreferences,
}

fn default_version() -> u32 {
    PREFERENCES_VERSION
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            editor: EditorPreferences::default(),
            ui: UiPreferences::default(),
        }
    }
}

impl Preferences {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = PREFERENCES_VERSION;
        }
        self.editor.sanitize();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorPreferences {
    /// 找不到任何可用檔案時的預設進入點。 / Entry file used when nothing else resolves.
    #[serde(default = "default_entry")]
    pub default_entry: String,
    /// 單擊檔案時是否以預覽分頁開啟。 / Whether a single click opens a preview tab.
    #[serde(default = "default_true")]
    pub preview_on_single_click: bool,
}

fn default_true() -> bool {
    true
}

fn default_entry() -> String {
    "src/app.jsx".to_string()
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            default_entry: default_entry(),
            preview_on_single_click: true,
        }
    }
}

impl EditorPreferences {
    fn sanitize(&mut self) {
        let trimmed = self.default_entry.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            self.default_entry = default_entry();
        } else if trimmed != self.default_entry {
            self.default_entry = trimmed.to_string();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    #[serde(default)]
    pub display_mode: DisplayMode,
}

#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Preferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut data = Preferences::default();
            data.sanitize();
            return Ok(Self { path, data });
        }

        let contents = fs::read_to_string(&path).map_err(|source| PreferencesError::Read {
            path: path.clone(),
            source,
        })?;
        let mut data: Preferences =
            serde_json::from_str(&contents).map_err(|source| PreferencesError::Parse {
                path: path.clone(),
                source,
            })?;
        data.sanitize();
        Ok(Self { path, data })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data
    }

    pub fn update<F>(&mut self, mut op: F) -> Result<(), PreferencesError>
    where
        F: FnMut(&mut Preferences),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    /// 以新偏好完整取代並儲存。 / Replaces every preference, sanitizes, and saves.
    pub fn overwrite(&mut self, preferences: Preferences) -> Result<(), PreferencesError> {
        self.data = preferences;
        self.data.sanitize();
        self.save()
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferencesError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(&self.data).map_err(|source| {
            PreferencesError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = PreferencesStore::load(dir.path().join("sandpad.json")).unwrap();
        assert_eq!(store.preferences(), &Preferences::default());
        assert_eq!(store.preferences().ui.display_mode, DisplayMode::Dark);
    }

    #[test]
    fn partial_file_is_filled_and_sanitized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sandpad.json");
        fs::write(
            &path,
            r#"{"version":0,"ui":{"display_mode":"light"},"editor":{"default_entry":"/src/main.jsx"}}"#,
        )
        .unwrap();
        let store = PreferencesStore::load(&path).unwrap();
        let prefs = store.preferences();
        assert_eq!(prefs.version, PREFERENCES_VERSION);
        assert_eq!(prefs.ui.display_mode, DisplayMode::Light);
        assert_eq!(prefs.editor.default_entry, "src/main.jsx");
        assert!(prefs.editor.preview_on_single_click);
    }

    #[test]
    fn update_persists_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sandpad.json");
        let mut store = PreferencesStore::load(&path).unwrap();
        store
            .update(|prefs| prefs.ui.display_mode = DisplayMode::Light)
            .unwrap();
        let reloaded = PreferencesStore::load(&path).unwrap();
        assert_eq!(reloaded.preferences().ui.display_mode, DisplayMode::Light);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sandpad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = PreferencesStore::load(&path).unwrap_err();
        assert!(matches!(err, PreferencesError::Parse { .. }));
        assert!(err.to_string().contains("sandpad.json"));
    }
}
