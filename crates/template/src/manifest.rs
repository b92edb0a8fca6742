use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::descriptor::{Descriptor, DescriptorError};

/// Resolved template as consumed at runtime.
/// 執行期使用的已解析樣板（描述子、進入點與可見檔案）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub files: Descriptor,
    pub entry: String,
    #[serde(default)]
    pub visible_files: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("manifest {} is invalid: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: DescriptorError,
    },
}

impl Manifest {
    /// Loads and validates a manifest written by the compiler.
    /// 載入並驗證編譯器輸出的清單。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref().to_path_buf();
        let contents = fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&contents).map_err(|source| ManifestError::Parse {
                path: path.clone(),
                source,
            })?;
        manifest
            .files
            .validate()
            .map_err(|source| ManifestError::Invalid { path, source })?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_rejects_unsafe_segments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("template.json");
        fs::write(
            &path,
            r#"{"files":{"..":{"file":{"contents":"x"}}},"entry":"x","visibleFiles":[]}"#,
        )
        .unwrap();
        assert!(matches!(
            Manifest::load(&path),
            Err(ManifestError::Invalid { .. })
        ));
    }

    #[test]
    fn visible_files_default_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("template.json");
        fs::write(
            &path,
            r#"{"files":{"app.js":{"file":{"contents":"x"}}},"entry":"app.js"}"#,
        )
        .unwrap();
        let manifest = Manifest::load(&path).unwrap();
        assert!(manifest.visible_files.is_empty());
        assert_eq!(manifest.files.file_contents("app.js"), Some("x"));
    }
}
