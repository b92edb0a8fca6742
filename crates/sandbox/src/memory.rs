use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use sandpad_template::{Descriptor, FileNode};
use tracing::debug;

use crate::adapter::{normalize_key, FileSystemAdapter, ProcessHandle, SandboxFuture};
use crate::error::SandboxError;

/// In-memory adapter keyed by flat file paths. Cannot run processes.
/// 以平面路徑儲存內容的記憶體檔案系統。
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<Option<BTreeMap<String, String>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> MutexGuard<'_, Option<BTreeMap<String, String>>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current contents of a mounted file.
    pub fn read(&self, path: &str) -> Option<String> {
        self.files()
            .as_ref()
            .and_then(|files| files.get(normalize_key(path)).cloned())
    }

    /// Snapshot of all mounted files, empty when unmounted.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.files().clone().unwrap_or_default()
    }
}

impl FileSystemAdapter for MemoryFileSystem {
    fn mount<'a>(&'a self, descriptor: &'a Descriptor) -> SandboxFuture<'a, ()> {
        Box::pin(async move {
            descriptor.validate()?;
            let mut files = BTreeMap::new();
            descriptor.visit_files("", &mut |key: &str, file: &FileNode| {
                files.insert(key.to_string(), file.contents.clone());
            });
            debug!(files = files.len(), "mounted in-memory filesystem");
            *self.files() = Some(files);
            Ok(())
        })
    }

    fn write_file<'a>(&'a self, path: &'a str, contents: &'a str) -> SandboxFuture<'a, ()> {
        Box::pin(async move {
            let mut guard = self.files();
            let files = guard.as_mut().ok_or(SandboxError::NotMounted)?;
            let slot = files
                .get_mut(normalize_key(path))
                .ok_or_else(|| SandboxError::UnknownPath {
                    path: path.to_string(),
                })?;
            *slot = contents.to_string();
            Ok(())
        })
    }

    fn spawn<'a>(
        &'a self,
        _command: &'a str,
        _args: &'a [String],
    ) -> SandboxFuture<'a, ProcessHandle> {
        Box::pin(async { Err(SandboxError::Unsupported { operation: "spawn" }) })
    }

    fn is_mounted(&self) -> bool {
        self.files().is_some()
    }
}
