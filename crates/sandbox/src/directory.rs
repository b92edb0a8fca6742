use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use sandpad_template::{Descriptor, FileNode};
use tokio::process::Command;
use tracing::{debug, info};

use crate::adapter::{normalize_key, FileSystemAdapter, ProcessHandle, SandboxFuture};
use crate::error::SandboxError;

/// Materialises descriptors under a host directory.
/// 將描述子寫入主機上的資料夾。
#[derive(Debug)]
pub struct DirectoryFileSystem {
    root: PathBuf,
    mounted: Mutex<Option<BTreeSet<String>>>,
}

impl DirectoryFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mounted: Mutex::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn mounted(&self) -> MutexGuard<'_, Option<BTreeSet<String>>> {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_known(&self, key: &str) -> Result<bool, SandboxError> {
        self.mounted()
            .as_ref()
            .map(|keys| keys.contains(key))
            .ok_or(SandboxError::NotMounted)
    }
}

async fn write_host_file(path: &Path, contents: &str) -> Result<(), SandboxError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| SandboxError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| SandboxError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Deletes a file left over from an earlier mount, then any parent folders it
/// leaves empty below `root`.
async fn remove_stale_file(root: &Path, key: &str) -> Result<(), SandboxError> {
    let path = root.join(key);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(source) => return Err(SandboxError::Io { path, source }),
    }
    let mut parent = path.parent();
    while let Some(dir) = parent {
        if dir == root || tokio::fs::remove_dir(dir).await.is_err() {
            break;
        }
        parent = dir.parent();
    }
    debug!(path = key, "removed stale file");
    Ok(())
}

impl FileSystemAdapter for DirectoryFileSystem {
    fn mount<'a>(&'a self, descriptor: &'a Descriptor) -> SandboxFuture<'a, ()> {
        Box::pin(async move {
            descriptor.validate()?;
            let mut files = Vec::new();
            descriptor.visit_files("", &mut |key: &str, file: &FileNode| {
                files.push((key.to_string(), file.contents.clone()));
            });

            tokio::fs::create_dir_all(&self.root)
                .await
                .map_err(|source| SandboxError::Io {
                    path: self.root.clone(),
                    source,
                })?;
            let previous = self.mounted().take().unwrap_or_default();
            let mut keys = BTreeSet::new();
            for (key, contents) in files {
                write_host_file(&self.root.join(&key), &contents).await?;
                keys.insert(key);
            }
            for stale in previous.difference(&keys) {
                remove_stale_file(&self.root, stale).await?;
            }
            info!(root = %self.root.display(), files = keys.len(), "mounted descriptor");
            *self.mounted() = Some(keys);
            Ok(())
        })
    }

    fn write_file<'a>(&'a self, path: &'a str, contents: &'a str) -> SandboxFuture<'a, ()> {
        Box::pin(async move {
            let key = normalize_key(path);
            if !self.is_known(key)? {
                return Err(SandboxError::UnknownPath {
                    path: path.to_string(),
                });
            }
            write_host_file(&self.root.join(key), contents).await?;
            debug!(path = key, bytes = contents.len(), "wrote mounted file");
            Ok(())
        })
    }

    fn spawn<'a>(
        &'a self,
        command: &'a str,
        args: &'a [String],
    ) -> SandboxFuture<'a, ProcessHandle> {
        Box::pin(async move {
            if !self.is_mounted() {
                return Err(SandboxError::NotMounted);
            }
            let mut builder = Command::new(command);
            builder.args(args).current_dir(&self.root);
            let child = ProcessHandle::piped(&mut builder)
                .spawn()
                .map_err(|source| SandboxError::Spawn {
                    command: command.to_string(),
                    source,
                })?;
            debug!(command, ?args, "spawned sandbox process");
            Ok(ProcessHandle::new(command, child))
        })
    }

    fn is_mounted(&self) -> bool {
        self.mounted().is_some()
    }
}
