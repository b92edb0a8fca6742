use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A write that could not be staged or committed.
#[derive(Debug)]
pub(crate) struct StagingError {
    pub path: PathBuf,
    pub source: io::Error,
}

struct Staged {
    target: PathBuf,
    temp: PathBuf,
}

struct Committed {
    target: PathBuf,
    backup: Option<PathBuf>,
}

/// 一組全有或全無的輸出寫入。 / A set of outputs that land together or not at all.
///
/// Every file is first written to a `.tmp` sibling. `commit` then moves them
/// into place, keeping `.bak` copies of replaced files until the last rename
/// succeeds. Any failure restores the previous files and removes the temps.
#[derive(Default)]
pub(crate) struct OutputBatch {
    staged: Vec<Staged>,
}

impl OutputBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, path: &Path, data: &[u8]) -> Result<(), StagingError> {
        let fail = |source| StagingError {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(fail)?;
        }
        let temp = sibling(path, ".tmp");
        fs::write(&temp, data).map_err(fail)?;
        self.staged.push(Staged {
            target: path.to_path_buf(),
            temp,
        });
        Ok(())
    }

    pub fn commit(mut self) -> Result<(), StagingError> {
        let staged = std::mem::take(&mut self.staged);
        let mut committed: Vec<Committed> = Vec::with_capacity(staged.len());

        for (index, file) in staged.iter().enumerate() {
            if let Err(source) = replace(file, &mut committed) {
                rollback(committed);
                discard(&staged[index..]);
                return Err(StagingError {
                    path: file.target.clone(),
                    source,
                });
            }
        }

        for done in committed {
            if let Some(backup) = done.backup {
                let _ = fs::remove_file(backup);
            }
        }
        Ok(())
    }
}

impl Drop for OutputBatch {
    fn drop(&mut self) {
        discard(&self.staged);
    }
}

fn replace(file: &Staged, committed: &mut Vec<Committed>) -> io::Result<()> {
    let backup = if file.target.is_file() {
        let backup = sibling(&file.target, ".bak");
        fs::rename(&file.target, &backup)?;
        Some(backup)
    } else {
        None
    };
    if let Err(err) = fs::rename(&file.temp, &file.target) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, &file.target);
        }
        return Err(err);
    }
    committed.push(Committed {
        target: file.target.clone(),
        backup,
    });
    Ok(())
}

fn rollback(committed: Vec<Committed>) {
    for done in committed.into_iter().rev() {
        let _ = fs::remove_file(&done.target);
        if let Some(backup) = done.backup {
            let _ = fs::rename(backup, &done.target);
        }
    }
}

fn discard(staged: &[Staged]) {
    for file in staged {
        let _ = fs::remove_file(&file.temp);
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or(OsStr::new("")).to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn commit_moves_every_staged_file_into_place() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("out/a.ts");
        let second = dir.path().join("b.ts");
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(&first, "old").unwrap();

        let mut batch = OutputBatch::new();
        batch.stage(&first, b"new-a").unwrap();
        batch.stage(&second, b"new-b").unwrap();
        assert_eq!(fs::read_to_string(&first).unwrap(), "old");
        batch.commit().unwrap();

        assert_eq!(fs::read_to_string(&first).unwrap(), "new-a");
        assert_eq!(fs::read_to_string(&second).unwrap(), "new-b");
        assert!(!dir.path().join("out/a.ts.bak").exists());
        assert!(!dir.path().join("out/a.ts.tmp").exists());
    }

    #[test]
    fn failed_rename_restores_earlier_targets() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.ts");
        let blocked = dir.path().join("b.ts");
        let fresh = dir.path().join("c.ts");
        fs::write(&first, "old").unwrap();
        fs::create_dir(&blocked).unwrap();

        let mut batch = OutputBatch::new();
        batch.stage(&fresh, b"new-c").unwrap();
        batch.stage(&first, b"new-a").unwrap();
        batch.stage(&blocked, b"new-b").unwrap();
        let err = batch.commit().unwrap_err();

        assert_eq!(err.path, blocked);
        assert_eq!(fs::read_to_string(&first).unwrap(), "old");
        assert!(!fresh.exists());
        let mut leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        leftovers.sort();
        assert_eq!(leftovers, vec!["a.ts", "b.ts"]);
    }

    #[test]
    fn dropping_an_uncommitted_batch_removes_temps() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a.ts");
        let mut batch = OutputBatch::new();
        batch.stage(&target, b"data").unwrap();
        assert!(dir.path().join("a.ts.tmp").exists());
        drop(batch);
        assert!(!dir.path().join("a.ts.tmp").exists());
        assert!(!target.exists());
    }
}
