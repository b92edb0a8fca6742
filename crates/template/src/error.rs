use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::descriptor::DescriptorError;

/// Errors that abort a compilation run. No partial output is valid after any of them.
/// 中止編譯的錯誤；任何一種發生後輸出皆視為無效。
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("source directory \"{}\" not found", path.display())]
    MissingSourceRoot { path: PathBuf },
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not UTF-8 text", path.display())]
    NonUtf8Contents { path: PathBuf },
    #[error("file name {} is not valid UTF-8", path.display())]
    NonUtf8Path { path: PathBuf },
    #[error("export name {export_name} is derived from both '{first}' and '{second}'")]
    IdentifierCollision {
        export_name: String,
        first: String,
        second: String,
    },
    #[error("invalid descriptor entry: {0}")]
    Descriptor(#[from] DescriptorError),
    #[error("failed to serialize manifest: {0}")]
    Manifest(#[source] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
