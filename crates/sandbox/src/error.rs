use std::io;
use std::path::PathBuf;

use sandpad_template::DescriptorError;
use thiserror::Error;

/// 沙盒檔案系統錯誤。 / Failures raised by filesystem adapters.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("sandbox filesystem is not mounted")]
    NotMounted,
    #[error("path '{path}' is not part of the mounted tree")]
    UnknownPath { path: String },
    #[error("descriptor cannot be mounted: {source}")]
    InvalidDescriptor {
        #[from]
        source: DescriptorError,
    },
    #[error("i/o failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{operation} is not supported by this adapter")]
    Unsupported { operation: &'static str },
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}
