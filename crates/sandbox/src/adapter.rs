use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use sandpad_template::Descriptor;
use tokio::process::Child;

use crate::error::SandboxError;

pub type SandboxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SandboxError>> + Send + 'a>>;

/// Filesystem that hosts a mounted descriptor and can run commands against it.
/// 掛載描述子並可於其中執行指令的檔案系統。
pub trait FileSystemAdapter: Send + Sync {
    /// Materialises every file of `descriptor`. Mounting again replaces the tree.
    fn mount<'a>(&'a self, descriptor: &'a Descriptor) -> SandboxFuture<'a, ()>;

    /// Overwrites one mounted file. Fails when unmounted or when `path` was never mounted.
    /// 覆寫已掛載的檔案。
    fn write_file<'a>(&'a self, path: &'a str, contents: &'a str) -> SandboxFuture<'a, ()>;

    fn spawn<'a>(&'a self, command: &'a str, args: &'a [String])
        -> SandboxFuture<'a, ProcessHandle>;

    fn is_mounted(&self) -> bool;
}

/// Strips the leading slash accepted on editor keys.
pub(crate) fn normalize_key(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Collected output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// 執行中的程序。 / A process started inside the sandbox.
#[derive(Debug)]
pub struct ProcessHandle {
    command: String,
    child: Child,
}

impl ProcessHandle {
    pub(crate) fn new(command: impl Into<String>, child: Child) -> Self {
        Self {
            command: command.into(),
            child,
        }
    }

    pub(crate) fn piped(command: &mut tokio::process::Command) -> &mut tokio::process::Command {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Waits for exit and collects both output streams (lossy UTF-8).
    pub async fn wait_with_output(self) -> Result<ProcessOutput, SandboxError> {
        let command = self.command;
        let output = self
            .child
            .wait_with_output()
            .await
            .map_err(|source| SandboxError::Spawn {
                command: command.clone(),
                source,
            })?;
        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
