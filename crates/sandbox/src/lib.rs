//! Sandbox filesystem adapters and the editor write-back queue.
//! 沙盒檔案系統轉接器與編輯器寫回佇列。

mod adapter;
mod directory;
mod error;
mod memory;
mod runtime;
mod write_back;

pub use adapter::{FileSystemAdapter, ProcessHandle, ProcessOutput, SandboxFuture};
pub use directory::DirectoryFileSystem;
pub use error::SandboxError;
pub use memory::MemoryFileSystem;
pub use runtime::SandboxRuntime;
pub use write_back::{SubmitOutcome, WriteBackEvent, WriteBackQueue};
