use std::future::Future;
use std::io;

use tokio::runtime::{Builder, Handle, Runtime};

/// Owns the tokio runtime that drives adapters and write-back.
/// 驅動檔案系統轉接器與寫回工作的執行環境。
pub struct SandboxRuntime {
    runtime: Runtime,
}

impl SandboxRuntime {
    pub fn new() -> io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                Builder::new_current_thread().enable_all().build()
            })?;
        Ok(Self { runtime })
    }

    pub fn handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileSystemAdapter, MemoryFileSystem, SubmitOutcome, WriteBackQueue};
    use sandpad_template::Descriptor;
    use std::sync::Arc;

    #[test]
    fn drives_write_back_from_sync_code() {
        let runtime = SandboxRuntime::new().unwrap();
        let fs = Arc::new(MemoryFileSystem::new());
        let mut descriptor = Descriptor::new();
        descriptor.insert_file("a.txt", "one").unwrap();
        runtime.block_on(fs.mount(&descriptor)).unwrap();

        let queue = WriteBackQueue::spawn(&runtime.handle(), fs.clone(), None);
        assert_eq!(queue.submit("a.txt", "two"), SubmitOutcome::Queued);
        runtime.block_on(queue.flush());
        assert_eq!(fs.read("a.txt").as_deref(), Some("two"));
    }
}
