//! Fire-and-forget propagation of editor changes into the mounted filesystem.
//! 將編輯內容非同步寫回已掛載的檔案系統。

use std::sync::mpsc::Sender;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::adapter::FileSystemAdapter;

/// 提交結果。 / What happened to a submitted write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Queued,
    /// Dropped because nothing is mounted yet.
    NotMounted,
    /// The worker task has stopped.
    Closed,
}

/// 寫回完成通知。 / Completion notices emitted by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBackEvent {
    Written { path: String },
    Failed { path: String, error: String },
}

enum Job {
    Write { path: String, contents: String },
    Flush(oneshot::Sender<()>),
}

/// Serialises writes through one worker so they land in issuance order.
/// 以單一工作者依序執行寫入，後送出者覆蓋先送出者。
pub struct WriteBackQueue {
    adapter: Arc<dyn FileSystemAdapter>,
    tx: mpsc::UnboundedSender<Job>,
}

impl WriteBackQueue {
    /// Spawns the worker on `handle`. Events go to `events` when given.
    pub fn spawn(
        handle: &Handle,
        adapter: Arc<dyn FileSystemAdapter>,
        events: Option<Sender<WriteBackEvent>>,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let worker_adapter = Arc::clone(&adapter);
        handle.spawn(async move {
            while let Some(job) = rx.recv().await {
                match job {
                    Job::Write { path, contents } => {
                        let event = match worker_adapter.write_file(&path, &contents).await {
                            Ok(()) => WriteBackEvent::Written { path },
                            Err(err) => {
                                warn!(path = %path, error = %err, "write-back failed");
                                WriteBackEvent::Failed {
                                    path,
                                    error: err.to_string(),
                                }
                            }
                        };
                        if let Some(events) = &events {
                            let _ = events.send(event);
                        }
                    }
                    Job::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });
        Self { adapter, tx }
    }

    pub fn adapter(&self) -> &Arc<dyn FileSystemAdapter> {
        &self.adapter
    }

    /// Never blocks. Writes issued before the adapter is mounted are dropped.
    /// 不會阻塞；尚未掛載時直接捨棄。
    pub fn submit(&self, path: impl Into<String>, contents: impl Into<String>) -> SubmitOutcome {
        let path = path.into();
        if !self.adapter.is_mounted() {
            debug!(path = %path, "dropping write-back before mount");
            return SubmitOutcome::NotMounted;
        }
        let job = Job::Write {
            path,
            contents: contents.into(),
        };
        match self.tx.send(job) {
            Ok(()) => SubmitOutcome::Queued,
            Err(_) => SubmitOutcome::Closed,
        }
    }

    /// Resolves once every write submitted before this call has finished.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Job::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}
