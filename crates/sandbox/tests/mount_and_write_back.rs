use std::sync::{mpsc, Arc};

use sandpad_sandbox::{
    DirectoryFileSystem, FileSystemAdapter, SandboxRuntime, SubmitOutcome, WriteBackEvent,
    WriteBackQueue,
};
use sandpad_template::Descriptor;
use tempfile::tempdir;

#[test]
fn edits_reach_the_host_directory_in_order() {
    let dir = tempdir().unwrap();
    let runtime = SandboxRuntime::new().unwrap();
    let fs = Arc::new(DirectoryFileSystem::new(dir.path().join("sandbox")));
    let (events_tx, events_rx) = mpsc::channel();
    let queue = WriteBackQueue::spawn(&runtime.handle(), fs.clone(), Some(events_tx));

    assert_eq!(
        queue.submit("src/app.jsx", "too early"),
        SubmitOutcome::NotMounted
    );

    let mut descriptor = Descriptor::new();
    descriptor.insert_file("src/app.jsx", "initial").unwrap();
    runtime.block_on(fs.mount(&descriptor)).unwrap();
    let target = dir.path().join("sandbox/src/app.jsx");
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "initial");

    for text in ["a", "ab", "abc"] {
        assert_eq!(queue.submit("src/app.jsx", text), SubmitOutcome::Queued);
    }
    runtime.block_on(queue.flush());

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "abc");
    let events: Vec<WriteBackEvent> = events_rx.try_iter().collect();
    assert_eq!(events.len(), 3);
    assert!(events
        .iter()
        .all(|event| matches!(event, WriteBackEvent::Written { path } if path == "src/app.jsx")));
}
