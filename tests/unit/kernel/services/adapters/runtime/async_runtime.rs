use super::*;
use std::sync::mpsc;
use std::time::Duration;

#[test]
fn runtime_executes_spawned_tasks() {
    let runtime = AsyncRuntime::new(1).unwrap();
    let (tx, rx) = mpsc::channel();
    runtime.tokio_handle().spawn(async move {
        let _ = tx.send(42u32);
    });
    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 42);
}

#[test]
fn zero_worker_threads_is_clamped() {
    let runtime = AsyncRuntime::new(0).unwrap();
    let handle = runtime.tokio_handle();
    let value = handle.block_on(async { 7 });
    assert_eq!(value, 7);
}
