use std::future::Future;

use once_cell::sync::Lazy;
use tokio::{
    runtime::{Builder, Handle, Runtime},
    task::JoinHandle,
};

/// Runtime for background work started outside of any tokio context, calls
/// coming in over the FFI usually are
static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("opsync-worker")
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

pub fn spawn<T>(task: T) -> JoinHandle<T::Output>
where
    T: Future + Send + 'static,
    T::Output: Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => handle.spawn(task),
        Err(_) => RUNTIME.spawn(task),
    }
}
