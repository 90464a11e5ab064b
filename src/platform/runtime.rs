use std::future::Future;
use std::sync::LazyLock;

use tokio::runtime::{Builder, Handle, Runtime};

static BACKGROUND_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("analytics-collect")
        .enable_all()
        .build()
        .expect("failed to build background tokio runtime")
});

/// Spawns `future` on the ambient tokio runtime when called from inside one, otherwise on a
/// lazily started single-worker background runtime that lives for the rest of the process.
pub fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        handle.spawn(future);
    } else {
        let _ = BACKGROUND_RUNTIME.spawn(future);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn runs_on_background_runtime_without_ambient_handle() {
        let (tx, rx) = std::sync::mpsc::channel();
        spawn_detached(async move {
            tx.send(42).unwrap();
        });
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn runs_on_ambient_runtime() {
        let (tx, rx) = async_channel::bounded(1);
        spawn_detached(async move {
            tx.send("done").await.unwrap();
        });
        assert_eq!(rx.recv().await.unwrap(), "done");
    }
}
