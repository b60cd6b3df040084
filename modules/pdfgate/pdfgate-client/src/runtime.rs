use std::future::Future;
use std::sync::Arc;

use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};
use tokio::task::block_in_place;

use crate::error::{ClientError, Result};

/// Runtime a client dispatches its calls onto.
///
/// Inside an existing tokio runtime the client borrows it; otherwise the
/// client owns a multi-threaded runtime that is shut down in the background
/// when the last clone goes away.
#[derive(Debug, Clone)]
pub(crate) struct WorkerPool {
    handle: Handle,
    owned: Option<Arc<OwnedRuntime>>,
}

#[derive(Debug)]
struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

impl WorkerPool {
    pub(crate) fn current_or_owned() -> Result<Self> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(Self {
                handle,
                owned: None,
            });
        }

        let runtime = Builder::new_multi_thread()
            .thread_name("pdfgate-worker")
            .enable_all()
            .build()
            .map_err(|e| ClientError::invalid(format!("Failed to start worker runtime: {e}")))?;
        tracing::debug!("Started client-owned worker runtime");

        Ok(Self {
            handle: runtime.handle().clone(),
            owned: Some(Arc::new(OwnedRuntime(Some(runtime)))),
        })
    }

    /// Whether this pool owns its runtime
    pub(crate) const fn is_owned(&self) -> bool {
        self.owned.is_some()
    }

    /// Run a task on a worker thread, detached.
    ///
    /// An owned runtime stays alive until the task finishes, even if every
    /// clone of the pool is dropped first.
    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let keep_alive = self.owned.clone();
        drop(self.handle.spawn(async move {
            task.await;
            drop(keep_alive);
        }));
    }

    /// Block the calling thread until the future completes on the pool.
    ///
    /// Outside any runtime, and on `spawn_blocking` threads, the future is
    /// driven directly. A multi-thread runtime worker is first handed off with
    /// [`block_in_place`]. Refused inside a current-thread runtime, whose only
    /// worker would stall.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> Result<F::Output> {
        match Handle::try_current().as_ref().map(Handle::runtime_flavor) {
            Err(_) => Ok(self.handle.block_on(future)),
            Ok(RuntimeFlavor::MultiThread) => {
                Ok(block_in_place(|| self.handle.block_on(future)))
            }
            Ok(_) => Err(ClientError::invalid(
                "blocking execution is not allowed inside a current-thread runtime; use `execute().await`",
            )),
        }
    }
}
