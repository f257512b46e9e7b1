//! Single-flight cancelable async operations
//!
//! Starting a new run aborts the one still in flight, so a slow, stale
//! request can never overwrite the result of a newer one.

use std::future::Future;
use std::marker::PhantomData;

use futures::future::{AbortHandle, Abortable, Aborted};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// Outcome of a run that did not produce a value
#[derive(Debug, Error)]
pub enum OperationError {
    /// Superseded by a newer run or aborted explicitly
    #[error("operation aborted")]
    Aborted,

    /// The wrapped future itself failed
    #[error("operation failed: {0}")]
    Failed(anyhow::Error),
}

/// Lifecycle of the most recent run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Idle,
    Pending,
    Done,
    Failed,
    Aborted,
}

struct Inner {
    generation: u64,
    handle: Option<AbortHandle>,
    status: OperationStatus,
}

/// Wraps repeated runs of the same kind of async work
pub struct Operation<T> {
    name: String,
    inner: Mutex<Inner>,
    _output: PhantomData<fn() -> T>,
}

impl<T> Operation<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(Inner {
                generation: 0,
                handle: None,
                status: OperationStatus::Idle,
            }),
            _output: PhantomData,
        }
    }

    /// Run `work`, aborting whatever run is still pending.
    ///
    /// A run that completes after being superseded reports
    /// [`OperationError::Aborted`] and leaves the status untouched.
    pub async fn run<F, E>(&self, work: F) -> Result<T, OperationError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<anyhow::Error>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let generation = {
            let mut inner = self.inner.lock();
            if let Some(previous) = inner.handle.replace(handle) {
                debug!("Aborting stale '{}' run", self.name);
                previous.abort();
            }
            inner.generation += 1;
            inner.status = OperationStatus::Pending;
            inner.generation
        };

        let outcome = Abortable::new(work, registration).await;

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return Err(OperationError::Aborted);
        }
        inner.handle = None;

        let (status, result) = match outcome {
            Ok(Ok(value)) => (OperationStatus::Done, Ok(value)),
            Ok(Err(e)) => (OperationStatus::Failed, Err(OperationError::Failed(e.into()))),
            Err(Aborted) => (OperationStatus::Aborted, Err(OperationError::Aborted)),
        };
        inner.status = status;
        result
    }

    /// Abort the pending run, if any
    pub fn abort(&self) {
        let mut inner = self.inner.lock();
        if let Some(handle) = inner.handle.take() {
            debug!("Aborting '{}' run", self.name);
            handle.abort();
            inner.status = OperationStatus::Aborted;
        }
    }

    pub fn status(&self) -> OperationStatus {
        self.inner.lock().status
    }

    pub fn is_pending(&self) -> bool {
        self.status() == OperationStatus::Pending
    }
}
