//! Mapping context: the worker runtime, the invoked-task list and the error
//! log shared by a mapping run and the delegates taking part in it.
//!
//! The context is created and reset by the caller. A run consumes the
//! context's worker runtime (it is shut down when the run ends), so running
//! again requires [`MappingContext::reset`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{ContextError, MappingEngineConfig, MappingError};

// ---------------------------------------------------------------------------
// Invoked tasks
// ---------------------------------------------------------------------------

/// Asynchronous work registered by delegates as a side effect of mapping.
///
/// Registered futures start immediately on the context's worker runtime. The
/// walk task joins all of them (including tasks registered by other invoked
/// tasks) before the run counts as finished. Cloning yields another handle to
/// the same list.
#[derive(Debug, Clone)]
pub struct InvokedTasks {
    handle: Handle,
    tasks: Arc<Mutex<Vec<JoinHandle<anyhow::Result<()>>>>>,
}

impl InvokedTasks {
    fn new(handle: Handle) -> Self {
        Self {
            handle,
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Spawns `task` on the worker runtime and records it for joining.
    pub fn register<F>(&self, task: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let join = self.handle.spawn(task);
        self.tasks.lock().push(join);
    }

    /// Number of registered tasks not yet joined.
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Joins every registered task, including ones registered while joining.
    ///
    /// Returns the first failure after all tasks in a batch have finished.
    pub(crate) async fn await_completion(&self) -> Result<(), MappingError> {
        loop {
            let batch = std::mem::take(&mut *self.tasks.lock());
            if batch.is_empty() {
                return Ok(());
            }
            debug!(count = batch.len(), "Awaiting invoked tasks");

            let mut first_failure = None;
            for result in join_all(batch).await {
                let failure = match result {
                    Ok(Ok(())) => continue,
                    Ok(Err(error)) => format!("{error:#}"),
                    Err(join_error) => join_error.to_string(),
                };
                first_failure.get_or_insert(MappingError::InvokedTask { message: failure });
            }
            if let Some(error) = first_failure {
                return Err(error);
            }
        }
    }

    /// As [`InvokedTasks::await_completion`], giving up after `timeout`.
    pub(crate) async fn await_completion_within(
        &self,
        timeout: Option<Duration>,
    ) -> Result<(), MappingError> {
        match timeout {
            None => self.await_completion().await,
            Some(limit) => tokio::time::timeout(limit, self.await_completion())
                .await
                .map_err(|_| MappingError::InvokedTasksTimeout {
                    timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })?,
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Execution resources and error log for mapping runs.
#[derive(Debug)]
pub struct MappingContext {
    worker_threads: usize,
    runtime: Mutex<Option<Runtime>>,
    invoked_tasks: Mutex<InvokedTasks>,
    mapping_errors: Mutex<Vec<MappingError>>,
}

impl MappingContext {
    /// Creates a context with a single worker thread.
    pub fn new() -> Result<Self, ContextError> {
        Self::with_worker_threads(1)
    }

    /// Creates a context sized from `config.worker_threads`.
    pub fn from_config(config: &MappingEngineConfig) -> Result<Self, ContextError> {
        Self::with_worker_threads(config.worker_threads)
    }

    /// Creates a context whose runtime has `worker_threads` workers.
    pub fn with_worker_threads(worker_threads: usize) -> Result<Self, ContextError> {
        let runtime = build_runtime(worker_threads)?;
        let invoked_tasks = InvokedTasks::new(runtime.handle().clone());
        Ok(Self {
            worker_threads,
            runtime: Mutex::new(Some(runtime)),
            invoked_tasks: Mutex::new(invoked_tasks),
            mapping_errors: Mutex::new(Vec::new()),
        })
    }

    /// Handle to the shared invoked-task list. Delegates keep one to
    /// register work.
    ///
    /// A handle taken before [`MappingContext::reset`] refers to the old
    /// runtime and list.
    pub fn invoked_tasks(&self) -> InvokedTasks {
        self.invoked_tasks.lock().clone()
    }

    /// Snapshot of every error recorded so far.
    pub fn mapping_errors(&self) -> Vec<MappingError> {
        self.mapping_errors.lock().clone()
    }

    /// Removes and returns every recorded error.
    pub fn take_mapping_errors(&self) -> Vec<MappingError> {
        std::mem::take(&mut *self.mapping_errors.lock())
    }

    /// Appends an error to the log.
    pub fn record_error(&self, error: MappingError) {
        self.mapping_errors.lock().push(error);
    }

    /// Returns `true` while the worker runtime has not been consumed by a run.
    pub fn is_available(&self) -> bool {
        self.runtime.lock().is_some()
    }

    /// Replaces the worker runtime and invoked-task list and clears the
    /// error log. A runtime still held is shut down without waiting.
    pub fn reset(&self) -> Result<(), ContextError> {
        let runtime = build_runtime(self.worker_threads)?;
        *self.invoked_tasks.lock() = InvokedTasks::new(runtime.handle().clone());
        if let Some(previous) = self.runtime.lock().replace(runtime) {
            previous.shutdown_background();
        }
        self.mapping_errors.lock().clear();
        Ok(())
    }

    pub(crate) fn take_runtime(&self) -> Option<Runtime> {
        self.runtime.lock().take()
    }
}

fn build_runtime(worker_threads: usize) -> Result<Runtime, ContextError> {
    if worker_threads == 0 {
        return Err(ContextError::NoWorkers);
    }
    Ok(Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .thread_name("mapping-worker")
        .enable_all()
        .build()?)
}
