//! The mapping engine.
//!
//! [`MappingEngine::run`] walks a model object tree once per delegate, in
//! delegate order, dispatching each delegate at the nodes its model path
//! addresses. The whole walk, followed by the join of any invoked tasks,
//! runs as one unit of work on the context's worker runtime while the caller
//! waits for it under the configured time budget.
//!
//! `run` never raises for a timeout or a failed walk. Both are recorded in
//! the context's error log and reflected in the returned [`MappingReport`].
//! Afterwards the worker runtime is always shut down: cooperatively within
//! the grace window if the walk has finished, forcibly otherwise.

use std::sync::Arc;
use std::time::{Duration, Instant};

use model::{MappingRunId, ModelObject, ModelPath, Processor, TypeName};
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn};

use crate::config::duration_ms;
use crate::{
    DelegateOrdering, InvokedTasks, MappingContext, MappingDelegate, MappingEngineConfig,
    MappingError, MappingProcessor,
};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// How a mapping run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum MappingOutcome {
    /// Every delegate ran and every invoked task completed.
    Completed,
    /// The walk or an invoked task failed; the message is the recorded error.
    Failed(String),
    /// The caller stopped waiting; the walk may still have been running.
    TimedOut,
}

/// Summary of one [`MappingEngine::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingReport {
    /// Identifier attached to the run's tracing span.
    pub run_id: MappingRunId,
    /// How the run ended.
    pub outcome: MappingOutcome,
    /// Wall-clock time the caller spent waiting for the walk.
    pub elapsed: Duration,
    /// Number of delegates in the run's execution order.
    pub delegates: usize,
    /// Errors recorded by this run (also appended to the context's log).
    pub errors: Vec<MappingError>,
}

impl MappingReport {
    /// Returns `true` if the run completed without recording errors.
    pub fn is_success(&self) -> bool {
        self.outcome == MappingOutcome::Completed && self.errors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Applies an ordered set of mapping delegates to a model object tree.
pub struct MappingEngine {
    delegates: Arc<[Arc<dyn MappingDelegate>]>,
    context: Arc<MappingContext>,
    config: MappingEngineConfig,
}

impl MappingEngine {
    /// Creates an engine with the default configuration and ordering.
    pub fn new<I>(delegates: I, context: Arc<MappingContext>) -> Self
    where
        I: IntoIterator<Item = Arc<dyn MappingDelegate>>,
    {
        Self::with_config(delegates, context, MappingEngineConfig::default())
    }

    /// Creates an engine with `config` and the default ordering.
    pub fn with_config<I>(delegates: I, context: Arc<MappingContext>, config: MappingEngineConfig) -> Self
    where
        I: IntoIterator<Item = Arc<dyn MappingDelegate>>,
    {
        Self::with_ordering(delegates, context, config, &DelegateOrdering::default())
    }

    /// Creates an engine sorting its delegates with `ordering`.
    ///
    /// Delegates are sorted once, here; the order is never changed afterwards.
    pub fn with_ordering<I>(
        delegates: I,
        context: Arc<MappingContext>,
        config: MappingEngineConfig,
        ordering: &DelegateOrdering,
    ) -> Self
    where
        I: IntoIterator<Item = Arc<dyn MappingDelegate>>,
    {
        let mut delegates: Vec<_> = delegates.into_iter().collect();
        ordering.sort(&mut delegates);
        Self {
            delegates: delegates.into(),
            context,
            config,
        }
    }

    /// Delegates in execution order.
    pub fn ordered_delegates(&self) -> &[Arc<dyn MappingDelegate>] {
        &self.delegates
    }

    /// The engine's configuration.
    pub fn config(&self) -> &MappingEngineConfig {
        &self.config
    }

    /// The context this engine records into.
    pub fn context(&self) -> &Arc<MappingContext> {
        &self.context
    }

    /// Runs every delegate over `root`, whose simple type name `root_type`
    /// forms the root segment of every model path.
    ///
    /// Blocks the calling thread for at most the configured timeout plus the
    /// shutdown grace window. Must not be called from within an async
    /// runtime; use `spawn_blocking` there.
    pub fn run(&self, root_type: &TypeName, root: Arc<dyn ModelObject>) -> MappingReport {
        let run_id = MappingRunId::new_random();
        let span = info_span!(
            "mapping_run",
            %run_id,
            root_type = %root_type,
            delegates = self.delegates.len()
        );
        let _entered = span.enter();

        debug!("About to run {} mapping delegates", self.delegates.len());
        let started = Instant::now();

        let Some(runtime) = self.context.take_runtime() else {
            error!("Mapping worker runtime already shut down");
            let failure = MappingError::WorkerUnavailable;
            return self.finish(
                run_id,
                started,
                MappingOutcome::Failed(failure.to_string()),
                vec![failure],
            );
        };

        let mut walk = self.spawn_walk(&runtime, root_type, root, span.clone());

        debug!("Caller waits for the mapping walk to complete");
        let budget = self.config.timeout();
        // The timer must be created inside the runtime.
        let waited = runtime.block_on(async { tokio::time::timeout(budget, &mut walk).await });

        let (outcome, errors) = match waited {
            Ok(Ok(Ok(()))) => (MappingOutcome::Completed, Vec::new()),
            Ok(Ok(Err(failure))) => {
                error!(error = %failure, "Error running mapping processor");
                (MappingOutcome::Failed(failure.to_string()), vec![failure])
            }
            Ok(Err(join_error)) => {
                let failure = MappingError::Dispatch {
                    message: join_error.to_string(),
                };
                error!(error = %failure, "Mapping walk task aborted");
                (MappingOutcome::Failed(failure.to_string()), vec![failure])
            }
            Err(_elapsed) => {
                error!(budget_ms = self.config.timeout_ms, "Timeout running mapping processor");
                (
                    MappingOutcome::TimedOut,
                    vec![MappingError::Timeout {
                        budget_ms: self.config.timeout_ms,
                    }],
                )
            }
        };

        let report = self.finish(run_id, started, outcome, errors);
        info!(elapsed_ms = duration_ms(report.elapsed), "Mappers completed");

        shutdown(runtime, walk, self.config.shutdown_grace());
        report
    }

    /// Starts the walk on the runtime's blocking pool so the runtime's
    /// workers stay free to drive timers and invoked tasks.
    fn spawn_walk(
        &self,
        runtime: &Runtime,
        root_type: &TypeName,
        root: Arc<dyn ModelObject>,
        span: tracing::Span,
    ) -> JoinHandle<Result<(), MappingError>> {
        let delegates = Arc::clone(&self.delegates);
        let invoked_tasks = self.context.invoked_tasks();
        let invoked_timeout = self.config.invoked_tasks_timeout();
        let root_path = ModelPath::root(root_type.as_str());
        let handle = runtime.handle().clone();

        runtime.spawn_blocking(move || {
            let _entered = span.enter();
            walk_tree(&delegates, &root_path, root.as_ref())?;
            // The walk waits for invoked tasks; only the caller's wait is bounded.
            await_invoked(&handle, &invoked_tasks, invoked_timeout)
        })
    }

    fn finish(
        &self,
        run_id: MappingRunId,
        started: Instant,
        outcome: MappingOutcome,
        errors: Vec<MappingError>,
    ) -> MappingReport {
        for error in &errors {
            self.context.record_error(error.clone());
        }
        MappingReport {
            run_id,
            outcome,
            elapsed: started.elapsed(),
            delegates: self.delegates.len(),
            errors,
        }
    }
}

/// Runs each delegate over the whole tree, in order.
fn walk_tree(
    delegates: &[Arc<dyn MappingDelegate>],
    root_path: &ModelPath,
    root: &dyn ModelObject,
) -> Result<(), MappingError> {
    for delegate in delegates {
        info!(
            delegate = delegate.name(),
            model_path = %delegate.model_path(),
            "Running mapper"
        );
        let mut processor = MappingProcessor::new(delegate.as_ref());
        processor
            .process_object(root_path, root.descriptor(), Some(root), None)
            .and_then(|_| root.process(root_path, &mut processor))
            .map_err(|failure| MappingError::Dispatch {
                message: failure.to_string(),
            })?;
        debug!(
            delegate = delegate.name(),
            invocations = processor.invocations(),
            "Mapper finished"
        );
    }
    Ok(())
}

fn await_invoked(
    handle: &tokio::runtime::Handle,
    invoked_tasks: &InvokedTasks,
    timeout: Option<Duration>,
) -> Result<(), MappingError> {
    if invoked_tasks.pending() == 0 {
        return Ok(());
    }
    handle.block_on(invoked_tasks.await_completion_within(timeout))
}

/// Reclaims the worker runtime: waits up to `grace` for the walk to finish,
/// then shuts down cooperatively, or forcibly if the walk is still running.
fn shutdown(runtime: Runtime, mut walk: JoinHandle<Result<(), MappingError>>, grace: Duration) {
    debug!("Shutdown mapper worker runtime");
    let drained = walk.is_finished()
        || runtime
            .block_on(async { tokio::time::timeout(grace, &mut walk).await })
            .is_ok();

    if drained {
        runtime.shutdown_timeout(grace);
        debug!("All mapper threads terminated");
    } else {
        warn!(
            grace_ms = duration_ms(grace),
            "Failed to shutdown mapper runtime within grace period, forcing shutdown"
        );
        walk.abort();
        runtime.shutdown_background();
    }
}
