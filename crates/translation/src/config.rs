//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default time the caller waits for a mapping run.
pub const DEFAULT_TIMEOUT_MS: u64 = 800;

/// Default grace window for a cooperative worker shutdown.
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 200;

/// Tunables for a [`crate::MappingEngine`] and the [`crate::MappingContext`]
/// it runs in.
///
/// Every field has a default, so a partial JSON document such as
/// `{"timeout_ms": 2000}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingEngineConfig {
    /// How long `run` waits for the walk to report completion.
    pub timeout_ms: u64,

    /// How long the worker runtime is given to wind down cooperatively
    /// before it is shut down forcibly.
    pub shutdown_grace_ms: u64,

    /// Worker threads in the context's runtime.
    pub worker_threads: usize,

    /// Optional bound on the wait for invoked tasks once the walk itself has
    /// finished. `None` waits for every invoked task to complete.
    pub invoked_tasks_timeout_ms: Option<u64>,
}

impl Default for MappingEngineConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            shutdown_grace_ms: DEFAULT_SHUTDOWN_GRACE_MS,
            worker_threads: 1,
            invoked_tasks_timeout_ms: None,
        }
    }
}

impl MappingEngineConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects a zero timeout or a zero worker count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "timeout_ms must be greater than zero".to_string(),
            });
        }
        if self.worker_threads == 0 {
            return Err(ConfigError::Invalid {
                message: "worker_threads must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Returns a copy with the run timeout replaced.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_ms(timeout);
        self
    }

    /// Returns a copy with the shutdown grace window replaced.
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace_ms = duration_ms(grace);
        self
    }

    /// Returns a copy with the invoked-task wait bounded by `timeout`.
    pub fn with_invoked_tasks_timeout(mut self, timeout: Duration) -> Self {
        self.invoked_tasks_timeout_ms = Some(duration_ms(timeout));
        self
    }

    /// Run timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Shutdown grace window.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    /// Invoked-task wait bound, if any.
    pub fn invoked_tasks_timeout(&self) -> Option<Duration> {
        self.invoked_tasks_timeout_ms.map(Duration::from_millis)
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
