//! Mapping engine for Rosetta model object trees.
//!
//! Given a root model object and a set of [`MappingDelegate`]s, the engine
//! sorts the delegates once into a deterministic execution order and then,
//! for each delegate in turn, walks the whole tree and invokes the delegate
//! wherever the walk reaches its model path. The walk runs on a dedicated
//! worker runtime owned by the [`MappingContext`]; the caller waits for it
//! under a time budget and never sees timeouts or dispatch failures as
//! errors, only as entries in the context's error log.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`delegate`] | `MappingDelegate` contract |
//! | [`ordering`] | `DelegateOrdering` comparator and `DeferredBranch` rules |
//! | [`processor`] | `MappingProcessor`, the per-delegate path matcher |
//! | [`context`] | `MappingContext` and `InvokedTasks` |
//! | [`engine`] | `MappingEngine`, `MappingReport`, `MappingOutcome` |
//! | [`config`] | `MappingEngineConfig` |
//! | [`errors`] | `MappingError`, `ContextError`, `ConfigError` |

pub mod config;
pub mod context;
pub mod delegate;
pub mod engine;
pub mod errors;
pub mod ordering;
pub mod processor;

pub use config::MappingEngineConfig;
pub use context::{InvokedTasks, MappingContext};
pub use delegate::MappingDelegate;
pub use engine::{MappingEngine, MappingOutcome, MappingReport};
pub use errors::{ConfigError, ContextError, MappingError};
pub use ordering::{DeferredBranch, DelegateOrdering};
pub use processor::MappingProcessor;
