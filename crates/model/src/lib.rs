//! Model ports for the Rosetta mapping engine.
//!
//! This crate defines every domain concept the mapping engine and the type
//! graph explorer consume: identifiers, model and synonym paths, basic
//! values, type descriptors, the type schema provider and the domain tree
//! visitor contract. Model implementations plug in by implementing the
//! traits defined here; the engine never sees concrete model classes.
//!
//! ## Architectural Layer
//!
//! **Port definitions.** This crate has no I/O and no async runtime. It
//! defines *what* the engine needs from a model; the model owner defines
//! *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`TypeName`, `AttributeName`, `MappingRunId`) |
//! | [`paths`] | `ModelPath` and `SynonymPath` |
//! | [`values`] | `BasicType`, `BasicValue`, `TypeKind`, `TypeDescriptor` |
//! | [`schema`] | `TypeSchemaProvider` port and the table-backed `StaticSchema` |
//! | [`process`] | `ModelObject` / `Processor` visitor contract and descent helpers |
//! | [`data`] | `DataObject`, an in-memory model tree |
//! | [`errors`] | `PathParseError`, `ProcessError` |

pub mod data;
pub mod errors;
pub mod identifiers;
pub mod paths;
pub mod process;
pub mod schema;
pub mod values;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use data::{AttributeValue, DataObject};
pub use errors::{PathParseError, ProcessError};
pub use identifiers::{AttributeName, MappingRunId, TypeName};
pub use paths::{ModelPath, PathElement, SynonymPath};
pub use process::{ModelObject, Processor};
pub use schema::{AttributeDescriptor, StaticSchema, TypeSchemaProvider};
pub use values::{BasicType, BasicValue, TypeDescriptor, TypeKind};
