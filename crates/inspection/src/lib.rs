//! Inspection of the model type graph.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`path_trail`] | `PathTrail<T>`, the append-only lineage record |
//! | [`node`] | `Node` capability trait and the lazy `NodeInspector` |
//! | [`type_graph`] | `TypeGraphNode` and `TypeGraphExplorer` |
//!
//! Exploration is read-only and defines no failure condition: a lineage
//! that would revisit one of its own ancestor types is simply not expanded.

pub mod node;
pub mod path_trail;
pub mod type_graph;

pub use node::{Node, NodeInspector};
pub use path_trail::{PathTrail, TrailStep};
pub use type_graph::{TypeGraphExplorer, TypeGraphNode};
