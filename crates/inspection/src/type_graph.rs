//! Cycle-guarded exploration of the model type graph.
//!
//! Starting from a root type, [`TypeGraphExplorer::explore`] lazily
//! enumerates every attribute path reachable through the schema. Each
//! [`TypeGraphNode`] carries a [`PathTrail`] of type names describing its own
//! lineage; a node whose type already occurs among its strict ancestors is
//! guarded and not expanded, which keeps the walk finite on self-referential
//! schemas while still allowing the same type to appear in unrelated
//! branches.

use std::collections::BTreeSet;

use model::{AttributeDescriptor, TypeName, TypeSchemaProvider};
use tracing::trace;

use crate::node::{Node, NodeInspector};
use crate::path_trail::PathTrail;

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// One attribute path in the type graph.
#[derive(Debug)]
pub struct TypeGraphNode<'s, S: ?Sized> {
    schema: &'s S,
    trail: PathTrail<TypeName>,
    attribute: Option<AttributeDescriptor>,
    composite: bool,
}

impl<S: ?Sized> Clone for TypeGraphNode<'_, S> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema,
            trail: self.trail.clone(),
            attribute: self.attribute.clone(),
            composite: self.composite,
        }
    }
}

impl<'s, S: TypeSchemaProvider + ?Sized> TypeGraphNode<'s, S> {
    /// Root node for `type_name`: a single step labelled with the type's own name.
    pub fn root(schema: &'s S, type_name: &TypeName) -> Self {
        Self {
            schema,
            trail: PathTrail::root(type_name.as_str(), type_name.clone()),
            attribute: None,
            composite: schema.is_composite(type_name),
        }
    }

    /// The node's lineage of type names.
    pub fn trail(&self) -> &PathTrail<TypeName> {
        &self.trail
    }

    /// The node's own type.
    pub fn type_name(&self) -> &TypeName {
        self.trail.value()
    }

    /// The attribute that led here, `None` for the root.
    pub fn attribute(&self) -> Option<&AttributeDescriptor> {
        self.attribute.as_ref()
    }

    /// Number of steps from the root (the root has depth 1).
    pub fn depth(&self) -> usize {
        self.trail.len()
    }
}

impl<S: TypeSchemaProvider + ?Sized> Node for TypeGraphNode<'_, S> {
    type Item = PathTrail<TypeName>;

    fn children(&self) -> Vec<Self> {
        self.schema
            .attributes_of(self.type_name())
            .into_iter()
            .map(|attribute| Self {
                schema: self.schema,
                trail: self
                    .trail
                    .append(attribute.name.as_str(), attribute.declared_type.clone()),
                composite: attribute.is_composite,
                attribute: Some(attribute),
            })
            .collect()
    }

    fn get(&self) -> &PathTrail<TypeName> {
        &self.trail
    }

    fn is_guarded(&self) -> bool {
        let own = self.type_name();
        let mut ancestors = self.trail.values();
        ancestors.next_back();
        let guarded = ancestors.any(|ancestor| ancestor == own);
        if guarded {
            trace!(path = %self.trail, "type already on lineage, not expanding");
        }
        guarded
    }

    fn should_inspect(&self) -> bool {
        self.composite
    }
}

// ---------------------------------------------------------------------------
// Explorer
// ---------------------------------------------------------------------------

/// Enumerates the type graph reachable from a root type.
///
/// Restartable: every call to [`TypeGraphExplorer::explore`] re-derives the
/// sequence from the schema provider.
#[derive(Debug)]
pub struct TypeGraphExplorer<'s, S: ?Sized> {
    schema: &'s S,
}

impl<S: ?Sized> Clone for TypeGraphExplorer<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for TypeGraphExplorer<'_, S> {}

impl<'s, S: TypeSchemaProvider + ?Sized> TypeGraphExplorer<'s, S> {
    /// Creates an explorer over `schema`.
    pub fn new(schema: &'s S) -> Self {
        Self { schema }
    }

    /// Root node for `type_name`.
    pub fn root(&self, type_name: &TypeName) -> TypeGraphNode<'s, S> {
        TypeGraphNode::root(self.schema, type_name)
    }

    /// Lazy depth-first sequence of every node reachable from `type_name`,
    /// the root included. Guarded nodes are yielded but not expanded.
    pub fn explore(&self, type_name: &TypeName) -> NodeInspector<TypeGraphNode<'s, S>> {
        NodeInspector::new(self.root(type_name))
    }

    /// Every composite type reachable from `type_name`, the root included.
    pub fn reachable_types(&self, type_name: &TypeName) -> BTreeSet<TypeName> {
        self.explore(type_name)
            .filter(|node| node.should_inspect())
            .map(|node| node.type_name().clone())
            .collect()
    }
}
