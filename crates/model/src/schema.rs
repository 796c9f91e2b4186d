//! Type schema provider port.
//!
//! Replaces runtime introspection of generated model classes: whoever owns
//! the model supplies a [`TypeSchemaProvider`] listing each type's attributes.
//! [`StaticSchema`] is a table-backed implementation suitable for generated
//! lookup tables and tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AttributeName, TypeName};

/// One attribute declared on a model type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name as it appears in model paths.
    pub name: AttributeName,
    /// Simple name of the attribute's declared type.
    pub declared_type: TypeName,
    /// Whether the declared type has attributes of its own.
    pub is_composite: bool,
    /// Whether the attribute holds a list.
    pub is_multivalued: bool,
}

impl AttributeDescriptor {
    /// Creates a single-valued attribute descriptor.
    pub fn new(name: AttributeName, declared_type: TypeName, is_composite: bool) -> Self {
        Self {
            name,
            declared_type,
            is_composite,
            is_multivalued: false,
        }
    }

    /// Marks the attribute as multi-valued.
    pub fn multivalued(mut self) -> Self {
        self.is_multivalued = true;
        self
    }
}

/// Supplies the attributes of model types by name.
///
/// Implementations must be a pure, stable function of the type name: the
/// type graph explorer re-derives children on every call and relies on the
/// answer never changing.
pub trait TypeSchemaProvider {
    /// Attributes declared on `type_name`, in declaration order.
    ///
    /// Unknown types have no attributes.
    fn attributes_of(&self, type_name: &TypeName) -> Vec<AttributeDescriptor>;

    /// Whether `type_name` is a composite (non-basic) type.
    fn is_composite(&self, type_name: &TypeName) -> bool;
}

impl<T: TypeSchemaProvider + ?Sized> TypeSchemaProvider for &T {
    fn attributes_of(&self, type_name: &TypeName) -> Vec<AttributeDescriptor> {
        (**self).attributes_of(type_name)
    }

    fn is_composite(&self, type_name: &TypeName) -> bool {
        (**self).is_composite(type_name)
    }
}

// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct TypeEntry {
    composite: bool,
    attributes: Vec<AttributeDescriptor>,
}

/// A [`TypeSchemaProvider`] backed by an in-memory table.
///
/// ```
/// use model::{AttributeDescriptor, AttributeName, StaticSchema, TypeName, TypeSchemaProvider};
///
/// let trade = TypeName::new("Trade").unwrap();
/// let party = TypeName::new("Party").unwrap();
/// let party_attr = AttributeName::new("party").unwrap();
///
/// let schema = StaticSchema::new()
///     .with_type(trade.clone(), true)
///     .with_attribute(&trade, AttributeDescriptor::new(party_attr, party.clone(), true));
///
/// assert_eq!(schema.attributes_of(&trade).len(), 1);
/// assert!(schema.is_composite(&party));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    types: HashMap<TypeName, TypeEntry>,
}

impl StaticSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `type_name`, marking it composite or basic.
    ///
    /// Re-declaring a type updates its composite flag and keeps its attributes.
    pub fn with_type(mut self, type_name: TypeName, composite: bool) -> Self {
        self.types.entry(type_name).or_default().composite = composite;
        self
    }

    /// Appends an attribute to `owner`, declaring `owner` as composite if it
    /// was not yet known. The attribute's declared type is registered with
    /// the attribute's composite flag unless already declared.
    pub fn with_attribute(mut self, owner: &TypeName, attribute: AttributeDescriptor) -> Self {
        self.types
            .entry(attribute.declared_type.clone())
            .or_insert_with(|| TypeEntry {
                composite: attribute.is_composite,
                attributes: Vec::new(),
            });
        let entry = self.types.entry(owner.clone()).or_insert_with(|| TypeEntry {
            composite: true,
            attributes: Vec::new(),
        });
        entry.attributes.push(attribute);
        self
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are declared.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeSchemaProvider for StaticSchema {
    fn attributes_of(&self, type_name: &TypeName) -> Vec<AttributeDescriptor> {
        self.types
            .get(type_name)
            .map(|entry| entry.attributes.clone())
            .unwrap_or_default()
    }

    fn is_composite(&self, type_name: &TypeName) -> bool {
        self.types.get(type_name).is_some_and(|entry| entry.composite)
    }
}
