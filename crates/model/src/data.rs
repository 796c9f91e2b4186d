//! In-memory model object tree.
//!
//! [`DataObject`] is a generic, dynamically-typed model node implementing
//! [`ModelObject`]. Handles are cheap to clone and share one underlying node,
//! and attributes can be written through any handle, so a mapping delegate
//! that receives a parent handle can populate it while the walk is running.

use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::process::{
    process_basic_attribute, process_basic_attributes, process_child, process_children,
};
use crate::{
    BasicType, BasicValue, ModelObject, ModelPath, ProcessError, Processor, TypeDescriptor,
    TypeKind, TypeName,
};

/// Value held by one attribute of a [`DataObject`].
#[derive(Debug, Clone)]
pub enum AttributeValue {
    /// Single composite value, possibly absent.
    Object {
        /// Declared type of the attribute.
        declared: TypeDescriptor,
        /// The value, if present.
        value: Option<DataObject>,
    },
    /// List of composite values.
    Objects {
        /// Declared element type.
        declared: TypeDescriptor,
        /// The elements.
        values: Vec<DataObject>,
    },
    /// Single scalar value, possibly absent.
    Basic {
        /// Declared scalar type.
        basic_type: BasicType,
        /// The value, if present.
        value: Option<BasicValue>,
    },
    /// List of scalar values.
    Basics {
        /// Declared scalar type.
        basic_type: BasicType,
        /// The elements.
        values: Vec<BasicValue>,
    },
}

#[derive(Debug)]
struct Node {
    descriptor: TypeDescriptor,
    wrapped: Option<BasicType>,
    attributes: RwLock<Vec<(String, AttributeValue)>>,
}

/// Shared handle to an in-memory model node.
///
/// Attributes are kept in insertion order; that order is the order in which
/// [`ModelObject::process`] reports them.
#[derive(Debug, Clone)]
pub struct DataObject {
    node: Arc<Node>,
}

impl DataObject {
    /// Creates an object of the given type with no attributes.
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self::with_wrapped(descriptor, None)
    }

    fn with_wrapped(descriptor: TypeDescriptor, wrapped: Option<BasicType>) -> Self {
        Self {
            node: Arc::new(Node {
                descriptor,
                wrapped,
                attributes: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Creates a `FieldWithMeta` wrapper around a basic value, stored in its
    /// `value` attribute.
    pub fn field_with_meta(type_name: TypeName, value: BasicValue) -> Self {
        let basic_type = value.basic_type();
        let wrapper = Self::with_wrapped(
            TypeDescriptor::new(type_name, TypeKind::FieldWithMeta),
            Some(basic_type),
        );
        wrapper.set(
            "value",
            AttributeValue::Basic {
                basic_type,
                value: Some(value),
            },
        );
        wrapper
    }

    /// Creates a `ReferenceWithMeta` wrapper around a composite value, stored
    /// in its `value` attribute.
    pub fn reference_with_meta(type_name: TypeName, declared: TypeDescriptor, value: DataObject) -> Self {
        let wrapper = Self::new(TypeDescriptor::new(type_name, TypeKind::ReferenceWithMeta));
        wrapper.set(
            "value",
            AttributeValue::Object {
                declared,
                value: Some(value),
            },
        );
        wrapper
    }

    // -----------------------------------------------------------------------
    // Builder-style population
    // -----------------------------------------------------------------------

    /// Adds a single composite attribute.
    pub fn with_object(self, name: &str, declared: TypeDescriptor, value: DataObject) -> Self {
        self.set(
            name,
            AttributeValue::Object {
                declared,
                value: Some(value),
            },
        );
        self
    }

    /// Declares a single composite attribute without a value.
    pub fn with_absent_object(self, name: &str, declared: TypeDescriptor) -> Self {
        self.set(name, AttributeValue::Object { declared, value: None });
        self
    }

    /// Adds a list attribute of composite values.
    pub fn with_objects(self, name: &str, declared: TypeDescriptor, values: Vec<DataObject>) -> Self {
        self.set(name, AttributeValue::Objects { declared, values });
        self
    }

    /// Adds a single basic attribute.
    pub fn with_basic(self, name: &str, value: BasicValue) -> Self {
        self.set_basic(name, value);
        self
    }

    /// Adds a list attribute of basic values.
    pub fn with_basics(self, name: &str, basic_type: BasicType, values: Vec<BasicValue>) -> Self {
        self.set(name, AttributeValue::Basics { basic_type, values });
        self
    }

    // -----------------------------------------------------------------------
    // Mutation through a shared handle
    // -----------------------------------------------------------------------

    /// Replaces attribute `name`, or appends it if not yet present.
    pub fn set(&self, name: &str, value: AttributeValue) {
        let mut attributes = self.node.attributes.write();
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => attributes.push((name.to_string(), value)),
        }
    }

    /// Sets a single basic attribute.
    pub fn set_basic(&self, name: &str, value: BasicValue) {
        self.set(
            name,
            AttributeValue::Basic {
                basic_type: value.basic_type(),
                value: Some(value),
            },
        );
    }

    /// Sets a single composite attribute.
    pub fn set_object(&self, name: &str, declared: TypeDescriptor, value: Option<DataObject>) {
        self.set(name, AttributeValue::Object { declared, value });
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Snapshot of attribute `name`.
    pub fn get(&self, name: &str) -> Option<AttributeValue> {
        self.node
            .attributes
            .read()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// The value of a single composite attribute, if present.
    pub fn object(&self, name: &str) -> Option<DataObject> {
        match self.get(name)? {
            AttributeValue::Object { value, .. } => value,
            _ => None,
        }
    }

    /// The elements of a composite list attribute; empty if absent.
    pub fn objects(&self, name: &str) -> Vec<DataObject> {
        match self.get(name) {
            Some(AttributeValue::Objects { values, .. }) => values,
            _ => Vec::new(),
        }
    }

    /// The value of a single basic attribute, if present.
    pub fn basic(&self, name: &str) -> Option<BasicValue> {
        match self.get(name)? {
            AttributeValue::Basic { value, .. } => value,
            _ => None,
        }
    }

    /// Attribute names in reporting order.
    pub fn attribute_names(&self) -> Vec<String> {
        self.node
            .attributes
            .read()
            .iter()
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Returns `true` if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &DataObject) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Recovers a [`DataObject`] handle from a processor argument.
    pub fn from_model(object: &dyn ModelObject) -> Option<&DataObject> {
        object.as_any().downcast_ref::<DataObject>()
    }
}

impl ModelObject for DataObject {
    fn descriptor(&self) -> &TypeDescriptor {
        &self.node.descriptor
    }

    fn wrapped_value_type(&self) -> Option<BasicType> {
        self.node.wrapped
    }

    fn process(&self, path: &ModelPath, processor: &mut dyn Processor) -> Result<(), ProcessError> {
        // Snapshot so processors may write through this handle mid-walk.
        let attributes = self.node.attributes.read().clone();

        for (name, attribute) in &attributes {
            let sub_path = path.new_sub_path(name.as_str());
            match attribute {
                AttributeValue::Object { declared, value } => process_child(
                    processor,
                    &sub_path,
                    declared,
                    value.as_ref().map(|v| v as &dyn ModelObject),
                    self,
                )?,
                AttributeValue::Objects { declared, values } => {
                    let children: Vec<&dyn ModelObject> =
                        values.iter().map(|v| v as &dyn ModelObject).collect();
                    process_children(processor, &sub_path, declared, &children, self)?
                }
                AttributeValue::Basic { basic_type, value } => {
                    process_basic_attribute(processor, &sub_path, *basic_type, value.as_ref(), self)?
                }
                AttributeValue::Basics { basic_type, values } => {
                    process_basic_attributes(processor, &sub_path, *basic_type, values, self)?
                }
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
