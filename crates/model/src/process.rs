//! Domain tree visitor contract.
//!
//! A model object tree exposes exactly one capability to the mapping engine:
//! [`ModelObject::process`], which reports every attribute of the object to a
//! [`Processor`] together with its path, declared type, value(s) and
//! structural parent. Descent into nested objects is driven by the object
//! itself through the helpers in this module, so the engine never needs to
//! know how a model stores its children.
//!
//! The same contract serves read-only instances and mutable builders: a
//! processor receives `&dyn ModelObject` handles and any mutation goes
//! through whatever interior mutability the model implementation offers
//! (see [`crate::DataObject`]).

use std::any::Any;
use std::fmt;

use crate::{BasicType, BasicValue, ModelPath, ProcessError, TypeDescriptor};

/// A node of a model object tree.
pub trait ModelObject: Send + Sync + fmt::Debug {
    /// The object's own type.
    fn descriptor(&self) -> &TypeDescriptor;

    /// For metadata wrappers, the basic type of the wrapped value.
    ///
    /// `None` for data objects, reference wrappers and wrappers holding a
    /// composite value.
    fn wrapped_value_type(&self) -> Option<BasicType> {
        None
    }

    /// Reports every attribute of this object, located under `path`, to
    /// `processor`, descending into nested objects the processor asks for.
    fn process(&self, path: &ModelPath, processor: &mut dyn Processor) -> Result<(), ProcessError>;

    /// Allows processors to recover the concrete handle type.
    fn as_any(&self) -> &dyn Any;
}

/// Receives the nodes of a model object tree as it is walked.
///
/// `declared` is the attribute's declared type, which for metadata wrappers
/// differs from what the value itself holds. `parent` is the object owning
/// the attribute, or `None` for the root.
pub trait Processor {
    /// A single-valued composite attribute. `object` is `None` when the
    /// attribute is absent. Returns `true` to descend into the object.
    fn process_object(
        &mut self,
        path: &ModelPath,
        declared: &TypeDescriptor,
        object: Option<&dyn ModelObject>,
        parent: Option<&dyn ModelObject>,
    ) -> Result<bool, ProcessError>;

    /// A multi-valued composite attribute, reported once for the whole list
    /// at the list's own path. Returns `true` to descend into each element.
    fn process_objects(
        &mut self,
        path: &ModelPath,
        declared: &TypeDescriptor,
        objects: &[&dyn ModelObject],
        parent: Option<&dyn ModelObject>,
    ) -> Result<bool, ProcessError>;

    /// A single-valued basic attribute.
    fn process_basic(
        &mut self,
        path: &ModelPath,
        basic_type: BasicType,
        value: Option<&BasicValue>,
        parent: Option<&dyn ModelObject>,
    ) -> Result<(), ProcessError>;

    /// A multi-valued basic attribute.
    fn process_basics(
        &mut self,
        path: &ModelPath,
        basic_type: BasicType,
        values: &[BasicValue],
        parent: Option<&dyn ModelObject>,
    ) -> Result<(), ProcessError>;
}

// ---------------------------------------------------------------------------
// Descent helpers
// ---------------------------------------------------------------------------

/// Reports a single composite attribute and, if the processor asks for it,
/// walks into the child at the same path.
pub fn process_child(
    processor: &mut dyn Processor,
    path: &ModelPath,
    declared: &TypeDescriptor,
    child: Option<&dyn ModelObject>,
    parent: &dyn ModelObject,
) -> Result<(), ProcessError> {
    let descend = processor.process_object(path, declared, child, Some(parent))?;
    if let (true, Some(child)) = (descend, child) {
        child.process(path, processor)?;
    }
    Ok(())
}

/// Reports a list attribute once at the list's path and, if the processor
/// asks for it, walks each element at `path(i)`.
///
/// Elements are not reported individually as objects; only their own
/// attributes are.
pub fn process_children(
    processor: &mut dyn Processor,
    path: &ModelPath,
    declared: &TypeDescriptor,
    children: &[&dyn ModelObject],
    parent: &dyn ModelObject,
) -> Result<(), ProcessError> {
    if processor.process_objects(path, declared, children, Some(parent))? {
        for (index, child) in children.iter().enumerate() {
            child.process(&path.with_index(index), processor)?;
        }
    }
    Ok(())
}

/// Reports a single basic attribute.
pub fn process_basic_attribute(
    processor: &mut dyn Processor,
    path: &ModelPath,
    basic_type: BasicType,
    value: Option<&BasicValue>,
    parent: &dyn ModelObject,
) -> Result<(), ProcessError> {
    processor.process_basic(path, basic_type, value, Some(parent))
}

/// Reports a multi-valued basic attribute.
pub fn process_basic_attributes(
    processor: &mut dyn Processor,
    path: &ModelPath,
    basic_type: BasicType,
    values: &[BasicValue],
    parent: &dyn ModelObject,
) -> Result<(), ProcessError> {
    processor.process_basics(path, basic_type, values, Some(parent))
}
