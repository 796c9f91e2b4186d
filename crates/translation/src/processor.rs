//! Path matching for one delegate.
//!
//! [`MappingProcessor`] is the [`Processor`] the engine hands to the model
//! tree once per delegate. At every node it decides whether the node's path
//! addresses the delegate's model path and, if so, invokes the delegate once
//! per synonym path. Matching never prunes the walk: every object callback
//! returns `true`.
//!
//! Matching rules:
//!
//! - **object**: the node's indexless path must equal the model path. A
//!   `FieldWithMeta` wrapper around a text, boolean, date, integer or decimal
//!   value at `x` is also matched by a delegate targeting the wrapped value
//!   itself (`x.value`), so both `x` and `x.value` receive the wrapper.
//! - **object list**: the list's indexless path must equal the model path,
//!   except for lists of `FieldWithMeta` or `ReferenceWithMeta`, which are
//!   matched against the model path's parent so one invocation receives the
//!   whole list.
//! - **basic** and **basic list**: the node's path must equal the model path
//!   exactly.

use model::{
    BasicType, BasicValue, ModelObject, ModelPath, ProcessError, Processor, SynonymPath,
    TypeDescriptor, TypeKind,
};
use tracing::trace;

use crate::MappingDelegate;

/// Dispatches one delegate at the nodes its model path addresses.
pub struct MappingProcessor<'d> {
    delegate: &'d dyn MappingDelegate,
    model_path: &'d ModelPath,
    model_parent: Option<ModelPath>,
    invocations: usize,
}

impl<'d> MappingProcessor<'d> {
    /// Creates a processor for `delegate`.
    pub fn new(delegate: &'d dyn MappingDelegate) -> Self {
        let model_path = delegate.model_path();
        Self {
            delegate,
            model_path,
            model_parent: model_path.parent(),
            invocations: 0,
        }
    }

    /// Number of delegate actions invoked so far.
    pub fn invocations(&self) -> usize {
        self.invocations
    }

    fn matches_object(
        &self,
        current: &ModelPath,
        declared: &TypeDescriptor,
        object: Option<&dyn ModelObject>,
    ) -> bool {
        let current = current.to_indexless();
        current == *self.model_path
            || (is_wrapped_primitive(declared, object) && self.model_parent.as_ref() == Some(&current))
    }

    fn matches_list(&self, current: &ModelPath, declared: &TypeDescriptor) -> bool {
        let current = current.to_indexless();
        if declared.kind.is_meta_container() {
            self.model_parent.as_ref() == Some(&current)
        } else {
            current == *self.model_path
        }
    }

    /// Runs `action` once per synonym path, tagging failures with `path`.
    fn dispatch<F>(&mut self, path: &ModelPath, mut action: F) -> Result<(), ProcessError>
    where
        F: FnMut(&dyn MappingDelegate, &SynonymPath) -> anyhow::Result<()>,
    {
        let delegate = self.delegate;
        trace!(delegate = delegate.name(), %path, "model path matched");
        for synonym_path in delegate.synonym_paths() {
            self.invocations += 1;
            action(delegate, synonym_path).map_err(|source| {
                ProcessError::aborted(
                    path,
                    source.context(format!(
                        "mapping delegate {} failed for synonym {}",
                        delegate.name(),
                        synonym_path
                    )),
                )
            })?;
        }
        Ok(())
    }
}

/// A `FieldWithMeta` wrapper whose value is one of the wrappable primitives.
fn is_wrapped_primitive(declared: &TypeDescriptor, object: Option<&dyn ModelObject>) -> bool {
    declared.kind == TypeKind::FieldWithMeta
        && object
            .and_then(|o| o.wrapped_value_type())
            .is_some_and(BasicType::is_wrappable_primitive)
}

impl Processor for MappingProcessor<'_> {
    fn process_object(
        &mut self,
        path: &ModelPath,
        declared: &TypeDescriptor,
        object: Option<&dyn ModelObject>,
        parent: Option<&dyn ModelObject>,
    ) -> Result<bool, ProcessError> {
        if self.matches_object(path, declared, object) {
            self.dispatch(path, |delegate, synonym| delegate.map_object(synonym, object, parent))?;
        }
        Ok(true)
    }

    fn process_objects(
        &mut self,
        path: &ModelPath,
        declared: &TypeDescriptor,
        objects: &[&dyn ModelObject],
        parent: Option<&dyn ModelObject>,
    ) -> Result<bool, ProcessError> {
        if self.matches_list(path, declared) {
            self.dispatch(path, |delegate, synonym| delegate.map_objects(synonym, objects, parent))?;
        }
        Ok(true)
    }

    fn process_basic(
        &mut self,
        path: &ModelPath,
        _basic_type: BasicType,
        value: Option<&BasicValue>,
        parent: Option<&dyn ModelObject>,
    ) -> Result<(), ProcessError> {
        if path == self.model_path {
            self.dispatch(path, |delegate, synonym| delegate.map_basic(synonym, value, parent))?;
        }
        Ok(())
    }

    fn process_basics(
        &mut self,
        path: &ModelPath,
        _basic_type: BasicType,
        values: &[BasicValue],
        parent: Option<&dyn ModelObject>,
    ) -> Result<(), ProcessError> {
        if path == self.model_path {
            self.dispatch(path, |delegate, synonym| delegate.map_basics(synonym, values, parent))?;
        }
        Ok(())
    }
}
