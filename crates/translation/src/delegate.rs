//! Mapping delegate contract.
//!
//! A delegate is a rule bound to one model path. Whenever the engine's walk
//! reaches that path it calls the matching action once for each of the
//! delegate's synonym paths. Delegates are shared across the walk task and
//! any invoked tasks they spawn, so they must be `Send + Sync`; the engine
//! never mutates them.

use model::{BasicValue, ModelObject, ModelPath, SynonymPath};

/// A rule applied when the walk reaches [`MappingDelegate::model_path`].
///
/// Every action has a no-op default so a delegate only implements the shape
/// of value it handles. `parent` is the object owning the matched attribute
/// (`None` when the match is the root object itself).
pub trait MappingDelegate: Send + Sync {
    /// Implementation identity, used to order delegates sharing a model path.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Model path this delegate targets.
    fn model_path(&self) -> &ModelPath;

    /// External-representation paths the mapped value comes from.
    fn synonym_paths(&self) -> &[SynonymPath];

    /// Called for a matched single composite value; `object` is `None` when
    /// the attribute is absent.
    fn map_object(
        &self,
        _synonym_path: &SynonymPath,
        _object: Option<&dyn ModelObject>,
        _parent: Option<&dyn ModelObject>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called for a matched list of composite values.
    fn map_objects(
        &self,
        _synonym_path: &SynonymPath,
        _objects: &[&dyn ModelObject],
        _parent: Option<&dyn ModelObject>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called for a matched single basic value; `value` is `None` when the
    /// attribute is absent.
    fn map_basic(
        &self,
        _synonym_path: &SynonymPath,
        _value: Option<&BasicValue>,
        _parent: Option<&dyn ModelObject>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called for a matched list of basic values.
    fn map_basics(
        &self,
        _synonym_path: &SynonymPath,
        _values: &[BasicValue],
        _parent: Option<&dyn ModelObject>,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}
