//! Shared fixtures for the translation integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use model::{
    BasicValue, DataObject, ModelObject, ModelPath, SynonymPath, TypeDescriptor, TypeKind,
    TypeName,
};
use parking_lot::Mutex;
use translation::MappingDelegate;

/// Installs a test-friendly subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn ty(name: &str) -> TypeName {
    TypeName::new(name).expect("non-empty")
}

pub fn data(name: &str) -> TypeDescriptor {
    TypeDescriptor::new(ty(name), TypeKind::Data)
}

pub fn path(s: &str) -> ModelPath {
    s.parse().expect("valid model path")
}

/// Shared, ordered log of delegate invocations.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

fn describe(object: Option<&dyn ModelObject>) -> String {
    object.map_or_else(|| "absent".to_string(), |o| o.descriptor().name.to_string())
}

/// Records every action as `name action synonym value parent`.
pub struct Recording {
    name: String,
    model_path: ModelPath,
    synonym_paths: Vec<SynonymPath>,
    log: CallLog,
}

impl Recording {
    pub fn new(name: &str, model_path: &str, synonyms: &[&str], log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            model_path: path(model_path),
            synonym_paths: synonyms
                .iter()
                .map(|s| SynonymPath::new(s.split('.')))
                .collect(),
            log: Arc::clone(log),
        }
    }

    pub fn shared(name: &str, model_path: &str, synonyms: &[&str], log: &CallLog) -> Arc<dyn MappingDelegate> {
        Arc::new(Self::new(name, model_path, synonyms, log))
    }

    fn record(&self, action: &str, synonym: &SynonymPath, value: String, parent: Option<&dyn ModelObject>) {
        self.log.lock().push(format!(
            "{} {} {} {} parent={}",
            self.name,
            action,
            synonym,
            value,
            describe(parent)
        ));
    }
}

impl MappingDelegate for Recording {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_path(&self) -> &ModelPath {
        &self.model_path
    }

    fn synonym_paths(&self) -> &[SynonymPath] {
        &self.synonym_paths
    }

    fn map_object(
        &self,
        synonym_path: &SynonymPath,
        object: Option<&dyn ModelObject>,
        parent: Option<&dyn ModelObject>,
    ) -> anyhow::Result<()> {
        self.record("map_object", synonym_path, describe(object), parent);
        Ok(())
    }

    fn map_objects(
        &self,
        synonym_path: &SynonymPath,
        objects: &[&dyn ModelObject],
        parent: Option<&dyn ModelObject>,
    ) -> anyhow::Result<()> {
        self.record("map_objects", synonym_path, format!("[{}]", objects.len()), parent);
        Ok(())
    }

    fn map_basic(
        &self,
        synonym_path: &SynonymPath,
        value: Option<&BasicValue>,
        parent: Option<&dyn ModelObject>,
    ) -> anyhow::Result<()> {
        let value = value.map_or_else(|| "absent".to_string(), ToString::to_string);
        self.record("map_basic", synonym_path, value, parent);
        Ok(())
    }

    fn map_basics(
        &self,
        synonym_path: &SynonymPath,
        values: &[BasicValue],
        parent: Option<&dyn ModelObject>,
    ) -> anyhow::Result<()> {
        self.record("map_basics", synonym_path, format!("[{}]", values.len()), parent);
        Ok(())
    }
}

/// `Trade { party: Party { name }, quantity: FieldWithMetaDecimal(10) }`
pub fn trade() -> DataObject {
    let party = DataObject::new(data("Party")).with_basic("name", BasicValue::Text("Acme".into()));
    let quantity = DataObject::field_with_meta(ty("FieldWithMetaDecimal"), BasicValue::Decimal(10.0));
    DataObject::new(data("Trade"))
        .with_object("party", data("Party"), party)
        .with_object("quantity", quantity.descriptor().clone(), quantity)
}
