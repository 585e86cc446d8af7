use crate::value::merge;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

/// Key under which a type definition carries its default model.
pub const MODEL_KEY: &str = "model";

/// Named type definitions ("defaults"), stored as opaque JSON.
#[derive(Debug, Default)]
pub struct DefaultsStore {
    definitions: RwLock<FxHashMap<String, Value>>,
}

impl DefaultsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<Value> {
        self.definitions.read().get(type_name).cloned()
    }

    /// Replaces the definition of `type_name`, returning the previous one.
    pub fn set(&self, type_name: impl Into<String>, definition: Value) -> Option<Value> {
        let type_name = type_name.into();
        debug!(type_name = %type_name, "Type definition stored");
        self.definitions.write().insert(type_name, definition)
    }

    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.definitions.read().contains_key(type_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.read().is_empty()
    }

    /// The model a new component of `type_name` starts with: the definition's default
    /// `model` object with `overrides` deep-merged on top.
    ///
    /// Without a stored default model the overrides are used as they are.
    #[must_use]
    pub fn initial_model(&self, type_name: &str, overrides: Value) -> Value {
        let defaults = self
            .definitions
            .read()
            .get(type_name)
            .and_then(|definition| definition.get(MODEL_KEY))
            .filter(|model| model.is_object())
            .cloned();

        match (defaults, overrides) {
            (Some(defaults), Value::Null) => defaults,
            (Some(defaults), overrides) => merge(defaults, overrides),
            (None, overrides) => overrides,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_replaces_definition() {
        let store = DefaultsStore::new();
        assert!(store.get("Light").is_none());
        assert!(store.set("Light", json!({"v": 1})).is_none());
        assert_eq!(store.set("Light", json!({"v": 2})), Some(json!({"v": 1})));
        assert_eq!(store.get("Light"), Some(json!({"v": 2})));
        assert!(store.contains("Light"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_initial_model_merges_defaults_under_overrides() {
        let store = DefaultsStore::new();
        store.set("Light", json!({"model": {"brightness": 100, "color": {"r": 255, "g": 255}}}));

        let model = store.initial_model("Light", json!({"color": {"g": 0}}));
        assert_eq!(model, json!({"brightness": 100, "color": {"r": 255, "g": 0}}));

        assert_eq!(store.initial_model("Light", Value::Null), json!({"brightness": 100, "color": {"r": 255, "g": 255}}));
    }

    #[test]
    fn test_initial_model_without_defaults() {
        let store = DefaultsStore::new();
        store.set("Opaque", json!({"model": 5}));

        assert_eq!(store.initial_model("Unknown", json!({"a": 1})), json!({"a": 1}));
        assert_eq!(store.initial_model("Opaque", json!({"a": 1})), json!({"a": 1}));
    }
}
