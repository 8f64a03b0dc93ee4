#![forbid(unsafe_code)]

//! Backing-store adapter.
//!
//! A backing store is either a keyed [`Object`] (direct property access) or
//! an associative [`Map`] (`get`/`set` calls). [`Store`] puts both behind one
//! surface so the registrar never branches on the shape.

use crate::error::{Result, VeneerError};
use crate::key::Key;
use crate::map::Map;
use crate::object::Object;
use crate::value::Value;

/// A container holding real, non-accessor values.
#[derive(Clone, Debug)]
pub enum Store {
    Object(Object),
    Map(Map),
}

impl Default for Store {
    fn default() -> Self {
        Self::plain()
    }
}

impl Store {
    /// A fresh, empty object-literal store.
    #[must_use]
    pub fn plain() -> Self {
        Self::Object(Object::plain())
    }

    pub fn read(&self, key: &Key) -> Value {
        match self {
            Self::Object(object) => object.get(key),
            Self::Map(map) => map.get(key),
        }
    }

    pub fn write(&self, key: &Key, value: Value) {
        match self {
            Self::Object(object) => object.set(key, value),
            Self::Map(map) => map.set(key, value),
        }
    }

    /// Remove `key`. Returns whether it existed.
    pub fn remove(&self, key: &Key) -> bool {
        match self {
            Self::Object(object) => object.delete(key),
            Self::Map(map) => map.delete(key),
        }
    }

    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        match self {
            Self::Object(object) => object.has_own(key),
            Self::Map(map) => map.has(key),
        }
    }

    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        match self {
            Self::Object(object) => object.own_keys(),
            Self::Map(map) => map.keys(),
        }
    }

    /// Whether this store is the very container `object` points at.
    #[must_use]
    pub fn is_object(&self, object: &Object) -> bool {
        matches!(self, Self::Object(own) if own.ptr_eq(object))
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(object) => Value::Object(object.clone()),
            Self::Map(map) => Value::Map(map.clone()),
        }
    }
}

impl From<Object> for Store {
    fn from(object: Object) -> Self {
        Self::Object(object)
    }
}

impl From<Map> for Store {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl TryFrom<Value> for Store {
    type Error = VeneerError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Self::Object(object)),
            Value::Map(map) => Ok(Self::Map(map)),
            other => Err(VeneerError::invalid(format!(
                "backing store must be an object or map, got {}",
                other.type_name()
            ))),
        }
    }
}

/// One key of one store; handed to setter hooks as the default writer.
#[derive(Clone, Debug)]
pub struct Slot {
    store: Store,
    key: Key,
}

impl Slot {
    #[must_use]
    pub fn new(store: Store, key: Key) -> Self {
        Self { store, key }
    }

    #[must_use]
    pub fn get(&self) -> Value {
        self.store.read(&self.key)
    }

    pub fn set(&self, value: impl Into<Value>) {
        self.store.write(&self.key, value.into());
    }

    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_shapes_behave_alike() {
        let key = Key::name("k");
        for store in [Store::plain(), Store::from(Map::new())] {
            assert!(!store.contains(&key));
            store.write(&key, Value::from(5));
            assert_eq!(store.read(&key), Value::from(5));
            assert_eq!(store.keys(), vec![key.clone()]);
            assert!(store.remove(&key));
            assert!(!store.remove(&key));
        }
    }

    #[test]
    fn non_containers_are_rejected() {
        let err = Store::try_from(Value::from(3)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("number"));
        assert!(Store::try_from(Value::from(Object::sequence())).is_ok());
    }

    #[test]
    fn slot_reads_and_writes_its_key() {
        let object = Object::plain();
        let slot = Slot::new(Store::from(object.clone()), Key::name("v"));
        slot.set("x");
        assert_eq!(object.get("v"), Value::from("x"));
        assert_eq!(slot.get(), Value::from("x"));
        assert_eq!(slot.key(), &Key::name("v"));
        assert!(slot.store().is_object(&object));
    }
}
