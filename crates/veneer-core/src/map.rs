#![forbid(unsafe_code)]

//! Associative map backing stores.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::RandomState;
use indexmap::IndexMap;

use crate::key::Key;
use crate::value::Value;

/// Shared handle to an insertion-ordered `Key -> Value` map.
///
/// Unlike [`Object`](crate::Object), a map holds no accessors; it only ever
/// serves as a backing store.
#[derive(Clone, Default)]
pub struct Map {
    inner: Rc<RefCell<IndexMap<Key, Value, RandomState>>>,
}

impl Map {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = Self::new();
        for (key, value) in entries {
            map.set(key, value);
        }
        map
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn get(&self, key: impl Into<Key>) -> Value {
        self.inner
            .borrow()
            .get(&key.into())
            .cloned()
            .unwrap_or_default()
    }

    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) {
        self.inner.borrow_mut().insert(key.into(), value.into());
    }

    pub fn delete(&self, key: impl Into<Key>) -> bool {
        let removed = self.inner.borrow_mut().shift_remove(&key.into());
        removed.is_some()
    }

    #[must_use]
    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.inner.borrow().contains_key(&key.into())
    }

    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        self.inner.borrow().keys().cloned().collect()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<(Key, Value)> {
        self.inner
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> Map {
        let copy = Map::new();
        for (key, value) in self.entries() {
            copy.set(key, value.snapshot());
        }
        copy
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        f.write_str("Map ")?;
        f.debug_map()
            .entries(entries.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}
