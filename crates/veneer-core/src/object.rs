#![forbid(unsafe_code)]

//! Keyed containers with data and accessor properties.
//!
//! # Design
//!
//! [`Object`] is a shared handle (`Rc<RefCell<..>>`) to an ordered property
//! table. A property is either plain data or an [`Accessor`] whose `get` and
//! `set` run on every read and write of that key.
//!
//! # Invariants
//!
//! 1. No interior borrow is held while an accessor runs, so an accessor may
//!    freely read or write any container, including the one it lives on.
//! 2. Every property is re-definable: `define_accessor` on an existing key
//!    replaces it in place and keeps its position.
//! 3. `keys()` lists indices ascending first, then names in insertion order.
//!    Symbols are listed separately by `symbols()`.
//!
//! # Failure Modes
//!
//! - **Cyclic graphs**: `snapshot()` and `Debug` recurse without a visited
//!   set and overflow the stack on cycles.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::RandomState;
use indexmap::IndexMap;

use crate::key::Key;
use crate::value::Value;

/// Read/write hooks installed on an object property.
pub trait Accessor {
    /// Produce the property's current value.
    fn get(&self) -> Value;

    /// Handle a write to the property.
    fn set(&self, value: Value);
}

/// What an object represents; drives the default depth filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ObjectKind {
    /// An object literal.
    #[default]
    Plain,
    /// An ordered, index-keyed sequence.
    Sequence,
    /// A record of a named class; not a literal.
    Instance(Rc<str>),
}

#[derive(Clone)]
enum Property {
    Data {
        value: Value,
        enumerable: bool,
    },
    Accessor {
        accessor: Rc<dyn Accessor>,
        enumerable: bool,
    },
}

impl Property {
    fn data(value: Value) -> Self {
        Self::Data {
            value,
            enumerable: true,
        }
    }

    fn enumerable(&self) -> bool {
        match self {
            Self::Data { enumerable, .. } | Self::Accessor { enumerable, .. } => *enumerable,
        }
    }
}

#[derive(Default)]
struct ObjectData {
    kind: ObjectKind,
    props: IndexMap<Key, Property, RandomState>,
}

/// Shared handle to a keyed container.
///
/// Cloning an `Object` creates a new handle to the **same** properties.
#[derive(Clone, Default)]
pub struct Object {
    inner: Rc<RefCell<ObjectData>>,
}

impl Object {
    #[must_use]
    pub fn with_kind(kind: ObjectKind) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObjectData {
                kind,
                props: IndexMap::default(),
            })),
        }
    }

    /// An empty object literal.
    #[must_use]
    pub fn plain() -> Self {
        Self::with_kind(ObjectKind::Plain)
    }

    /// An empty sequence.
    #[must_use]
    pub fn sequence() -> Self {
        Self::with_kind(ObjectKind::Sequence)
    }

    /// An empty record of the named class.
    #[must_use]
    pub fn instance(class: impl Into<Rc<str>>) -> Self {
        Self::with_kind(ObjectKind::Instance(class.into()))
    }

    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let object = Self::plain();
        for (key, value) in entries {
            object.set(key, value);
        }
        object
    }

    pub fn from_items<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let object = Self::sequence();
        for (index, value) in items.into_iter().enumerate() {
            object.set(index, value);
        }
        object
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.inner.borrow().kind.clone()
    }

    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.inner.borrow().kind == ObjectKind::Plain
    }

    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.inner.borrow().kind == ObjectKind::Sequence
    }

    /// Whether both handles point at the same container.
    #[must_use]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Read a property, running its accessor if it has one.
    ///
    /// Missing keys read as `Undefined`.
    pub fn get(&self, key: impl Into<Key>) -> Value {
        let key = key.into();
        let property = self.inner.borrow().props.get(&key).cloned();
        match property {
            Some(Property::Data { value, .. }) => value,
            Some(Property::Accessor { accessor, .. }) => accessor.get(),
            None => Value::Undefined,
        }
    }

    /// Write a property, running its accessor if it has one.
    ///
    /// Missing keys become enumerable data properties.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let accessor = {
            let mut data = self.inner.borrow_mut();
            match data.props.get_mut(&key) {
                Some(Property::Accessor { accessor, .. }) => Rc::clone(accessor),
                Some(Property::Data { value: current, .. }) => {
                    *current = value;
                    return;
                }
                None => {
                    data.props.insert(key, Property::data(value));
                    return;
                }
            }
        };
        accessor.set(value);
    }

    /// Define (or redefine) `key` as an accessor property.
    pub fn define_accessor(&self, key: impl Into<Key>, accessor: Rc<dyn Accessor>, enumerable: bool) {
        self.inner.borrow_mut().props.insert(
            key.into(),
            Property::Accessor {
                accessor,
                enumerable,
            },
        );
    }

    /// Define (or redefine) `key` as a data property.
    pub fn define_value(&self, key: impl Into<Key>, value: impl Into<Value>, enumerable: bool) {
        self.inner.borrow_mut().props.insert(
            key.into(),
            Property::Data {
                value: value.into(),
                enumerable,
            },
        );
    }

    /// Remove an own property. Returns whether it existed.
    pub fn delete(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        // Taken out before drop so an accessor's destructor never runs under the borrow.
        let removed = self.inner.borrow_mut().props.shift_remove(&key);
        removed.is_some()
    }

    #[must_use]
    pub fn has_own(&self, key: impl Into<Key>) -> bool {
        self.inner.borrow().props.contains_key(&key.into())
    }

    #[must_use]
    pub fn is_accessor(&self, key: impl Into<Key>) -> bool {
        matches!(
            self.inner.borrow().props.get(&key.into()),
            Some(Property::Accessor { .. })
        )
    }

    #[must_use]
    pub fn is_enumerable(&self, key: impl Into<Key>) -> bool {
        self.inner
            .borrow()
            .props
            .get(&key.into())
            .is_some_and(Property::enumerable)
    }

    /// Own enumerable index and name keys.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        let data = self.inner.borrow();
        let mut indices: Vec<usize> = Vec::new();
        let mut names: Vec<Key> = Vec::new();
        for (key, property) in &data.props {
            if !property.enumerable() {
                continue;
            }
            match key {
                Key::Index(index) => indices.push(*index),
                Key::Name(_) => names.push(key.clone()),
                Key::Symbol(_) => {}
            }
        }
        indices.sort_unstable();
        indices.into_iter().map(Key::Index).chain(names).collect()
    }

    /// Own enumerable symbol keys, in insertion order.
    #[must_use]
    pub fn symbols(&self) -> Vec<Key> {
        self.inner
            .borrow()
            .props
            .iter()
            .filter(|(key, property)| key.is_symbol() && property.enumerable())
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// `keys()` followed by `symbols()`.
    #[must_use]
    pub fn own_keys(&self) -> Vec<Key> {
        let mut keys = self.keys();
        keys.extend(self.symbols());
        keys
    }

    /// Own enumerable entries, read through accessors.
    #[must_use]
    pub fn entries(&self) -> Vec<(Key, Value)> {
        self.own_keys()
            .into_iter()
            .map(|key| {
                let value = self.get(&key);
                (key, value)
            })
            .collect()
    }

    /// Sequence length (highest index + 1), or own property count otherwise.
    #[must_use]
    pub fn len(&self) -> usize {
        let data = self.inner.borrow();
        if data.kind == ObjectKind::Sequence {
            data.props
                .keys()
                .filter_map(Key::as_index)
                .max()
                .map_or(0, |max| max + 1)
        } else {
            data.props.len()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append at index `len()`.
    ///
    /// On a sequence exposed by a registrar this adds an inert data element;
    /// it does not become reactive.
    pub fn push(&self, value: impl Into<Value>) {
        let index = self.len();
        self.set(index, value);
    }

    /// Deep copy of own enumerable properties, read through accessors.
    #[must_use]
    pub fn snapshot(&self) -> Object {
        let copy = Object::with_kind(self.kind());
        for (key, value) in self.entries() {
            copy.set(key, value.snapshot());
        }
        copy
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        match self.kind() {
            ObjectKind::Sequence => f
                .debug_list()
                .entries(entries.iter().map(|(_, value)| value))
                .finish(),
            ObjectKind::Plain => f
                .debug_map()
                .entries(entries.iter().map(|(key, value)| (key, value)))
                .finish(),
            ObjectKind::Instance(class) => {
                f.write_str(&class)?;
                f.write_str(" ")?;
                f.debug_map()
                    .entries(entries.iter().map(|(key, value)| (key, value)))
                    .finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Doubler {
        store: Object,
        reads: Cell<u32>,
    }

    impl Accessor for Doubler {
        fn get(&self) -> Value {
            self.reads.set(self.reads.get() + 1);
            let raw = self.store.get("raw").as_number().unwrap_or(0.0);
            Value::from(raw * 2.0)
        }

        fn set(&self, value: Value) {
            self.store.set("raw", value);
        }
    }

    #[test]
    fn data_properties_round_trip() {
        let object = Object::plain();
        object.set("a", 1);
        assert_eq!(object.get("a"), Value::from(1));
        assert_eq!(object.get("missing"), Value::Undefined);
        object.set("a", "two");
        assert_eq!(object.get("a"), Value::from("two"));
    }

    #[test]
    fn accessor_intercepts_reads_and_writes() {
        let object = Object::plain();
        let store = Object::plain();
        let accessor = Rc::new(Doubler {
            store: store.clone(),
            reads: Cell::new(0),
        });
        object.define_accessor("n", accessor.clone(), true);
        object.set("n", 4);
        assert_eq!(store.get("raw"), Value::from(4));
        assert_eq!(object.get("n"), Value::from(8));
        assert_eq!(accessor.reads.get(), 1);
        assert!(object.is_accessor("n"));
    }

    #[test]
    fn accessor_may_reenter_its_own_object() {
        struct SelfCounter {
            home: Object,
        }
        impl Accessor for SelfCounter {
            fn get(&self) -> Value {
                self.home.get("count")
            }
            fn set(&self, value: Value) {
                self.home.set("count", value);
            }
        }
        let object = Object::plain();
        object.define_accessor(
            "alias",
            Rc::new(SelfCounter {
                home: object.clone(),
            }),
            true,
        );
        object.set("alias", 5);
        assert_eq!(object.get("count"), Value::from(5));
        assert_eq!(object.get("alias"), Value::from(5));
    }

    #[test]
    fn redefinition_keeps_position() {
        let object = Object::plain();
        object.set("a", 1);
        object.set("b", 2);
        object.define_value("a", 3, true);
        assert_eq!(object.keys(), vec![Key::name("a"), Key::name("b")]);
        assert_eq!(object.get("a"), Value::from(3));
    }

    #[test]
    fn key_order_indices_then_names_then_symbols() {
        let object = Object::plain();
        let symbol = crate::Symbol::new("s");
        object.set("z", 1);
        object.set(&symbol, 2);
        object.set(10usize, 3);
        object.set("2", 4);
        object.set("a", 5);
        assert_eq!(
            object.keys(),
            vec![Key::Index(2), Key::Index(10), Key::name("z"), Key::name("a")]
        );
        assert_eq!(object.symbols(), vec![Key::from(&symbol)]);
        assert_eq!(object.own_keys().len(), 5);
    }

    #[test]
    fn non_enumerable_properties_are_hidden() {
        let object = Object::plain();
        object.define_value("hidden", 1, false);
        object.set("shown", 2);
        assert_eq!(object.keys(), vec![Key::name("shown")]);
        assert!(object.has_own("hidden"));
        assert!(!object.is_enumerable("hidden"));
    }

    #[test]
    fn delete_reports_existence() {
        let object = Object::plain();
        object.set("a", 1);
        assert!(object.delete("a"));
        assert!(!object.delete("a"));
        assert!(!object.has_own("a"));
    }

    #[test]
    fn sequence_length_and_push() {
        let seq = Object::from_items([1, 2]);
        assert!(seq.is_sequence());
        assert_eq!(seq.len(), 2);
        seq.push(3);
        assert_eq!(seq.get(2usize), Value::from(3));
        seq.set(9usize, 0);
        assert_eq!(seq.len(), 10);
        assert!(Object::sequence().is_empty());
    }

    #[test]
    fn debug_output() {
        let object = Object::from_entries([("a", Value::sequence([1, 2]))]);
        assert_eq!(format!("{object:?}"), "{\"a\": [1, 2]}");
        let point = Object::instance("Point");
        point.set("x", 1);
        assert_eq!(format!("{point:?}"), "Point {\"x\": 1}");
    }
}
