#![forbid(unsafe_code)]

//! Stock depth filters.
//!
//! A depth filter decides whether a freshly written value gets its own
//! reactive sub-tree. It sees the value and the path of keys leading to it.
//! Only [`Value::Object`] values are ever expanded; a filter returning `true`
//! for a primitive or a map has no effect.

use std::rc::Rc;

use veneer_core::{Key, ObjectKind, Value};

/// Predicate `(value, path) -> recurse?`.
pub type DepthFilter = Rc<dyn Fn(&Value, &[Key]) -> bool>;

/// Recurse into object literals and sequences only (the default).
///
/// Instances of named classes stay inert leaves.
#[must_use]
pub fn object_or_sequence(value: &Value, _path: &[Key]) -> bool {
    match value {
        Value::Object(object) => matches!(object.kind(), ObjectKind::Plain | ObjectKind::Sequence),
        _ => false,
    }
}

/// Recurse into every object, class instances included.
#[must_use]
pub fn always(_value: &Value, _path: &[Key]) -> bool {
    true
}

pub(crate) fn default_filter() -> DepthFilter {
    Rc::new(object_or_sequence)
}
