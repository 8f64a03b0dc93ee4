#![forbid(unsafe_code)]

//! Depth expander.
//!
//! On a qualifying write, builds a fresh reactive sub-tree for the written
//! value: a new front object whose keys are installed against the value's
//! own place in the backing hierarchy. The previous sub-tree is simply
//! dropped; nothing else retains it.
//!
//! A write qualifies when the level's reach is active, the value is an
//! [`Object`], and the depth filter accepts it. Own enumerable keys are
//! expanded, symbol keys included. Sub-tree keys report the `initial` flag
//! of the write that built them.

use std::rc::Rc;

use tracing::debug;
use veneer_core::{Key, Object, Slot, Store, Value};

use crate::binding::install_as;
use crate::config::{Level, Rules};

/// Build the sub-tree for `value`, or `None` if the write does not qualify.
///
/// `initial` is the flag of the triggering write and is passed on to every
/// key of the new sub-tree.
pub(crate) fn expand(
    rules: &Rc<Rules>,
    slot: &Slot,
    value: &Value,
    path: &[Key],
    initial: bool,
) -> Option<Object> {
    if !rules.reach.is_active() {
        return None;
    }
    let Value::Object(source) = value else {
        return None;
    };
    if !(rules.filter)(value, path) {
        return None;
    }

    let (child_rules, custom_backing) = rules.derive_child();
    let backing = custom_backing.unwrap_or_else(|| subtree_backing(slot));
    let front = if source.is_sequence() {
        Object::sequence()
    } else {
        Object::plain()
    };
    let level = Level {
        front: front.clone(),
        backing,
        rules: child_rules,
    };

    let entries = source.entries();
    debug!(path = ?path, keys = entries.len(), "rebuilding reactive sub-tree");
    for (key, sub_value) in entries {
        let mut sub_path = path.to_vec();
        sub_path.push(key.clone());
        install_as(&level, key, sub_value, sub_path, initial);
    }
    Some(front)
}

/// The written value's own place in the backing hierarchy.
///
/// Reusing it keeps direct backing-store mutations visible through the
/// sub-tree. When the slot is a chain layer whose getter presents a
/// non-container, the sub-tree gets a private store.
fn subtree_backing(slot: &Slot) -> Store {
    match slot.get() {
        Value::Object(object) => Store::Object(object),
        Value::Map(map) => Store::Map(map),
        _ => Store::plain(),
    }
}
