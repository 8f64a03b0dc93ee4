#![forbid(unsafe_code)]

//! Accessor installer.
//!
//! [`install`] defines one key on a level's front object as an accessor bound
//! to the level's backing store, then performs the eager initial write.
//!
//! # Invariants
//!
//! 1. Every write reads the previous value exactly once, through the getter.
//! 2. `on_post_set` runs after every write, even a vetoed one.
//! 3. The getter reads the backing slot until a qualifying write points it at
//!    a fresh sub-tree; the next non-qualifying write points it back.
//! 4. A binding never holds its own front object, so front objects and their
//!    bindings form no reference cycle.
//! 5. After a write the setter hook handled, the sub-tree is built from what
//!    the slot holds, never from the rejected value.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;
use veneer_core::{Accessor, Key, Object, Slot, Value};

use crate::config::{Level, Rules};
use crate::expand;
use crate::hooks::{PostSetEvent, SetEvent};

/// What the getter currently returns.
enum View {
    /// The raw backing slot.
    Slot,
    /// The front object of the sub-tree built by the last qualifying write.
    SubTree(Object),
}

/// The live get/set pair behind one registered key.
pub(crate) struct Binding {
    slot: Slot,
    path: Vec<Key>,
    rules: Rc<Rules>,
    view: RefCell<View>,
}

impl Binding {
    fn subtree(&self) -> Option<Object> {
        match &*self.view.borrow() {
            View::Slot => None,
            View::SubTree(front) => Some(front.clone()),
        }
    }

    fn read(&self) -> Value {
        let raw = match self.subtree() {
            Some(front) => Value::Object(front),
            None => self.slot.get(),
        };
        self.rules.hooks.on_get(raw, &self.path)
    }

    fn write(&self, value: Value, initial: bool) {
        let prev_value = self.read();
        let handled = self.rules.hooks.on_set(&SetEvent {
            value: &value,
            prev_value: &prev_value,
            initial,
            path: &self.path,
            slot: &self.slot,
        });
        // A handled write leaves the slot to the hook; only what it stored is expanded.
        let stored = if handled {
            trace!(path = ?self.path, "setter hook handled the write");
            Some(self.slot.get())
        } else {
            self.slot.set(value.clone());
            None
        };
        let source = stored.as_ref().unwrap_or(&value);

        let view = match expand::expand(&self.rules, &self.slot, source, &self.path, initial) {
            Some(front) => View::SubTree(front),
            None => View::Slot,
        };
        *self.view.borrow_mut() = view;

        self.rules.hooks.on_post_set(&PostSetEvent {
            value: &value,
            prev_value: &prev_value,
            initial,
            path: &self.path,
        });
    }
}

impl Accessor for Binding {
    fn get(&self) -> Value {
        self.read()
    }

    fn set(&self, value: Value) {
        self.write(value, false);
    }
}

/// Install `key` on `level.front`, bound to `level.backing`.
///
/// An `Undefined` initial value performs no write and runs no hook.
pub(crate) fn install(level: &Level, key: Key, initial: Value, path: Vec<Key>) {
    install_as(level, key, initial, path, true);
}

/// Like [`install`], with the eager write reporting `initial` as given.
///
/// The depth expander passes the flag of the write that triggered it, so
/// keys of a sub-tree built by a later write never see `initial == true`.
pub(crate) fn install_as(level: &Level, key: Key, initial: Value, path: Vec<Key>, initial_flag: bool) {
    trace!(path = ?path, enumerable = level.rules.enumerable, "installing accessor");
    let binding = Rc::new(Binding {
        slot: Slot::new(level.backing.clone(), key.clone()),
        path,
        rules: Rc::clone(&level.rules),
        view: RefCell::new(View::Slot),
    });
    level
        .front
        .define_accessor(key, Rc::clone(&binding) as Rc<dyn Accessor>, level.rules.enumerable);
    if !initial.is_undefined() {
        binding.write(initial, initial_flag);
    }
}
