#![forbid(unsafe_code)]

//! Intercept hooks and the events they receive.
//!
//! A configuration holds optional handler references; the installer checks
//! for presence before each call. Hooks are reference-counted so that derived
//! depth levels share the parent's handlers instead of copying them.

use std::rc::Rc;

use veneer_core::{Key, Slot, Value};

/// Read hook. `None` passes the raw value through; `Some(v)` replaces it,
/// including `Some(Value::Null)` and `Some(Value::Undefined)`.
pub type GetHook = Rc<dyn Fn(&GetEvent<'_>) -> Option<Value>>;

/// Write hook. Returning `true` marks the write as handled and skips the
/// default backing write; the hook may store its own value through
/// [`SetEvent::slot`].
pub type SetHook = Rc<dyn Fn(&SetEvent<'_>) -> bool>;

/// Runs after every write, whether or not the default write happened.
pub type PostSetHook = Rc<dyn Fn(&PostSetEvent<'_>)>;

/// A read of a registered key.
#[derive(Debug)]
pub struct GetEvent<'a> {
    /// Raw value: the backing slot, or the sub-tree front object.
    pub value: &'a Value,
    /// Keys from the registered root down to this property.
    pub path: &'a [Key],
}

/// A write to a registered key, before the default backing write.
#[derive(Debug)]
pub struct SetEvent<'a> {
    pub value: &'a Value,
    pub prev_value: &'a Value,
    /// True only for the installer's own eager write of the initial value.
    pub initial: bool,
    pub path: &'a [Key],
    /// Default writer for this key's backing slot.
    pub slot: &'a Slot,
}

/// A completed write to a registered key.
#[derive(Debug)]
pub struct PostSetEvent<'a> {
    pub value: &'a Value,
    pub prev_value: &'a Value,
    pub initial: bool,
    pub path: &'a [Key],
}

/// The optional handlers of one level.
#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) on_get: Option<GetHook>,
    pub(crate) on_set: Option<SetHook>,
    pub(crate) on_post_set: Option<PostSetHook>,
}

impl Hooks {
    /// Fill every unset handler from `parent`.
    pub(crate) fn inherit(&self, parent: &Hooks) -> Hooks {
        Hooks {
            on_get: self.on_get.clone().or_else(|| parent.on_get.clone()),
            on_set: self.on_set.clone().or_else(|| parent.on_set.clone()),
            on_post_set: self
                .on_post_set
                .clone()
                .or_else(|| parent.on_post_set.clone()),
        }
    }

    pub(crate) fn on_get(&self, value: Value, path: &[Key]) -> Value {
        match &self.on_get {
            Some(on_get) => {
                let replaced = on_get(&GetEvent {
                    value: &value,
                    path,
                });
                replaced.unwrap_or(value)
            }
            None => value,
        }
    }

    /// Returns whether the hook handled the write.
    pub(crate) fn on_set(&self, event: &SetEvent<'_>) -> bool {
        self.on_set.as_ref().is_some_and(|on_set| on_set(event))
    }

    pub(crate) fn on_post_set(&self, event: &PostSetEvent<'_>) {
        if let Some(on_post_set) = &self.on_post_set {
            on_post_set(event);
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("on_get", &self.on_get.is_some())
            .field("on_set", &self.on_set.is_some())
            .field("on_post_set", &self.on_post_set.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn child_handlers_win_over_parent() {
        let parent = Hooks {
            on_get: Some(Rc::new(|_: &GetEvent<'_>| Some(Value::from("parent")))),
            on_set: Some(Rc::new(|_: &SetEvent<'_>| true)),
            on_post_set: None,
        };
        let child = Hooks {
            on_get: Some(Rc::new(|_: &GetEvent<'_>| Some(Value::from("child")))),
            ..Hooks::default()
        };
        let merged = child.inherit(&parent);
        assert_eq!(merged.on_get(Value::Null, &[]), Value::from("child"));
        assert!(merged.on_set.is_some());
        assert!(merged.on_post_set.is_none());
    }

    #[test]
    fn absent_get_hook_passes_value_through() {
        let hooks = Hooks::default();
        assert_eq!(hooks.on_get(Value::from(7), &[]), Value::from(7));
    }

    #[test]
    fn declining_get_hook_passes_value_through() {
        let hooks = Hooks {
            on_get: Some(Rc::new(|_: &GetEvent<'_>| None::<Value>)),
            ..Hooks::default()
        };
        assert_eq!(hooks.on_get(Value::from(7), &[]), Value::from(7));
    }

    #[test]
    fn absent_set_hook_never_handles() {
        let hooks = Hooks::default();
        let slot = Slot::new(veneer_core::Store::plain(), Key::name("k"));
        let event = SetEvent {
            value: &Value::Null,
            prev_value: &Value::Undefined,
            initial: true,
            path: &[],
            slot: &slot,
        };
        assert!(!hooks.on_set(&event));
    }

    #[test]
    fn post_set_hook_runs() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let hooks = Hooks {
            on_post_set: Some(Rc::new(move |_: &PostSetEvent<'_>| seen.set(seen.get() + 1))),
            ..Hooks::default()
        };
        hooks.on_post_set(&PostSetEvent {
            value: &Value::Null,
            prev_value: &Value::Null,
            initial: false,
            path: &[],
        });
        assert_eq!(calls.get(), 1);
    }
}
