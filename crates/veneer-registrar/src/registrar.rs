#![forbid(unsafe_code)]

//! Instanced and static registration entry points.
//!
//! # Example
//!
//! ```
//! use veneer_registrar::Registrar;
//! use veneer_core::Value;
//!
//! let registrar = Registrar::new();
//! registrar.register("foo", 3).unwrap();
//! assert_eq!(registrar.get("foo"), Value::from(3));
//!
//! registrar.set("foo", "bar");
//! assert_eq!(registrar.backing().read(&"foo".into()), Value::from("bar"));
//! ```

use veneer_core::{IntoKeys, Key, Object, Result, Store, Value, VeneerError};

use crate::binding::install;
use crate::config::{Level, RegistrationConfig};

/// Owns one normalized configuration and registers keys with it.
///
/// Keys registered through the same registrar share configuration but have
/// independent accessor state.
#[derive(Debug)]
pub struct Registrar {
    level: Level,
}

impl Default for Registrar {
    fn default() -> Self {
        Self::new()
    }
}

impl Registrar {
    /// A registrar with fresh front and backing containers and default rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: Level::default(),
        }
    }

    pub fn with_config(config: RegistrationConfig) -> Result<Self> {
        Ok(Self {
            level: config.normalize(false)?,
        })
    }

    /// Install each key with the registrar's configuration.
    ///
    /// Pass `()` (or `Value::Undefined`) to register without an initial
    /// value: no backing write, no hooks.
    pub fn register(&self, keys: impl IntoKeys, initial: impl Into<Value>) -> Result<()> {
        let keys = keys.into_keys()?;
        install_all(&self.level, keys, &initial.into());
        Ok(())
    }

    /// Like [`register`](Self::register), with unbounded depth spliced at the
    /// deepest configured depth level.
    pub fn register_recursive(&self, keys: impl IntoKeys, initial: impl Into<Value>) -> Result<()> {
        let keys = keys.into_keys()?;
        install_all(&self.level.recursive(), keys, &initial.into());
        Ok(())
    }

    /// Register every own enumerable key (symbols included) of `source`,
    /// each initialized to its value there.
    pub fn register_from(&self, source: impl Into<Value>) -> Result<()> {
        for (key, value) in source_entries(source.into())? {
            let path = vec![key.clone()];
            install(&self.level, key, value, path);
        }
        Ok(())
    }

    /// Whether `key` is an own property of the front object.
    #[must_use]
    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.level.front.has_own(key)
    }

    /// Remove `key` from the front object and the top-level backing store.
    ///
    /// Nested sub-tree entries are not touched; they become unreachable.
    pub fn delete(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        let in_front = self.level.front.delete(&key);
        let in_backing = self.level.backing.remove(&key);
        in_front || in_backing
    }

    /// Read through the front object.
    #[must_use]
    pub fn get(&self, key: impl Into<Key>) -> Value {
        self.level.front.get(key)
    }

    /// Write through the front object.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) {
        self.level.front.set(key, value);
    }

    /// Own enumerable keys of the front object.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        self.level.front.own_keys()
    }

    #[must_use]
    pub fn front(&self) -> &Object {
        &self.level.front
    }

    #[must_use]
    pub fn backing(&self) -> &Store {
        &self.level.backing
    }
}

pub(crate) fn install_all(level: &Level, keys: Vec<Key>, initial: &Value) {
    for key in keys {
        let path = vec![key.clone()];
        install(level, key, initial.clone(), path);
    }
}

pub(crate) fn source_entries(source: Value) -> Result<Vec<(Key, Value)>> {
    match source {
        Value::Object(object) => Ok(object.entries()),
        Value::Map(map) => Ok(map.entries()),
        other => Err(VeneerError::invalid(format!(
            "registration source must be an object or map, got {}",
            other.type_name()
        ))),
    }
}

/// Normalize `config` and register `keys` with it.
pub fn register(config: RegistrationConfig, keys: impl IntoKeys, initial: impl Into<Value>) -> Result<Registrar> {
    let keys = keys.into_keys()?;
    let registrar = Registrar::with_config(config)?;
    install_all(&registrar.level, keys, &initial.into());
    Ok(registrar)
}

/// Normalize `config` with unbounded depth and register `keys` with it.
pub fn register_recursive(
    config: RegistrationConfig,
    keys: impl IntoKeys,
    initial: impl Into<Value>,
) -> Result<Registrar> {
    let keys = keys.into_keys()?;
    let registrar = Registrar {
        level: config.normalize(true)?,
    };
    install_all(&registrar.level, keys, &initial.into());
    Ok(registrar)
}

/// Normalize `config` and register every own key of `source` with it.
pub fn register_from(config: RegistrationConfig, source: impl Into<Value>) -> Result<Registrar> {
    let entries = source_entries(source.into())?;
    let registrar = Registrar::with_config(config)?;
    for (key, value) in entries {
        let path = vec![key.clone()];
        install(&registrar.level, key, value, path);
    }
    Ok(registrar)
}
