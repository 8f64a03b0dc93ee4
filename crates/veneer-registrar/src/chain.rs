#![forbid(unsafe_code)]

//! Definition chains: several registration layers stacked front to back.
//!
//! Layer `i` stores its values in layer `i + 1`'s front object, so a write
//! to the outermost front object flows through every layer's setter before
//! reaching the single leaf store, and a read flows back out through every
//! layer's getter.
//!
//! # Registration order
//!
//! Keys are installed from the innermost layer outwards. Inner layers are
//! installed without an initial value; only the outermost layer performs the
//! eager write, which then passes through each inner layer's setter exactly
//! once (seen there with `initial == false`).

use veneer_core::{IntoKeys, Key, Object, Result, Store, Value};

use crate::binding::install;
use crate::config::{Level, RegistrationConfig, normalize_chain};
use crate::registrar::source_entries;

/// An ordered stack of normalized layers sharing one leaf store.
#[derive(Debug)]
pub struct DefinitionChain {
    levels: Vec<Level>,
}

impl DefinitionChain {
    /// Link `configs` into a chain. An empty list yields one default layer.
    pub fn new(configs: Vec<RegistrationConfig>) -> Result<Self> {
        Ok(Self {
            levels: normalize_chain(configs, false)?,
        })
    }

    pub fn register(&self, keys: impl IntoKeys, initial: impl Into<Value>) -> Result<()> {
        let keys = keys.into_keys()?;
        let initial = initial.into();
        for key in keys {
            install_through(&self.levels, key, &initial);
        }
        Ok(())
    }

    /// Like [`register`](Self::register), with unbounded depth spliced into
    /// every layer.
    pub fn register_recursive(&self, keys: impl IntoKeys, initial: impl Into<Value>) -> Result<()> {
        let keys = keys.into_keys()?;
        let initial = initial.into();
        let levels: Vec<Level> = self.levels.iter().map(Level::recursive).collect();
        for key in keys {
            install_through(&levels, key, &initial);
        }
        Ok(())
    }

    /// Register every own enumerable key (symbols included) of `source`.
    pub fn register_from(&self, source: impl Into<Value>) -> Result<()> {
        for (key, value) in source_entries(source.into())? {
            install_through(&self.levels, key, &value);
        }
        Ok(())
    }

    /// Whether `key` is an own property of the outermost front object.
    #[must_use]
    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.front().has_own(key)
    }

    /// Remove `key` from every layer's front object and from the leaf store.
    /// Returns whether the outermost front object or the leaf held it.
    pub fn delete(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        let existed = self.has(&key) || self.leaf().contains(&key);
        for level in &self.levels {
            level.front.delete(&key);
        }
        self.leaf().remove(&key);
        existed
    }

    /// Front object of each layer, outermost first.
    #[must_use]
    pub fn targets(&self) -> Vec<Object> {
        self.levels.iter().map(|level| level.front.clone()).collect()
    }

    /// The outermost front object.
    #[must_use]
    pub fn front(&self) -> &Object {
        &self.outermost().front
    }

    /// The single store holding real values.
    #[must_use]
    pub fn leaf(&self) -> &Store {
        &self.innermost().backing
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; a chain has at least one layer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    fn outermost(&self) -> &Level {
        &self.levels[0]
    }

    fn innermost(&self) -> &Level {
        &self.levels[self.levels.len() - 1]
    }
}

fn install_through(levels: &[Level], key: Key, initial: &Value) {
    let Some((outermost, inner)) = levels.split_first() else {
        return;
    };
    for level in inner.iter().rev() {
        install(level, key.clone(), Value::Undefined, vec![key.clone()]);
    }
    let path = vec![key.clone()];
    install(outermost, key, initial.clone(), path);
}
