#![forbid(unsafe_code)]

//! Registration configuration and its normalizer.
//!
//! # Design
//!
//! [`RegistrationConfig`] is the caller-facing, partial description of one
//! registration layer. Normalization turns it into a [`Level`]: a front
//! object, a backing store, and shared [`Rules`] (enumerability, depth
//! filter, hooks, reach). Missing pieces degrade to defaults; each call
//! allocates its own fresh containers so unrelated registrations never alias.
//!
//! # Invariants
//!
//! 1. A level's front object is never the container of its backing store.
//! 2. A numeric reach decrements by one per level and stops at zero.
//! 3. A nested depth configuration inherits every unset field from its
//!    parent; its front object is always re-derived, never inherited.
//! 4. In a chain, every non-terminal backing store is the next layer's front
//!    object. Exactly one leaf store exists.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};
use veneer_core::{Key, Object, Result, Store, Value, VeneerError};

use crate::filter::{self, DepthFilter};
use crate::hooks::{GetEvent, GetHook, Hooks, PostSetEvent, PostSetHook, SetEvent, SetHook};

/// How far below a registered key reactivity extends.
#[derive(Clone)]
pub enum Depth {
    /// Fixed number of levels; `Levels(0)` disables expansion.
    Levels(u32),
    /// No limit. Cyclic values recurse without end and are unsupported.
    Unbounded,
    /// Explicit configuration for the next level down. Unset fields inherit
    /// from the parent.
    Nested(Box<RegistrationConfig>),
}

impl Default for Depth {
    fn default() -> Self {
        Self::Levels(0)
    }
}

impl From<u32> for Depth {
    fn from(levels: u32) -> Self {
        Self::Levels(levels)
    }
}

impl From<RegistrationConfig> for Depth {
    fn from(config: RegistrationConfig) -> Self {
        Self::Nested(Box::new(config))
    }
}

impl fmt::Debug for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Levels(levels) => write!(f, "Levels({levels})"),
            Self::Unbounded => f.write_str("Unbounded"),
            Self::Nested(config) => f.debug_tuple("Nested").field(config).finish(),
        }
    }
}

/// Partial configuration of one registration layer.
///
/// Every field is optional; see the module docs for defaults.
#[derive(Clone, Default)]
pub struct RegistrationConfig {
    front_object: Option<Value>,
    backing_store: Option<Value>,
    enumerable: Option<bool>,
    depth: Option<Depth>,
    depth_filter: Option<DepthFilter>,
    hooks: Hooks,
}

impl RegistrationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Container that will expose the accessor properties. Must be an object.
    #[must_use]
    pub fn with_front_object(mut self, front: impl Into<Value>) -> Self {
        self.front_object = Some(front.into());
        self
    }

    /// Container holding the real values. Must be an object or a map.
    #[must_use]
    pub fn with_backing_store(mut self, backing: impl Into<Value>) -> Self {
        self.backing_store = Some(backing.into());
        self
    }

    #[must_use]
    pub fn with_enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = Some(enumerable);
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: impl Into<Depth>) -> Self {
        self.depth = Some(depth.into());
        self
    }

    #[must_use]
    pub fn with_depth_filter(mut self, filter: impl Fn(&Value, &[Key]) -> bool + 'static) -> Self {
        self.depth_filter = Some(Rc::new(filter));
        self
    }

    #[must_use]
    pub fn with_on_get(
        mut self,
        hook: impl Fn(&GetEvent<'_>) -> Option<Value> + 'static,
    ) -> Self {
        self.hooks.on_get = Some(Rc::new(hook) as GetHook);
        self
    }

    #[must_use]
    pub fn with_on_set(mut self, hook: impl Fn(&SetEvent<'_>) -> bool + 'static) -> Self {
        self.hooks.on_set = Some(Rc::new(hook) as SetHook);
        self
    }

    #[must_use]
    pub fn with_on_post_set(mut self, hook: impl Fn(&PostSetEvent<'_>) + 'static) -> Self {
        self.hooks.on_post_set = Some(Rc::new(hook) as PostSetHook);
        self
    }

    #[must_use]
    pub fn depth(&self) -> Option<&Depth> {
        self.depth.as_ref()
    }

    /// Normalize into a single level.
    pub(crate) fn normalize(self, recursive: bool) -> Result<Level> {
        let front = match self.front_object {
            Some(value) => front_from_value(value)?,
            None => Object::plain(),
        };
        let backing = match self.backing_store {
            Some(value) => Store::try_from(value)?,
            None => Store::plain(),
        };
        if backing.is_object(&front) {
            return Err(VeneerError::invalid(
                "front object and backing store must be distinct containers",
            ));
        }
        let level = Level {
            front,
            backing,
            rules: Rc::new(Rules {
                enumerable: self.enumerable.unwrap_or(true),
                filter: self.depth_filter.unwrap_or_else(filter::default_filter),
                hooks: self.hooks,
                reach: Reach::resolve(self.depth, recursive)?,
            }),
        };
        debug!(reach = ?level.rules.reach, recursive, "normalized registration config");
        Ok(level)
    }
}

impl fmt::Debug for RegistrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationConfig")
            .field("front_object", &self.front_object.as_ref().map(Value::type_name))
            .field("backing_store", &self.backing_store.as_ref().map(Value::type_name))
            .field("enumerable", &self.enumerable)
            .field("depth", &self.depth)
            .field("depth_filter", &self.depth_filter.is_some())
            .field("hooks", &self.hooks)
            .finish()
    }
}

fn front_from_value(value: Value) -> Result<Object> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(VeneerError::invalid(format!(
            "front object must be an object or sequence, got {}",
            other.type_name()
        ))),
    }
}

/// Normalize an ordered list of configurations into a definition chain.
///
/// Each layer's backing store becomes the next layer's front object; a
/// backing store declared on a non-terminal layer is discarded. An empty
/// list yields a single default layer.
pub(crate) fn normalize_chain(configs: Vec<RegistrationConfig>, recursive: bool) -> Result<Vec<Level>> {
    let mut configs = if configs.is_empty() {
        vec![RegistrationConfig::default()]
    } else {
        configs
    };

    let fronts = configs
        .iter_mut()
        .map(|config| match config.front_object.take() {
            Some(value) => front_from_value(value),
            None => Ok(Object::plain()),
        })
        .collect::<Result<Vec<_>>>()?;
    for (index, front) in fronts.iter().enumerate() {
        if fronts[..index].iter().any(|earlier| earlier.ptr_eq(front)) {
            return Err(VeneerError::invalid(format!(
                "definition chain layer {index} reuses an earlier layer's front object"
            )));
        }
    }

    let last = configs.len() - 1;
    let mut levels = Vec::with_capacity(configs.len());
    for (index, (config, front)) in configs.into_iter().zip(fronts.iter()).enumerate() {
        let backing = if index < last {
            if config.backing_store.is_some() {
                trace!(layer = index, "discarding backing store declared on a non-terminal layer");
            }
            Store::Object(fronts[index + 1].clone())
        } else {
            let leaf = match config.backing_store.clone() {
                Some(value) => Store::try_from(value)?,
                None => Store::plain(),
            };
            if fronts.iter().any(|front| leaf.is_object(front)) {
                return Err(VeneerError::invalid(
                    "leaf backing store of a definition chain must not be a layer's front object",
                ));
            }
            leaf
        };
        let config = RegistrationConfig {
            front_object: Some(Value::Object(front.clone())),
            backing_store: Some(backing.to_value()),
            ..config
        };
        levels.push(config.normalize(recursive)?);
    }
    debug!(layers = levels.len(), recursive, "normalized definition chain");
    Ok(levels)
}

/// Normalized per-level settings shared by every binding of that level.
#[derive(Clone)]
pub(crate) struct Rules {
    pub(crate) enumerable: bool,
    pub(crate) filter: DepthFilter,
    pub(crate) hooks: Hooks,
    pub(crate) reach: Reach,
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("enumerable", &self.enumerable)
            .field("hooks", &self.hooks)
            .field("reach", &self.reach)
            .finish_non_exhaustive()
    }
}

/// Normalized depth.
#[derive(Clone, Debug)]
pub(crate) enum Reach {
    Levels(u32),
    Unbounded,
    Nested(Rc<NestedLevel>),
}

impl Reach {
    fn resolve(depth: Option<Depth>, recursive: bool) -> Result<Reach> {
        let reach = match depth {
            None => Reach::Levels(0),
            Some(Depth::Levels(levels)) => Reach::Levels(levels),
            Some(Depth::Unbounded) => Reach::Unbounded,
            Some(Depth::Nested(config)) => Reach::Nested(Rc::new(NestedLevel::resolve(*config)?)),
        };
        Ok(if recursive { reach.spliced_unbounded() } else { reach })
    }

    /// Whether a write at this level may build a sub-tree.
    pub(crate) fn is_active(&self) -> bool {
        !matches!(self, Reach::Levels(0))
    }

    /// Replace the reach at the deepest nested level with `Unbounded`.
    pub(crate) fn spliced_unbounded(&self) -> Reach {
        match self {
            Reach::Nested(level) => {
                let mut deepest = NestedLevel::clone(level);
                deepest.reach = deepest.reach.spliced_unbounded();
                Reach::Nested(Rc::new(deepest))
            }
            Reach::Levels(_) | Reach::Unbounded => Reach::Unbounded,
        }
    }
}

/// A nested depth configuration, validated but not yet merged with its parent.
#[derive(Clone, Debug)]
pub(crate) struct NestedLevel {
    /// Custom backing store for every sub-tree at this level.
    pub(crate) backing: Option<Store>,
    pub(crate) enumerable: Option<bool>,
    pub(crate) filter: Option<DepthFilterRef>,
    pub(crate) hooks: Hooks,
    pub(crate) reach: Reach,
}

/// Debug-printable wrapper around a depth filter.
#[derive(Clone)]
pub(crate) struct DepthFilterRef(pub(crate) DepthFilter);

impl fmt::Debug for DepthFilterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DepthFilter")
    }
}

impl NestedLevel {
    fn resolve(config: RegistrationConfig) -> Result<NestedLevel> {
        if config.front_object.is_some() {
            trace!("ignoring front object of a nested depth configuration");
        }
        Ok(NestedLevel {
            backing: config.backing_store.map(Store::try_from).transpose()?,
            enumerable: config.enumerable,
            filter: config.depth_filter.map(DepthFilterRef),
            hooks: config.hooks,
            reach: Reach::resolve(config.depth, false)?,
        })
    }
}

impl Rules {
    /// Rules for the level below this one, plus a custom backing store if
    /// the nested configuration names one.
    pub(crate) fn derive_child(self: &Rc<Self>) -> (Rc<Rules>, Option<Store>) {
        match &self.reach {
            Reach::Unbounded => (Rc::clone(self), None),
            Reach::Levels(levels) => {
                let child = Rules {
                    reach: Reach::Levels(levels.saturating_sub(1)),
                    ..Rules::clone(self)
                };
                (Rc::new(child), None)
            }
            Reach::Nested(nested) => {
                let child = Rules {
                    enumerable: nested.enumerable.unwrap_or(self.enumerable),
                    filter: nested
                        .filter
                        .as_ref()
                        .map_or_else(|| Rc::clone(&self.filter), |filter| Rc::clone(&filter.0)),
                    hooks: nested.hooks.inherit(&self.hooks),
                    reach: nested.reach.clone(),
                };
                (Rc::new(child), nested.backing.clone())
            }
        }
    }
}

/// A normalized layer: where accessors live, where values live, and how.
#[derive(Clone, Debug)]
pub(crate) struct Level {
    pub(crate) front: Object,
    pub(crate) backing: Store,
    pub(crate) rules: Rc<Rules>,
}

impl Default for Level {
    /// Fresh plain front and backing objects, default rules, no depth.
    fn default() -> Self {
        Level {
            front: Object::plain(),
            backing: Store::plain(),
            rules: Rc::new(Rules {
                enumerable: true,
                filter: filter::default_filter(),
                hooks: Hooks::default(),
                reach: Reach::Levels(0),
            }),
        }
    }
}

impl Level {
    /// Copy of this level with `Unbounded` spliced at its deepest reach.
    pub(crate) fn recursive(&self) -> Level {
        Level {
            front: self.front.clone(),
            backing: self.backing.clone(),
            rules: Rc::new(Rules {
                reach: self.rules.reach.spliced_unbounded(),
                ..Rules::clone(&self.rules)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_core::Map;

    fn reach_chain(reach: &Reach) -> Vec<String> {
        match reach {
            Reach::Levels(levels) => vec![format!("levels:{levels}")],
            Reach::Unbounded => vec!["unbounded".to_string()],
            Reach::Nested(level) => {
                let mut out = vec!["nested".to_string()];
                out.extend(reach_chain(&level.reach));
                out
            }
        }
    }

    #[test]
    fn defaults_allocate_fresh_containers() {
        let a = RegistrationConfig::new().normalize(false).unwrap();
        let b = RegistrationConfig::new().normalize(false).unwrap();
        assert!(!a.front.ptr_eq(&b.front));
        assert!(!a.backing.is_object(&b.front));
        assert!(a.rules.enumerable);
        assert!(!a.rules.reach.is_active());
    }

    #[test]
    fn recursive_flag_sets_unbounded_depth() {
        let level = RegistrationConfig::new().normalize(true).unwrap();
        assert_eq!(reach_chain(&level.rules.reach), ["unbounded"]);

        let level = RegistrationConfig::new()
            .with_depth(3u32)
            .normalize(true)
            .unwrap();
        assert_eq!(reach_chain(&level.rules.reach), ["unbounded"]);
    }

    #[test]
    fn recursive_flag_splices_at_deepest_nested_level() {
        let nested = RegistrationConfig::new()
            .with_depth(RegistrationConfig::new().with_enumerable(false));
        let level = RegistrationConfig::new()
            .with_depth(nested)
            .normalize(true)
            .unwrap();
        assert_eq!(
            reach_chain(&level.rules.reach),
            ["nested", "nested", "unbounded"]
        );
    }

    #[test]
    fn non_container_front_is_rejected() {
        let err = RegistrationConfig::new()
            .with_front_object(5)
            .normalize(false)
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = RegistrationConfig::new()
            .with_front_object(Map::new())
            .normalize(false)
            .unwrap_err();
        assert!(err.to_string().contains("map"));
    }

    #[test]
    fn non_container_backing_is_rejected() {
        let err = RegistrationConfig::new()
            .with_backing_store("nope")
            .normalize(false)
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = RegistrationConfig::new()
            .with_depth(RegistrationConfig::new().with_backing_store(1))
            .normalize(false)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn aliased_front_and_backing_are_rejected() {
        let shared = Object::plain();
        let err = RegistrationConfig::new()
            .with_front_object(shared.clone())
            .with_backing_store(shared)
            .normalize(false)
            .unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }

    #[test]
    fn numeric_depth_decrements() {
        let level = RegistrationConfig::new()
            .with_depth(2u32)
            .normalize(false)
            .unwrap();
        let (child, custom) = level.rules.derive_child();
        assert!(custom.is_none());
        assert_eq!(reach_chain(&child.reach), ["levels:1"]);
        let (grandchild, _) = child.derive_child();
        assert!(!grandchild.reach.is_active());
    }

    #[test]
    fn derived_levels_share_parent_filter_and_hooks() {
        let numeric = RegistrationConfig::new()
            .with_depth(2u32)
            .with_enumerable(false)
            .with_depth_filter(filter::always)
            .with_on_get(|_| None)
            .with_on_set(|_| false)
            .with_on_post_set(|_| {})
            .normalize(false)
            .unwrap();
        let (child, _) = numeric.rules.derive_child();
        assert!(Rc::ptr_eq(&child.filter, &numeric.rules.filter));
        assert!(!child.enumerable);
        assert!(child.hooks.on_get.is_some());
        assert!(child.hooks.on_set.is_some());
        assert!(child.hooks.on_post_set.is_some());
        let (grandchild, _) = child.derive_child();
        assert!(Rc::ptr_eq(&grandchild.filter, &numeric.rules.filter));
        assert!(!grandchild.enumerable);

        let nested = RegistrationConfig::new()
            .with_depth_filter(filter::always)
            .with_depth(RegistrationConfig::new())
            .normalize(false)
            .unwrap();
        let (child, _) = nested.rules.derive_child();
        assert!(Rc::ptr_eq(&child.filter, &nested.rules.filter));
    }

    #[test]
    fn unbounded_child_shares_parent_rules() {
        let level = RegistrationConfig::new().normalize(true).unwrap();
        let (child, _) = level.rules.derive_child();
        assert!(Rc::ptr_eq(&child, &level.rules));
    }

    #[test]
    fn nested_level_inherits_unset_fields() {
        let custom = Object::plain();
        let level = RegistrationConfig::new()
            .with_enumerable(false)
            .with_on_get(|_| None)
            .with_depth(RegistrationConfig::new().with_backing_store(custom.clone()))
            .normalize(false)
            .unwrap();
        let (child, backing) = level.rules.derive_child();
        assert!(!child.enumerable);
        assert!(child.hooks.on_get.is_some());
        assert!(backing.is_some_and(|store| store.is_object(&custom)));
        assert!(!child.reach.is_active());
    }

    #[test]
    fn nested_level_overrides_enumerable() {
        let level = RegistrationConfig::new()
            .with_enumerable(false)
            .with_depth(RegistrationConfig::new().with_enumerable(true).with_depth(1u32))
            .normalize(false)
            .unwrap();
        let (child, _) = level.rules.derive_child();
        assert!(child.enumerable);
        assert_eq!(reach_chain(&child.reach), ["levels:1"]);
    }

    #[test]
    fn chain_links_backing_to_next_front() {
        let leaf = Map::new();
        let levels = normalize_chain(
            vec![
                RegistrationConfig::new().with_backing_store(Object::plain()),
                RegistrationConfig::new(),
                RegistrationConfig::new().with_backing_store(leaf.clone()),
            ],
            false,
        )
        .unwrap();
        assert_eq!(levels.len(), 3);
        assert!(levels[0].backing.is_object(&levels[1].front));
        assert!(levels[1].backing.is_object(&levels[2].front));
        assert!(matches!(&levels[2].backing, Store::Map(map) if map.ptr_eq(&leaf)));
    }

    #[test]
    fn empty_chain_has_one_layer() {
        let levels = normalize_chain(Vec::new(), false).unwrap();
        assert_eq!(levels.len(), 1);
    }

    #[test]
    fn chain_rejects_shared_fronts() {
        let front = Object::plain();
        let err = normalize_chain(
            vec![
                RegistrationConfig::new().with_front_object(front.clone()),
                RegistrationConfig::new(),
                RegistrationConfig::new().with_front_object(front),
            ],
            false,
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn chain_rejects_leaf_aliasing_a_front() {
        let front = Object::plain();
        let err = normalize_chain(
            vec![
                RegistrationConfig::new().with_front_object(front.clone()),
                RegistrationConfig::new().with_backing_store(front),
            ],
            false,
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
