#![forbid(unsafe_code)]

//! Property keys and symbols.
//!
//! A [`Key`] addresses one own property of a container. Canonical decimal
//! strings normalize to [`Key::Index`], so `"3"` and `3` name the same slot.
//! Symbols are unique identities; two symbols with the same description are
//! still distinct keys.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, VeneerError};
use crate::value::Value;

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique property key with an optional description.
#[derive(Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Rc<str>>,
}

impl Symbol {
    /// Create a new symbol with a description.
    #[must_use]
    pub fn new(description: impl Into<Rc<str>>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: Some(description.into()),
        }
    }

    /// Create a new symbol without a description.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

/// Key of an own property.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Integer index (sequence element or integer-like name).
    Index(usize),
    /// String name.
    Name(Rc<str>),
    /// Symbol key.
    Symbol(Symbol),
}

impl Key {
    /// Build a key from a string, normalizing canonical indices.
    #[must_use]
    pub fn name(name: &str) -> Self {
        match canonical_index(name) {
            Some(index) => Self::Index(index),
            None => Self::Name(Rc::from(name)),
        }
    }

    #[must_use]
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            _ => None,
        }
    }
}

/// `"0"` and digit strings without a leading zero are indices; `"01"` is a name.
fn canonical_index(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    match bytes {
        [] => None,
        [b'0'] => Some(0),
        [b'0', ..] => None,
        _ if bytes.iter().all(u8::is_ascii_digit) => s.parse().ok(),
        _ => None,
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
            Self::Symbol(symbol) => write!(f, "{symbol:?}"),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => write!(f, "{name:?}"),
            Self::Symbol(symbol) => write!(f, "{symbol:?}"),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::name(&name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Self::name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<Symbol> for Key {
    fn from(symbol: Symbol) -> Self {
        Self::Symbol(symbol)
    }
}

impl From<&Symbol> for Key {
    fn from(symbol: &Symbol) -> Self {
        Self::Symbol(symbol.clone())
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// Coerce a primitive value into a key.
///
/// Containers are not keys and are rejected with `InvalidArgument`.
impl TryFrom<Value> for Key {
    type Error = VeneerError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Undefined => Ok(Self::name("undefined")),
            Value::Null => Ok(Self::name("null")),
            Value::Bool(flag) => Ok(Self::name(if flag { "true" } else { "false" })),
            Value::Number(n) => Ok(Self::name(&crate::value::format_number(n))),
            Value::String(s) => Ok(Self::name(&s)),
            Value::Symbol(symbol) => Ok(Self::Symbol(symbol)),
            other @ (Value::Object(_) | Value::Map(_)) => Err(VeneerError::invalid(format!(
                "property key must be a primitive, got {}",
                other.type_name()
            ))),
        }
    }
}

/// One key or a list of keys, as accepted by the registration entry points.
///
/// Conversion is fallible only for [`Value`] keys, which must be primitives.
pub trait IntoKeys {
    fn into_keys(self) -> Result<Vec<Key>>;
}

macro_rules! single_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoKeys for $ty {
                fn into_keys(self) -> Result<Vec<Key>> {
                    Ok(vec![Key::from(self)])
                }
            }
        )*
    };
}

single_key!(&str, String, &String, usize, Symbol, &Symbol, Key, &Key);

impl IntoKeys for Value {
    fn into_keys(self) -> Result<Vec<Key>> {
        Ok(vec![Key::try_from(self)?])
    }
}

impl<T: Into<Key>> IntoKeys for Vec<T> {
    fn into_keys(self) -> Result<Vec<Key>> {
        Ok(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Key>, const N: usize> IntoKeys for [T; N] {
    fn into_keys(self) -> Result<Vec<Key>> {
        Ok(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Key> + Clone> IntoKeys for &[T] {
    fn into_keys(self) -> Result<Vec<Key>> {
        Ok(self.iter().cloned().map(Into::into).collect())
    }
}
