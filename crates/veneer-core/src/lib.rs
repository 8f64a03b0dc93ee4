#![forbid(unsafe_code)]

//! Core: dynamic values, keyed containers, and backing stores.

pub mod error;
pub mod key;
pub mod map;
pub mod object;
pub mod store;
pub mod value;

pub use error::{Result, VeneerError};
pub use key::{IntoKeys, Key, Symbol};
pub use map::Map;
pub use object::{Accessor, Object, ObjectKind};
pub use store::{Slot, Store};
pub use value::Value;
