#![forbid(unsafe_code)]

//! Veneer public facade crate.
//!
//! Re-exports the value model and the accessor registrar behind one path.
//!
//! ```
//! use veneer::prelude::*;
//!
//! let registrar = Registrar::new();
//! registrar.register("count", 1).unwrap();
//! registrar.front().set("count", 2);
//! assert_eq!(registrar.backing().read(&Key::name("count")), Value::from(2));
//! ```

pub use veneer_registrar::filter;

pub mod prelude {
    pub use veneer_core as core;
    pub use veneer_registrar as registrar;

    pub use veneer_core::{
        Accessor, IntoKeys, Key, Map, Object, ObjectKind, Result, Slot, Store, Symbol, Value,
        VeneerError,
    };
    pub use veneer_registrar::{
        DefinitionChain, Depth, GetEvent, PostSetEvent, RegistrationConfig, Registrar, SetEvent,
    };
}
