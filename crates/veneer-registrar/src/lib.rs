#![forbid(unsafe_code)]

//! Accessor registrar: reactive properties over explicit backing stores.
//!
//! A key registered on a front object becomes an accessor property whose
//! value lives in a separate backing store. Reads and writes pass through
//! optional hooks, and object values written to a depth-enabled key get
//! their own reactive sub-tree, rebuilt on every qualifying write.
//!
//! - [`Registrar`]: one configuration, any number of keys.
//! - [`DefinitionChain`]: layers whose backing stores are the next layer's
//!   front objects, ending in one leaf store.
//! - [`filter`]: stock depth filters.
//!
//! # Architecture
//!
//! The config normalizer ([`RegistrationConfig`] to an internal level) runs
//! once per registration. The accessor installer runs once per key, and the
//! depth expander re-runs it for every own key of each qualifying value.
//! Everything is synchronous and single-threaded.
//!
//! # Invariants
//!
//! 1. A front object never doubles as its own backing store.
//! 2. Reads always re-derive from current backing state; writing the backing
//!    store directly is supported and observed by the next read.
//! 3. A qualifying write replaces the entire sub-tree; front objects handed
//!    out for the previous value go stale.
//! 4. Invalid arguments are rejected before any side effect.
//!
//! # Failure Modes
//!
//! - **Cyclic values** under unbounded depth with a permissive filter recurse
//!   until the stack overflows. Callers must bound depth for such data.

pub mod chain;
pub mod config;
pub mod filter;
pub mod hooks;
pub mod registrar;

mod binding;
mod expand;

pub use chain::DefinitionChain;
pub use config::{Depth, RegistrationConfig};
pub use filter::DepthFilter;
pub use hooks::{GetEvent, GetHook, PostSetEvent, PostSetHook, SetEvent, SetHook};
pub use registrar::{Registrar, register, register_from, register_recursive};
