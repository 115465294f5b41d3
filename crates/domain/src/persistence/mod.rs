//! Persistence domain types.
//!
//! These types are the interop shape of the external environment store. All maps
//! that are not user-ordered use `BTreeMap` for deterministic serialization.

mod snapshot;

pub use snapshot::*;
