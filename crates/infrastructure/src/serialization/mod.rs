//! Deterministic JSON serialization for the snapshot and settings files.
//!
//! Keeps diffs of the stored files minimal by:
//! - Writing struct fields and `BTreeMap` keys in a fixed order
//! - Using 2-space indentation
//! - Adding trailing newline

mod json;

pub use json::*;
