//! Command implementations.

pub mod lookup;

pub use lookup::{lookup_attributes, run_lookup};
