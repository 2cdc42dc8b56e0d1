//! Type definitions for Strata.
//!
//! This module contains the core type definitions shared across crates.

mod ids;
mod keys;
mod row;
mod value;

pub use ids::{IndexId, Ordinal, TableId};
pub use keys::{Key, MAX_KEY_SIZE};
pub use row::Row;
pub use value::Value;
