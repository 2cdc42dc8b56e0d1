//! # strata-common
//!
//! Common types, errors, and configuration for Strata.
//!
//! This crate provides the foundational types shared by the schema layer and
//! the storage glue:
//!
//! - **Types**: identifiers (`TableId`, `IndexId`, `Ordinal`), runtime values
//!   and rows, and byte keys
//! - **Errors**: unified error handling with `StrataError`
//! - **Config**: schema loader configuration
//! - **Constants**: system-wide constants and limits
//!
//! ## Example
//!
//! ```rust
//! use strata_common::types::{TableId, Value};
//! use strata_common::error::StrataResult;
//!
//! fn example() -> StrataResult<()> {
//!     let table = TableId::new(1);
//!     let value = Value::Int(42);
//!     assert!(table.is_valid());
//!     assert_eq!(value.to_i64(), Some(42));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at the crate root
pub use config::LoaderConfig;
pub use error::{ErrorCode, StrataError, StrataResult};
pub use types::{IndexId, Key, Ordinal, Row, TableId, Value};
