//! # strata-schema
//!
//! Schema metadata for Strata's hierarchically clustered storage.
//!
//! Tables are grouped so that a parent row and its descendant rows live next
//! to each other in one ordered tree, keyed by a hierarchical key (HKey)
//! derived from primary keys and parent/child join columns. This crate
//! implements:
//!
//! - **Type registry**: interned scalar type definitions
//! - **Schema graph**: tables, columns, joins, groups, and indexes held in an
//!   arena owned by [`Schema`]
//! - **Artifact records**: the serialized metadata message with table-driven
//!   required-field validation
//! - **Reader**: the six-phase pipeline that turns an artifact into a
//!   [`Schema`], or fails without exposing a partial graph
//! - **Writer**: the inverse of the reader
//! - **HKey derivation**: per-table segment layout computed from the join chain
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_schema::SchemaReader;
//!
//! let schema = SchemaReader::default().load(&bytes)?;
//! let orders = schema.table_by_name("shop", "orders").unwrap();
//! let hkey = schema.hkey(orders.id())?;
//! assert_eq!(hkey.segments().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Serialized metadata records and their validation
pub mod artifact;

/// Hierarchical key derivation
pub mod hkey;

/// Schema graph entities
pub mod model;

/// Artifact to schema graph pipeline
pub mod reader;

/// Type registry
pub mod types;

/// Schema graph to artifact serialization
pub mod writer;

pub use hkey::{HKey, HKeySegment};
pub use model::{
    CharsetAndCollation, Column, ColumnRef, Group, GroupId, Index, IndexColumn, IndexConstraint,
    IndexJoinType, IndexScope, Join, JoinColumn, JoinId, Schema, Table, TableName,
};
pub use reader::SchemaReader;
pub use types::{Type, TypeRegistry};
pub use writer::SchemaWriter;
