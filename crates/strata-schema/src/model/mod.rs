//! The schema graph.
//!
//! Entities never hold references to one another. Cross references are
//! stable ids ([`TableId`](strata_common::TableId), [`JoinId`],
//! [`GroupId`], [`ColumnRef`]) resolved through the owning [`Schema`].

mod column;
mod group;
mod index;
mod join;
mod name;
mod schema;
mod table;

pub use column::{CharsetAndCollation, Column, ColumnRef};
pub use group::{Group, GroupId};
pub use index::{Index, IndexColumn, IndexConstraint, IndexJoinType, IndexScope};
pub use join::{Join, JoinColumn, JoinId};
pub use name::TableName;
pub use schema::Schema;
pub use table::Table;
