//! Hierarchical key derivation.
//!
//! A table's HKey is the root-to-leaf list of segments along its parent join
//! chain. The group root contributes its primary key columns; every join step
//! below it contributes the join's child-side columns. HKeys are computed on
//! demand and never stored in the graph.

use std::fmt;

use strata_common::error::{StrataError, StrataResult};
use strata_common::types::TableId;

use crate::model::{ColumnRef, Schema};

/// One segment of an HKey: the table that owns it and the columns it
/// contributes, in key order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HKeySegment {
    table: TableId,
    columns: Vec<ColumnRef>,
}

impl HKeySegment {
    /// Returns the table that owns this segment.
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Returns the columns contributed by this segment.
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }
}

/// The hierarchical key layout of one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HKey {
    table: TableId,
    segments: Vec<HKeySegment>,
}

impl HKey {
    /// Returns the table this layout belongs to.
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Returns the segments ordered root to leaf.
    pub fn segments(&self) -> &[HKeySegment] {
        &self.segments
    }

    /// Returns the total number of column values across all segments.
    pub fn column_count(&self) -> usize {
        self.segments.iter().map(|s| s.columns.len()).sum()
    }

    /// Returns the number of values a physical key for this table carries:
    /// one ordinal per segment plus every segment column.
    pub fn key_value_count(&self) -> usize {
        self.segments.len() + self.column_count()
    }
}

impl fmt::Display for HKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}(", segment.table)?;
            for (j, column) in segment.columns.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "#{}", column.index)?;
            }
            write!(f, ")")?;
        }
        write!(f, "]")
    }
}

impl Schema {
    /// Derives the HKey of a table.
    ///
    /// Walks parent joins up to the table's group root, or to the first table
    /// without a parent join when the table belongs to no group.
    pub fn hkey(&self, table: TableId) -> StrataResult<HKey> {
        let mut segments = Vec::new();
        let mut current = self.table_ref(table)?;
        let root = self.group_of(table).map(|g| g.root());

        for _ in 0..=self.table_count() {
            let at_root = root == Some(current.id()) || current.parent_join().is_none();
            if at_root {
                segments.push(HKeySegment {
                    table: current.id(),
                    columns: self.primary_key(current.id()),
                });
                segments.reverse();
                return Ok(HKey { table, segments });
            }

            let join = self.parent_join(current.id()).ok_or_else(|| {
                StrataError::internal(format!("table {} lost its parent join", current.name()))
            })?;
            segments.push(HKeySegment {
                table: current.id(),
                columns: join.child_columns().collect(),
            });
            current = self.table_ref(join.parent())?;
        }

        Err(StrataError::internal(format!(
            "parent join chain of table {table} does not terminate"
        )))
    }
}
