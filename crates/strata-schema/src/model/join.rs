use strata_common::types::TableId;

use super::column::ColumnRef;
use super::group::GroupId;

/// Position of a join in the schema's join arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JoinId(pub(crate) usize);

impl JoinId {
    /// Returns the arena slot.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// One (parent column, child column) pair of a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JoinColumn {
    /// Column on the parent table.
    pub parent: ColumnRef,
    /// Column on the child table.
    pub child: ColumnRef,
}

/// Parent to child relation between two tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub(crate) id: JoinId,
    pub(crate) name: String,
    pub(crate) parent: TableId,
    pub(crate) child: TableId,
    pub(crate) columns: Vec<JoinColumn>,
    pub(crate) group: Option<GroupId>,
}

impl Join {
    /// Returns the join id.
    pub fn id(&self) -> JoinId {
        self.id
    }

    /// Returns the join name (`parent/child`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parent table.
    pub fn parent(&self) -> TableId {
        self.parent
    }

    /// Returns the child table.
    pub fn child(&self) -> TableId {
        self.child
    }

    /// Returns the column pairs in declared order.
    pub fn columns(&self) -> &[JoinColumn] {
        &self.columns
    }

    /// Returns the child-side columns in declared order.
    pub fn child_columns(&self) -> impl Iterator<Item = ColumnRef> + '_ {
        self.columns.iter().map(|c| c.child)
    }

    /// Returns the group this join was reached from.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }
}
