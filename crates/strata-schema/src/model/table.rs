use strata_common::types::{Ordinal, TableId};

use super::column::{CharsetAndCollation, Column, ColumnRef};
use super::group::GroupId;
use super::index::{Index, IndexConstraint};
use super::join::JoinId;
use super::name::TableName;

/// A user table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub(crate) id: TableId,
    pub(crate) name: TableName,
    pub(crate) ordinal: Option<Ordinal>,
    pub(crate) columns: Vec<Column>,
    pub(crate) charset: Option<CharsetAndCollation>,
    pub(crate) description: Option<String>,
    pub(crate) protected: bool,
    /// Tree name inherited from the group record when this table is a root.
    pub(crate) tree_name: Option<String>,
    pub(crate) group: Option<GroupId>,
    pub(crate) parent_join: Option<JoinId>,
    pub(crate) child_joins: Vec<JoinId>,
    pub(crate) indexes: Vec<Index>,
}

impl Table {
    pub(crate) fn new(id: TableId, name: TableName, ordinal: Option<Ordinal>) -> Self {
        Self {
            id,
            name,
            ordinal,
            columns: Vec::new(),
            charset: None,
            description: None,
            protected: false,
            tree_name: None,
            group: None,
            parent_join: None,
            child_joins: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Returns the table id.
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Returns the qualified name.
    pub fn name(&self) -> &TableName {
        &self.name
    }

    /// Returns the ordinal written into physical keys.
    ///
    /// Tables that declare no ordinal use their table id.
    pub fn ordinal(&self) -> Ordinal {
        self.ordinal
            .unwrap_or_else(|| Ordinal::new(self.id.as_u32()))
    }

    /// Returns the ordinal exactly as declared.
    pub fn declared_ordinal(&self) -> Option<Ordinal> {
        self.ordinal
    }

    /// Returns the columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Finds a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<ColumnRef> {
        self.columns
            .iter()
            .position(|c| c.name() == name)
            .map(|index| ColumnRef::new(self.id, index))
    }

    /// Returns the character set and collation.
    pub fn charset(&self) -> Option<&CharsetAndCollation> {
        self.charset.as_ref()
    }

    /// Returns the description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns true if the table is protected from DDL.
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// Returns the tree name, set on group roots only.
    pub fn tree_name(&self) -> Option<&str> {
        self.tree_name.as_deref()
    }

    /// Returns the owning group, if the table was reached from a group root.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Returns the join to the parent table.
    pub fn parent_join(&self) -> Option<JoinId> {
        self.parent_join
    }

    /// Returns the joins to child tables, in creation order.
    pub fn child_joins(&self) -> &[JoinId] {
        &self.child_joins
    }

    /// Returns true if the table has no parent join.
    pub fn is_root(&self) -> bool {
        self.parent_join.is_none()
    }

    /// Returns the table-scoped indexes.
    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Finds a table-scoped index by name.
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name() == name)
    }

    /// Returns the primary key index, if any.
    pub fn primary_key_index(&self) -> Option<&Index> {
        self.indexes
            .iter()
            .find(|i| i.constraint() == IndexConstraint::Primary)
    }
}
