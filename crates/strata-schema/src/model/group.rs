use strata_common::types::TableId;

use super::index::Index;
use super::name::TableName;

/// Position of a group in the schema's group arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    /// Returns the arena slot.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// The unit of physical clustering: a root table and everything reachable
/// from it through child joins share one ordered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub(crate) id: GroupId,
    /// Qualified name of the declared root table.
    pub(crate) name: TableName,
    pub(crate) root: TableId,
    pub(crate) storage_table_id: TableId,
    pub(crate) storage_table_name: String,
    pub(crate) tree_name: Option<String>,
    pub(crate) indexes: Vec<Index>,
}

impl Group {
    pub(crate) fn new(id: GroupId, name: TableName) -> Self {
        Self {
            id,
            name,
            root: TableId::INVALID,
            storage_table_id: TableId::INVALID,
            storage_table_name: String::new(),
            tree_name: None,
            indexes: Vec::new(),
        }
    }

    /// Returns the group id.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the group name, which is the qualified name of its root table.
    pub fn name(&self) -> &TableName {
        &self.name
    }

    /// Returns the root table.
    pub fn root(&self) -> TableId {
        self.root
    }

    /// Returns the generated id of the group's storage table.
    pub fn storage_table_id(&self) -> TableId {
        self.storage_table_id
    }

    /// Returns the generated name of the group's storage table.
    pub fn storage_table_name(&self) -> &str {
        &self.storage_table_name
    }

    /// Returns the physical tree name, if declared.
    pub fn tree_name(&self) -> Option<&str> {
        self.tree_name.as_deref()
    }

    /// Returns the group-scoped indexes.
    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Finds a group index by name.
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name() == name)
    }
}
