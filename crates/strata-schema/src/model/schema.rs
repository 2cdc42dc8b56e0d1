//! The schema root and its invariant-checking construction primitives.
//!
//! Construction primitives are crate-private: only the reader builds a
//! schema, and callers only ever see a fully loaded, read-only graph.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use strata_common::error::{StrataError, StrataResult};
use strata_common::types::{Ordinal, TableId};

use super::column::{Column, ColumnRef};
use super::group::{Group, GroupId};
use super::index::Index;
use super::join::{Join, JoinColumn, JoinId};
use super::name::TableName;
use super::table::Table;
use crate::types::TypeRegistry;

/// A loaded schema graph.
///
/// Owns the type registry and every table, join, and group of one load.
/// Immutable once returned by [`SchemaReader`](crate::SchemaReader), so it
/// can be shared across threads without synchronization.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    types: TypeRegistry,
    /// Tables by id (ascending iteration order).
    tables: BTreeMap<TableId, Table>,
    /// Table ids by qualified name.
    names: HashMap<TableName, TableId>,
    joins: Vec<Join>,
    groups: Vec<Group>,
    /// Root table names of declared groups.
    group_names: HashSet<TableName>,
}

impl Schema {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the type registry.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Returns all tables in ascending id order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Returns the number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Gets a table by id.
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(&id)
    }

    /// Gets a table by schema and table name.
    pub fn table_by_name(&self, schema: &str, table: &str) -> Option<&Table> {
        self.table_by_qualified(&TableName::new(schema, table))
    }

    /// Gets a table by qualified name.
    pub fn table_by_qualified(&self, name: &TableName) -> Option<&Table> {
        self.names.get(name).and_then(|id| self.tables.get(id))
    }

    /// Returns all joins in creation order.
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Gets a join by id.
    pub fn join(&self, id: JoinId) -> Option<&Join> {
        self.joins.get(id.0)
    }

    /// Returns the join from `table` to its parent.
    pub fn parent_join(&self, table: TableId) -> Option<&Join> {
        self.table(table)
            .and_then(Table::parent_join)
            .and_then(|id| self.join(id))
    }

    /// Returns the joins from `table` to its children.
    pub fn child_joins(&self, table: TableId) -> impl Iterator<Item = &Join> {
        self.table(table)
            .map(Table::child_joins)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.join(*id))
    }

    /// Returns all groups in declaration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Gets a group by id.
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    /// Returns the group a table belongs to.
    pub fn group_of(&self, table: TableId) -> Option<&Group> {
        self.table(table)
            .and_then(Table::group)
            .and_then(|id| self.group(id))
    }

    /// Returns the member tables of a group, root first, in breadth-first
    /// order over child joins.
    pub fn group_members(&self, group: GroupId) -> Vec<TableId> {
        let Some(group) = self.group(group) else {
            return Vec::new();
        };

        let mut members = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([group.root()]);
        while let Some(table) = queue.pop_front() {
            if !seen.insert(table) {
                continue;
            }
            if self.table(table).and_then(Table::group) != Some(group.id()) {
                continue;
            }
            members.push(table);
            queue.extend(self.child_joins(table).map(Join::child));
        }
        members
    }

    /// Resolves a column reference.
    pub fn column(&self, column: ColumnRef) -> Option<&Column> {
        self.table(column.table)
            .and_then(|t| t.columns().get(column.index))
    }

    /// Returns the primary key columns of a table, ordered by index position.
    ///
    /// Empty when the table declares no primary key.
    pub fn primary_key(&self, table: TableId) -> Vec<ColumnRef> {
        let Some(index) = self.table(table).and_then(Table::primary_key_index) else {
            return Vec::new();
        };
        let mut columns: Vec<_> = index.columns().to_vec();
        columns.sort_by_key(|c| c.position());
        columns.into_iter().map(|c| c.column()).collect()
    }

    pub(crate) fn table_ref(&self, id: TableId) -> StrataResult<&Table> {
        self.tables
            .get(&id)
            .ok_or_else(|| StrataError::internal(format!("table {id} is not in the schema")))
    }

    fn table_mut(&mut self, id: TableId) -> StrataResult<&mut Table> {
        self.tables
            .get_mut(&id)
            .ok_or_else(|| StrataError::internal(format!("table {id} is not in the schema")))
    }

    fn group_mut(&mut self, id: GroupId) -> StrataResult<&mut Group> {
        self.groups
            .get_mut(id.0)
            .ok_or_else(|| StrataError::internal(format!("group {} is not in the schema", id.0)))
    }

    // =========================================================================
    // Construction Primitives
    // =========================================================================

    pub(crate) fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    /// Creates an empty table. Names and ids are unique per schema.
    pub(crate) fn create_table(
        &mut self,
        name: TableName,
        id: TableId,
        ordinal: Option<Ordinal>,
    ) -> StrataResult<&mut Table> {
        if self.names.contains_key(&name) {
            return Err(StrataError::DuplicateTable {
                table: name.to_string(),
                reason: "name already declared".to_string(),
            });
        }
        if let Some(existing) = self.tables.get(&id) {
            return Err(StrataError::DuplicateTable {
                table: name.to_string(),
                reason: format!("id {id} already used by {}", existing.name()),
            });
        }

        self.names.insert(name.clone(), id);
        Ok(self.tables.entry(id).or_insert(Table::new(id, name, ordinal)))
    }

    /// Appends a column. Positions and names are unique per table.
    pub(crate) fn add_column(&mut self, column: Column) -> StrataResult<ColumnRef> {
        let table = self.table_mut(column.table())?;
        if table
            .columns
            .iter()
            .any(|c| c.position() == column.position() || c.name() == column.name())
        {
            return Err(StrataError::DuplicateColumn {
                table: table.name.to_string(),
                column: column.name().to_string(),
                position: column.position(),
            });
        }

        table.columns.push(column);
        Ok(ColumnRef::new(table.id, table.columns.len() - 1))
    }

    /// Attaches a table-scoped index. Names are unique per table.
    pub(crate) fn add_table_index(&mut self, table: TableId, index: Index) -> StrataResult<()> {
        let table = self.table_mut(table)?;
        if table.index(index.name()).is_some() {
            return Err(StrataError::DuplicateIndex {
                owner: table.name.to_string(),
                index: index.name().to_string(),
            });
        }
        table.indexes.push(index);
        Ok(())
    }

    /// Creates a join between two existing, distinct tables. A child has at
    /// most one parent.
    pub(crate) fn create_join(
        &mut self,
        name: impl Into<String>,
        parent: TableId,
        child: TableId,
    ) -> StrataResult<JoinId> {
        let invalid = |reason: &str| StrataError::InvalidJoin {
            parent: parent.to_string(),
            child: child.to_string(),
            reason: reason.to_string(),
        };

        if !self.tables.contains_key(&parent) {
            return Err(invalid("parent table does not exist"));
        }
        if !self.tables.contains_key(&child) {
            return Err(invalid("child table does not exist"));
        }
        if parent == child {
            return Err(invalid("a table cannot join to itself"));
        }
        if self.table_ref(child)?.parent_join.is_some() {
            return Err(invalid("child table already has a parent join"));
        }

        let id = JoinId(self.joins.len());
        self.joins.push(Join {
            id,
            name: name.into(),
            parent,
            child,
            columns: Vec::new(),
            group: None,
        });
        self.table_mut(child)?.parent_join = Some(id);
        self.table_mut(parent)?.child_joins.push(id);
        Ok(id)
    }

    /// Appends a (parent column, child column) pair to a join.
    pub(crate) fn add_join_column(
        &mut self,
        join: JoinId,
        parent_column: &str,
        child_column: &str,
    ) -> StrataResult<()> {
        let (parent, child) = {
            let join = self
                .join(join)
                .ok_or_else(|| StrataError::internal(format!("join {} is missing", join.0)))?;
            (join.parent, join.child)
        };

        let resolve = |table: TableId, column: &str| -> StrataResult<ColumnRef> {
            let table = self.table_ref(table)?;
            table
                .column_by_name(column)
                .ok_or_else(|| StrataError::UnresolvedColumn {
                    kind: "JoinColumn",
                    table: table.name().to_string(),
                    column: column.to_string(),
                })
        };
        let column = JoinColumn {
            parent: resolve(parent, parent_column)?,
            child: resolve(child, child_column)?,
        };

        self.joins[join.0].columns.push(column);
        Ok(())
    }

    /// Creates an empty group identified by its root table name.
    pub(crate) fn create_group(&mut self, name: TableName) -> StrataResult<GroupId> {
        if self.group_names.contains(&name) {
            return Err(StrataError::DuplicateGroup {
                root: name.to_string(),
            });
        }
        let id = GroupId(self.groups.len());
        self.group_names.insert(name.clone());
        self.groups.push(Group::new(id, name));
        Ok(id)
    }

    /// Attaches the root table and storage identity to a group.
    pub(crate) fn attach_group_root(
        &mut self,
        group: GroupId,
        root: TableId,
        storage_table_id: TableId,
        storage_table_name: String,
        tree_name: Option<String>,
    ) -> StrataResult<()> {
        let entry = self.group_mut(group)?;
        entry.root = root;
        entry.storage_table_id = storage_table_id;
        entry.storage_table_name = storage_table_name;
        entry.tree_name = tree_name.clone();

        let table = self.table_mut(root)?;
        table.tree_name = tree_name;
        table.group = Some(group);
        Ok(())
    }

    /// Assigns a join and its child table to a group.
    pub(crate) fn assign_join_group(&mut self, join: JoinId, group: GroupId) -> StrataResult<TableId> {
        let entry = self
            .joins
            .get_mut(join.0)
            .ok_or_else(|| StrataError::internal(format!("join {} is missing", join.0)))?;
        entry.group = Some(group);
        let child = entry.child;
        self.table_mut(child)?.group = Some(group);
        Ok(child)
    }

    /// Attaches a group-scoped index. Names are unique per group.
    pub(crate) fn add_group_index(&mut self, group: GroupId, index: Index) -> StrataResult<()> {
        let entry = self.group_mut(group)?;
        if entry.index(index.name()).is_some() {
            return Err(StrataError::DuplicateIndex {
                owner: format!("group {}", entry.name),
                index: index.name().to_string(),
            });
        }
        entry.indexes.push(index);
        Ok(())
    }

    /// Largest table id in use, or 1 if no table exists.
    pub(crate) fn max_table_id(&self) -> TableId {
        self.tables
            .keys()
            .next_back()
            .copied()
            .unwrap_or(TableId::FIRST)
            .max(TableId::FIRST)
    }
}
