use std::fmt;

use strata_common::constants::{JOIN_TYPE_LEFT_OUTER, JOIN_TYPE_RIGHT_OUTER};
use strata_common::error::{StrataError, StrataResult};
use strata_common::types::{IndexId, TableId};

use super::column::ColumnRef;
use super::group::GroupId;
use super::schema::Schema;

/// Constraint kind of an index, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexConstraint {
    /// Primary key.
    Primary,
    /// Foreign key.
    Foreign,
    /// Unique key.
    Unique,
    /// Plain (non-unique) key.
    Plain,
}

impl IndexConstraint {
    /// Classifies index flags. The first match wins: primary, then foreign,
    /// then unique.
    pub fn classify(is_primary: bool, is_foreign: bool, is_unique: bool) -> Self {
        if is_primary {
            Self::Primary
        } else if is_foreign {
            Self::Foreign
        } else if is_unique {
            Self::Unique
        } else {
            Self::Plain
        }
    }

    /// Returns the SQL constraint name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Foreign => "FOREIGN KEY",
            Self::Unique => "UNIQUE",
            Self::Plain => "INDEX",
        }
    }
}

impl fmt::Display for IndexConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join semantics of a group index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexJoinType {
    /// Left outer join.
    Left,
    /// Right outer join.
    Right,
}

impl IndexJoinType {
    /// Converts a raw serialized value.
    pub fn from_raw(value: i32) -> StrataResult<Self> {
        match value {
            JOIN_TYPE_LEFT_OUTER => Ok(Self::Left),
            JOIN_TYPE_RIGHT_OUTER => Ok(Self::Right),
            _ => Err(StrataError::UnsupportedEnum {
                kind: "JoinType",
                value,
            }),
        }
    }

    /// Returns the raw serialized value.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Left => JOIN_TYPE_LEFT_OUTER,
            Self::Right => JOIN_TYPE_RIGHT_OUTER,
        }
    }
}

/// What an index is scoped to. Exactly one of table or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexScope {
    /// Table index.
    Table(TableId),
    /// Group index; columns may span member tables.
    Group(GroupId),
}

/// One column of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexColumn {
    column: ColumnRef,
    position: u32,
    ascending: bool,
}

impl IndexColumn {
    /// Resolves `column` in `owner` and builds the index column.
    ///
    /// `owner` is the explicit or inherited owning table; `None` means no
    /// owning table is known yet, which can only fail.
    pub fn resolve(
        schema: &Schema,
        owner: Option<TableId>,
        column: &str,
        position: u32,
        ascending: bool,
    ) -> StrataResult<Self> {
        let unresolved = |table: String| StrataError::UnresolvedColumn {
            kind: "IndexColumn",
            table,
            column: column.to_string(),
        };

        let owner = owner.ok_or_else(|| unresolved("<none>".to_string()))?;
        let table = schema
            .table(owner)
            .ok_or_else(|| unresolved(owner.to_string()))?;
        let column = table
            .column_by_name(column)
            .ok_or_else(|| unresolved(table.name().to_string()))?;

        Ok(Self {
            column,
            position,
            ascending,
        })
    }

    /// Returns the indexed column.
    pub fn column(&self) -> ColumnRef {
        self.column
    }

    /// Returns the position within the index.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Returns true for ascending order.
    pub fn is_ascending(&self) -> bool {
        self.ascending
    }
}

/// A table or group index.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    id: IndexId,
    name: String,
    scope: IndexScope,
    unique: bool,
    constraint: IndexConstraint,
    join_type: Option<IndexJoinType>,
    tree_name: Option<String>,
    description: Option<String>,
    columns: Vec<IndexColumn>,
}

impl Index {
    /// Creates an index without columns.
    pub fn new(
        id: IndexId,
        name: impl Into<String>,
        scope: IndexScope,
        unique: bool,
        constraint: IndexConstraint,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            scope,
            unique,
            constraint,
            join_type: None,
            tree_name: None,
            description: None,
            columns: Vec::new(),
        }
    }

    /// Sets the group-index join type.
    pub fn with_join_type(mut self, join_type: Option<IndexJoinType>) -> Self {
        self.join_type = join_type;
        self
    }

    /// Sets the physical tree name.
    pub fn with_tree_name(mut self, tree_name: Option<String>) -> Self {
        self.tree_name = tree_name;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Appends a column.
    pub fn push_column(&mut self, column: IndexColumn) {
        self.columns.push(column);
    }

    /// Returns the index id.
    pub fn id(&self) -> IndexId {
        self.id
    }

    /// Returns the index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table or group the index belongs to.
    pub fn scope(&self) -> IndexScope {
        self.scope
    }

    /// Returns true if the index was declared unique.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Returns the derived constraint kind.
    pub fn constraint(&self) -> IndexConstraint {
        self.constraint
    }

    /// Returns the group-index join type.
    pub fn join_type(&self) -> Option<IndexJoinType> {
        self.join_type
    }

    /// Returns the physical tree name.
    pub fn tree_name(&self) -> Option<&str> {
        self.tree_name.as_deref()
    }

    /// Returns the description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the columns in declared order.
    pub fn columns(&self) -> &[IndexColumn] {
        &self.columns
    }
}
