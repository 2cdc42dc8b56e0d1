use std::sync::Arc;

use strata_common::types::TableId;

use crate::types::Type;

/// Stable reference to a column: owning table plus the column's slot in the
/// table's declared column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Owning table.
    pub table: TableId,
    /// Slot in declaration order (not the declared position).
    pub index: usize,
}

impl ColumnRef {
    /// Creates a column reference.
    pub fn new(table: TableId, index: usize) -> Self {
        Self { table, index }
    }
}

/// Character set and collation pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharsetAndCollation {
    /// Character set name.
    pub charset: String,
    /// Collation order name.
    pub collation: String,
}

impl CharsetAndCollation {
    /// Creates a pair.
    pub fn new(charset: impl Into<String>, collation: impl Into<String>) -> Self {
        Self {
            charset: charset.into(),
            collation: collation.into(),
        }
    }
}

/// A table column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    table: TableId,
    name: String,
    position: u32,
    ty: Arc<Type>,
    nullable: bool,
    type_param1: Option<i64>,
    type_param2: Option<i64>,
    init_auto_inc: Option<i64>,
    default_value: Option<String>,
    charset: Option<CharsetAndCollation>,
    description: Option<String>,
}

impl Column {
    /// Creates a column with no optional attributes.
    pub fn new(
        table: TableId,
        name: impl Into<String>,
        position: u32,
        ty: Arc<Type>,
        nullable: bool,
    ) -> Self {
        Self {
            table,
            name: name.into(),
            position,
            ty,
            nullable,
            type_param1: None,
            type_param2: None,
            init_auto_inc: None,
            default_value: None,
            charset: None,
            description: None,
        }
    }

    /// Sets the type parameters.
    pub fn with_type_params(mut self, param1: Option<i64>, param2: Option<i64>) -> Self {
        self.type_param1 = param1;
        self.type_param2 = param2;
        self
    }

    /// Sets the initial auto-increment value.
    pub fn with_init_auto_inc(mut self, value: Option<i64>) -> Self {
        self.init_auto_inc = value;
        self
    }

    /// Sets the default value.
    pub fn with_default_value(mut self, value: Option<String>) -> Self {
        self.default_value = value;
        self
    }

    /// Sets the character set and collation.
    pub fn with_charset(mut self, charset: Option<CharsetAndCollation>) -> Self {
        self.charset = charset;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Returns the owning table.
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared position, unique within the table.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Returns the column type.
    pub fn ty(&self) -> &Arc<Type> {
        &self.ty
    }

    /// Returns true if the column accepts NULL.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the first type parameter.
    pub fn type_param1(&self) -> Option<i64> {
        self.type_param1
    }

    /// Returns the second type parameter.
    pub fn type_param2(&self) -> Option<i64> {
        self.type_param2
    }

    /// Returns the initial auto-increment value.
    pub fn init_auto_inc(&self) -> Option<i64> {
        self.init_auto_inc
    }

    /// Returns the default value expression.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Returns the character set and collation.
    pub fn charset(&self) -> Option<&CharsetAndCollation> {
        self.charset.as_ref()
    }

    /// Returns the description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
