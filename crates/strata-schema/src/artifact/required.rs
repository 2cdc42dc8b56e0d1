//! Required-field validation for artifact records.
//!
//! Every record field is required unless it appears on the allow-list of its
//! record kind. A record is checked before anything is built from it, and
//! every missing field is reported at once.

use std::fmt;

use strata_common::error::{StrataError, StrataResult};

use super::{
    ArtifactRecord, CharCollationRecord, ColumnRecord, GroupRecord, IndexColumnRecord,
    IndexRecord, JoinColumnRecord, JoinRecord, SchemaRecord, TableNameRecord, TableRecord,
    TypeRecord,
};

/// Kind of a serialized record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Top-level artifact.
    Artifact,
    /// Type definition.
    Type,
    /// Schema namespace.
    Schema,
    /// Group.
    Group,
    /// Table.
    Table,
    /// Column.
    Column,
    /// Table-scoped index.
    Index,
    /// Group-scoped index. Same record shape as [`RecordKind::Index`].
    GroupIndex,
    /// Index column.
    IndexColumn,
    /// Parent join.
    Join,
    /// Join column pair.
    JoinColumn,
    /// Qualified table name.
    TableName,
    /// Character set and collation.
    CharCollation,
}

impl RecordKind {
    /// Returns the kind name used in errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Artifact => "Artifact",
            Self::Type => "Type",
            Self::Schema => "Schema",
            Self::Group => "Group",
            Self::Table => "Table",
            Self::Column => "Column",
            Self::Index => "Index",
            Self::GroupIndex => "GroupIndex",
            Self::IndexColumn => "IndexColumn",
            Self::Join => "Join",
            Self::JoinColumn => "JoinColumn",
            Self::TableName => "TableName",
            Self::CharCollation => "CharCollation",
        }
    }

    /// Returns the fields that may be absent.
    pub fn optional_fields(self) -> &'static [&'static str] {
        match self {
            Self::Artifact => &["types", "schemas"],
            Self::Schema => &["tables", "groups", "char_coll"],
            Self::Group => &["tree_name", "indexes"],
            Self::Table => &[
                "table_id",
                "ordinal",
                "indexes",
                "parent_table",
                "char_coll",
                "description",
                "protected",
            ],
            Self::Column => &[
                "type_param1",
                "type_param2",
                "init_auto_inc",
                "default_value",
                "char_coll",
                "description",
            ],
            Self::Index => &["tree_name", "description", "join_type"],
            Self::GroupIndex => &["tree_name", "description"],
            Self::IndexColumn => &["table_name"],
            Self::Type | Self::Join | Self::JoinColumn | Self::TableName | Self::CharCollation => {
                &[]
            }
        }
    }

    /// Returns true if `field` may be absent.
    pub fn is_optional(self, field: &str) -> bool {
        self.optional_fields().contains(&field)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A serialized record whose field presence can be inspected.
pub trait Record {
    /// The record kind this type is checked as by default.
    const KIND: RecordKind;

    /// Returns every field with whether it is present, in declaration order.
    fn field_presence(&self) -> Vec<(&'static str, bool)>;
}

/// Checks a record against the allow-list of its own kind.
pub fn check_required<R: Record>(record: &R) -> StrataResult<()> {
    check_required_as(record, R::KIND)
}

/// Checks a record against the allow-list of `kind`.
///
/// Fails with `MalformedRecord` naming every missing required field.
pub fn check_required_as<R: Record>(record: &R, kind: RecordKind) -> StrataResult<()> {
    let missing: Vec<String> = record
        .field_presence()
        .into_iter()
        .filter(|(name, present)| !present && !kind.is_optional(name))
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StrataError::MalformedRecord {
            kind: kind.name(),
            missing,
        })
    }
}

/// Returns a field that [`check_required_as`] has already vetted.
pub(crate) fn field<'a, T>(
    value: &'a Option<T>,
    kind: RecordKind,
    name: &'static str,
) -> StrataResult<&'a T> {
    value.as_ref().ok_or_else(|| StrataError::MalformedRecord {
        kind: kind.name(),
        missing: vec![name.to_string()],
    })
}

macro_rules! impl_record {
    ($record:ty, $kind:ident, scalars: [$($scalar:ident),*], lists: [$($list:ident),*]) => {
        impl Record for $record {
            const KIND: RecordKind = RecordKind::$kind;

            fn field_presence(&self) -> Vec<(&'static str, bool)> {
                vec![
                    $((stringify!($scalar), self.$scalar.is_some()),)*
                    $((stringify!($list), !self.$list.is_empty()),)*
                ]
            }
        }
    };
}

impl_record!(ArtifactRecord, Artifact, scalars: [], lists: [types, schemas]);
impl_record!(
    TypeRecord,
    Type,
    scalars: [type_name, parameters, fixed_size, max_size_bytes],
    lists: []
);
impl_record!(
    SchemaRecord,
    Schema,
    scalars: [schema_name, char_coll],
    lists: [tables, groups]
);
impl_record!(
    GroupRecord,
    Group,
    scalars: [root_table_name, tree_name],
    lists: [indexes]
);
impl_record!(
    TableRecord,
    Table,
    scalars: [
        table_name,
        table_id,
        ordinal,
        parent_table,
        char_coll,
        description,
        protected
    ],
    lists: [columns, indexes]
);
impl_record!(
    ColumnRecord,
    Column,
    scalars: [
        column_name,
        type_name,
        is_nullable,
        position,
        type_param1,
        type_param2,
        init_auto_inc,
        default_value,
        char_coll,
        description
    ],
    lists: []
);
impl_record!(
    IndexRecord,
    Index,
    scalars: [
        index_name,
        index_id,
        is_pk,
        is_unique,
        is_ak_fk,
        tree_name,
        description,
        join_type
    ],
    lists: [columns]
);
impl_record!(
    IndexColumnRecord,
    IndexColumn,
    scalars: [column_name, table_name, position, is_ascending],
    lists: []
);
impl_record!(JoinRecord, Join, scalars: [parent_table], lists: [columns]);
impl_record!(
    JoinColumnRecord,
    JoinColumn,
    scalars: [parent_column, child_column],
    lists: []
);
impl_record!(
    TableNameRecord,
    TableName,
    scalars: [schema_name, table_name],
    lists: []
);
impl_record!(
    CharCollationRecord,
    CharCollation,
    scalars: [character_set_name, collation_order_name],
    lists: []
);
