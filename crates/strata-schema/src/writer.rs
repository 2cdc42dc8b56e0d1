//! Schema graph to artifact serialization.
//!
//! The writer is the inverse of [`SchemaReader`](crate::SchemaReader):
//! reading what it writes reproduces the same tables, columns, joins, groups
//! and indexes. Table ids are always written explicitly so that a reload
//! does not renumber them.

use std::collections::HashSet;
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use strata_common::error::StrataResult;
use strata_common::types::TableId;

use crate::artifact::{
    encode_artifact, ArtifactRecord, CharCollationRecord, ColumnRecord, GroupRecord,
    IndexColumnRecord, IndexRecord, JoinColumnRecord, JoinRecord, SchemaRecord, TableNameRecord,
    TableRecord, TypeRecord,
};
use crate::model::{
    CharsetAndCollation, Column, Group, Index, IndexConstraint, IndexScope, Schema, Table,
    TableName,
};

/// Serializes a [`Schema`] into the artifact format.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaWriter;

impl SchemaWriter {
    /// Creates a writer.
    pub fn new() -> Self {
        Self
    }

    /// Builds the artifact records for a schema.
    pub fn to_artifact(&self, schema: &Schema) -> ArtifactRecord {
        let types = schema
            .types()
            .iter()
            .map(|ty| TypeRecord {
                type_name: Some(ty.name().to_string()),
                parameters: Some(ty.parameters()),
                fixed_size: Some(ty.fixed_size()),
                max_size_bytes: Some(ty.max_size_bytes()),
            })
            .collect();

        let schemas = namespaces(schema)
            .into_iter()
            .map(|name| SchemaRecord {
                tables: schema
                    .tables()
                    .filter(|t| t.name().schema() == name)
                    .map(|t| table_record(schema, t))
                    .collect(),
                groups: schema
                    .groups()
                    .iter()
                    .filter(|g| g.name().schema() == name)
                    .map(|g| group_record(schema, g))
                    .collect(),
                schema_name: Some(name),
                char_coll: None,
            })
            .collect();

        ArtifactRecord { types, schemas }
    }

    /// Serializes a schema into a length-prefixed artifact.
    pub fn write(&self, schema: &Schema) -> StrataResult<Bytes> {
        encode_artifact(&self.to_artifact(schema))
    }

    /// Serializes a schema into a file.
    pub fn write_file(&self, schema: &Schema, path: impl AsRef<Path>) -> StrataResult<()> {
        let path = path.as_ref();
        let bytes = self.write(schema)?;
        std::fs::write(path, &bytes)?;
        debug!("Wrote {} artifact bytes to {:?}", bytes.len(), path);
        Ok(())
    }
}

/// Schema names in order of first appearance: group roots, then tables.
fn namespaces(schema: &Schema) -> Vec<String> {
    let mut seen = HashSet::new();
    schema
        .groups()
        .iter()
        .map(|g| g.name().schema())
        .chain(schema.tables().map(|t| t.name().schema()))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

fn table_record(schema: &Schema, table: &Table) -> TableRecord {
    TableRecord {
        table_name: Some(table.name().table().to_string()),
        table_id: Some(table.id().as_u32()),
        ordinal: table.declared_ordinal().map(|o| o.as_u32()),
        columns: table.columns().iter().map(column_record).collect(),
        indexes: table
            .indexes()
            .iter()
            .map(|i| index_record(schema, i))
            .collect(),
        parent_table: schema.parent_join(table.id()).map(|join| JoinRecord {
            parent_table: schema.table(join.parent()).map(|p| table_name_record(p.name())),
            columns: join
                .columns()
                .iter()
                .map(|c| JoinColumnRecord {
                    parent_column: schema.column(c.parent).map(|col| col.name().to_string()),
                    child_column: schema.column(c.child).map(|col| col.name().to_string()),
                })
                .collect(),
        }),
        char_coll: table.charset().map(char_coll_record),
        description: table.description().map(str::to_string),
        protected: Some(table.is_protected()),
    }
}

fn column_record(column: &Column) -> ColumnRecord {
    ColumnRecord {
        column_name: Some(column.name().to_string()),
        type_name: Some(column.ty().name().to_string()),
        is_nullable: Some(column.is_nullable()),
        position: Some(column.position()),
        type_param1: column.type_param1(),
        type_param2: column.type_param2(),
        init_auto_inc: column.init_auto_inc(),
        default_value: column.default_value().map(str::to_string),
        char_coll: column.charset().map(char_coll_record),
        description: column.description().map(str::to_string),
    }
}

fn group_record(schema: &Schema, group: &Group) -> GroupRecord {
    GroupRecord {
        root_table_name: Some(group.name().table().to_string()),
        tree_name: group.tree_name().map(str::to_string),
        indexes: group
            .indexes()
            .iter()
            .map(|i| index_record(schema, i))
            .collect(),
    }
}

/// Writes an index. Flags are re-derived from the constraint kind, and a
/// column names its table only when the owner changes.
fn index_record(schema: &Schema, index: &Index) -> IndexRecord {
    let mut owner: Option<TableId> = match index.scope() {
        IndexScope::Table(table) => Some(table),
        IndexScope::Group(_) => None,
    };

    let columns = index
        .columns()
        .iter()
        .map(|c| {
            let column = c.column();
            let table_name = if owner == Some(column.table) {
                None
            } else {
                owner = Some(column.table);
                schema.table(column.table).map(|t| table_name_record(t.name()))
            };
            IndexColumnRecord {
                column_name: schema.column(column).map(|col| col.name().to_string()),
                table_name,
                position: Some(c.position()),
                is_ascending: Some(c.is_ascending()),
            }
        })
        .collect();

    IndexRecord {
        index_name: Some(index.name().to_string()),
        index_id: Some(index.id().as_u32()),
        is_pk: Some(index.constraint() == IndexConstraint::Primary),
        is_unique: Some(index.is_unique()),
        is_ak_fk: Some(index.constraint() == IndexConstraint::Foreign),
        columns,
        tree_name: index.tree_name().map(str::to_string),
        description: index.description().map(str::to_string),
        join_type: index.join_type().map(|j| j.as_raw()),
    }
}

fn table_name_record(name: &TableName) -> TableNameRecord {
    TableNameRecord {
        schema_name: Some(name.schema().to_string()),
        table_name: Some(name.table().to_string()),
    }
}

fn char_coll_record(charset: &CharsetAndCollation) -> CharCollationRecord {
    CharCollationRecord {
        character_set_name: Some(charset.charset.clone()),
        collation_order_name: Some(charset.collation.clone()),
    }
}
