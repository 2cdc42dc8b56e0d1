//! Integration tests for writing a schema graph back into an artifact.

mod common;

use strata_schema::{IndexScope, Schema, SchemaReader, SchemaWriter};

use common::*;

/// Flattens the structure of a schema into sorted, comparable lines.
fn describe(schema: &Schema) -> Vec<String> {
    let mut lines = Vec::new();
    for table in schema.tables() {
        let group = schema
            .group_of(table.id())
            .map(|g| g.name().to_string())
            .unwrap_or_default();
        lines.push(format!(
            "table {} id={} ordinal={} group={}",
            table.name(),
            table.id(),
            table.ordinal(),
            group
        ));
        for column in table.columns() {
            lines.push(format!(
                "column {}.{} pos={} type={} nullable={}",
                table.name(),
                column.name(),
                column.position(),
                column.ty().name(),
                column.is_nullable()
            ));
        }
        for index in table.indexes() {
            lines.push(format!(
                "index {}.{} id={} kind={} columns={}",
                table.name(),
                index.name(),
                index.id().as_u32(),
                index.constraint(),
                index.columns().len()
            ));
        }
        if let Some(join) = schema.parent_join(table.id()) {
            lines.push(format!("join {} columns={}", join.name(), join.columns().len()));
        }
    }
    for group in schema.groups() {
        lines.push(format!(
            "group {} storage={} members={}",
            group.name(),
            group.storage_table_id(),
            schema.group_members(group.id()).len()
        ));
        for index in group.indexes() {
            assert!(matches!(index.scope(), IndexScope::Group(_)));
            lines.push(format!(
                "group index {} kind={} join={:?}",
                index.name(),
                index.constraint(),
                index.join_type()
            ));
        }
    }
    lines.sort();
    lines
}

fn reload(schema: &Schema) -> Schema {
    let bytes = SchemaWriter::new().write(schema).unwrap();
    SchemaReader::default().load(&bytes).unwrap()
}

#[test]
fn test_roundtrip_preserves_structure() {
    for artifact in [parent_child(), shop()] {
        let original = SchemaReader::default().load_artifact(&artifact).unwrap();
        let reloaded = reload(&original);
        assert_eq!(describe(&reloaded), describe(&original));
    }
}

#[test]
fn test_written_artifact_is_stable() {
    let original = SchemaReader::default().load_artifact(&shop()).unwrap();
    let reloaded = reload(&original);

    let writer = SchemaWriter::new();
    assert_eq!(writer.to_artifact(&reloaded), writer.to_artifact(&original));
}

#[test]
fn test_writer_emits_explicit_ids_and_owner_changes() {
    let schema = SchemaReader::default().load_artifact(&shop()).unwrap();
    let artifact = SchemaWriter::new().to_artifact(&schema);

    let names: Vec<_> = artifact
        .schemas
        .iter()
        .map(|s| s.schema_name.clone().unwrap())
        .collect();
    assert_eq!(names, vec!["shop", "ops"]);

    let shop = &artifact.schemas[0];
    assert!(shop.tables.iter().all(|t| t.table_id.is_some()));
    let ids: Vec<_> = shop.tables.iter().map(|t| t.table_id.unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 40]);

    let gi = &shop.groups[0].indexes[0];
    let overrides: Vec<_> = gi.columns.iter().map(|c| c.table_name.is_some()).collect();
    assert_eq!(overrides, vec![true, true, false]);
    assert_eq!(gi.join_type, Some(1));
}

#[test]
fn test_write_file_then_load_file() {
    let schema = SchemaReader::default().load_artifact(&shop()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.bin");

    SchemaWriter::new().write_file(&schema, &path).unwrap();
    let reloaded = SchemaReader::default().load_file(&path).unwrap();
    assert_eq!(describe(&reloaded), describe(&schema));
}
