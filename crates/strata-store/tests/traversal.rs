//! Integration tests for decoding group tree entries.

use strata_common::error::StrataError;
use strata_common::types::{Row, TableId, Value};
use strata_common::LoaderConfig;
use strata_schema::artifact::{
    ArtifactRecord, ColumnRecord, GroupRecord, IndexColumnRecord, IndexRecord, JoinColumnRecord,
    JoinRecord, SchemaRecord, TableNameRecord, TableRecord, TypeRecord,
};
use strata_schema::{Schema, SchemaReader};
use strata_store::{
    BinaryRowMaterializer, DecodedKey, KeyCodec, KeyElement, MappedTranslator, MemoryTree,
    RowEncoder, TableIdTranslator, TreeRecordVisitor,
};

fn columns(names: &[&str]) -> Vec<ColumnRecord> {
    names
        .iter()
        .zip(0u32..)
        .map(|(name, position)| ColumnRecord {
            column_name: Some(name.to_string()),
            type_name: Some("INT".to_string()),
            is_nullable: Some(false),
            position: Some(position),
            ..Default::default()
        })
        .collect()
}

fn primary_key(column: &str) -> IndexRecord {
    IndexRecord {
        index_name: Some("PRIMARY".to_string()),
        index_id: Some(1),
        is_pk: Some(true),
        is_unique: Some(true),
        is_ak_fk: Some(false),
        columns: vec![IndexColumnRecord {
            column_name: Some(column.to_string()),
            table_name: None,
            position: Some(0),
            is_ascending: Some(true),
        }],
        ..Default::default()
    }
}

fn table(name: &str, ordinal: u32, cols: &[&str]) -> TableRecord {
    TableRecord {
        table_name: Some(name.to_string()),
        ordinal: Some(ordinal),
        columns: columns(cols),
        ..Default::default()
    }
}

/// Group(A) with child B joined on A.id = B.a_id; ordinals A=5, B=6.
fn schema_with(extra: Vec<SchemaRecord>) -> Schema {
    let mut a = table("A", 5, &["id"]);
    a.indexes = vec![primary_key("id")];

    let mut b = table("B", 6, &["id", "a_id"]);
    b.parent_table = Some(JoinRecord {
        parent_table: Some(TableNameRecord {
            schema_name: Some("s".to_string()),
            table_name: Some("A".to_string()),
        }),
        columns: vec![JoinColumnRecord {
            parent_column: Some("id".to_string()),
            child_column: Some("a_id".to_string()),
        }],
    });

    let mut schemas = vec![SchemaRecord {
        schema_name: Some("s".to_string()),
        tables: vec![a, b],
        groups: vec![GroupRecord {
            root_table_name: Some("A".to_string()),
            ..Default::default()
        }],
        char_coll: None,
    }];
    schemas.extend(extra);

    let artifact = ArtifactRecord {
        types: vec![TypeRecord {
            type_name: Some("INT".to_string()),
            parameters: Some(0),
            fixed_size: Some(true),
            max_size_bytes: Some(4),
        }],
        schemas,
    };
    SchemaReader::default().load_artifact(&artifact).unwrap()
}

fn schema() -> Schema {
    schema_with(Vec::new())
}

fn ids(schema: &Schema) -> (TableId, TableId) {
    (
        schema.table_by_name("s", "A").unwrap().id(),
        schema.table_by_name("s", "B").unwrap().id(),
    )
}

/// Stores A(1), B(10, a_id=1), A(2), B(20, a_id=2) under their own ids.
fn populate(schema: &Schema) -> MemoryTree {
    let (a, b) = ids(schema);
    let mut codec = KeyCodec::new(schema, &LoaderConfig::default()).unwrap();
    let mut tree = MemoryTree::new();

    for parent in [1, 2] {
        let key = codec.encode(a, &[vec![Value::Int(parent)]]).unwrap();
        let value = RowEncoder::new(a).encode(&[Value::Int(parent)]).unwrap();
        tree.insert(key, value);

        let child = parent * 10;
        let key = codec
            .encode(b, &[vec![Value::Int(parent)], vec![Value::Int(parent)]])
            .unwrap();
        let value = RowEncoder::new(b)
            .encode(&[Value::Int(child), Value::Int(parent)])
            .unwrap();
        tree.insert(key, value);
    }
    tree
}

fn collect(
    traversal: &mut TreeRecordVisitor<'_, impl TableIdTranslator, BinaryRowMaterializer>,
    tree: &MemoryTree,
) -> (Vec<(DecodedKey, Row)>, Result<usize, StrataError>) {
    let mut seen = Vec::new();
    let mut cursor = tree.cursor();
    let result = traversal.traverse(&mut cursor, &mut |key: &DecodedKey, row: Row| {
        seen.push((key.clone(), row));
    });
    assert!(cursor.is_closed());
    (seen, result)
}

#[test]
fn test_decodes_child_key_with_parent_segment() {
    let schema = schema();
    let (a, b) = ids(&schema);
    let tree = populate(&schema);

    let mut traversal = TreeRecordVisitor::with_defaults(&schema).unwrap();
    let (seen, result) = collect(&mut traversal, &tree);
    assert_eq!(result.unwrap(), 4);

    let (key, row) = &seen[1];
    assert_eq!(
        key.elements(),
        &[
            KeyElement::Table(a),
            KeyElement::Value(Value::Int(1)),
            KeyElement::Table(b),
            KeyElement::Value(Value::Int(1)),
        ]
    );
    assert_eq!(row.table(), b);
    assert_eq!(row.values(), &[Value::Int(10), Value::Int(1)]);
    assert_eq!(key.leaf(), Some(b));
}

#[test]
fn test_parent_rows_precede_their_children() {
    let schema = schema();
    let (a, b) = ids(&schema);
    let tree = populate(&schema);

    let mut traversal = TreeRecordVisitor::with_defaults(&schema).unwrap();
    let (seen, _) = collect(&mut traversal, &tree);
    let leaves: Vec<_> = seen.iter().map(|(k, _)| k.leaf().unwrap()).collect();
    assert_eq!(leaves, vec![a, b, a, b]);
}

#[test]
fn test_prefix_scan_visits_one_subtree() {
    let schema = schema();
    let (a, _) = ids(&schema);
    let tree = populate(&schema);

    let mut codec = KeyCodec::new(&schema, &LoaderConfig::default()).unwrap();
    let prefix = codec.encode(a, &[vec![Value::Int(2)]]).unwrap();

    let mut traversal = TreeRecordVisitor::with_defaults(&schema).unwrap();
    let mut rows = Vec::new();
    let mut cursor = tree.cursor_prefix(&prefix);
    let visited = traversal
        .traverse(&mut cursor, &mut |_: &DecodedKey, row: Row| rows.push(row))
        .unwrap();

    assert_eq!(visited, 2);
    assert_eq!(rows[0].values(), &[Value::Int(2)]);
    assert_eq!(rows[1].values(), &[Value::Int(20), Value::Int(2)]);
}

#[test]
fn test_ordinal_mismatch_is_corrupt_and_delivers_nothing() {
    let schema = schema();
    let (_, b) = ids(&schema);

    // Second segment carries A's ordinal where B's is expected.
    let key = strata_store::encode_key(&[
        Value::BigInt(5),
        Value::Int(1),
        Value::BigInt(5),
        Value::Int(1),
    ])
    .unwrap();
    let value = RowEncoder::new(b)
        .encode(&[Value::Int(10), Value::Int(1)])
        .unwrap();
    let mut tree = MemoryTree::new();
    tree.insert(key, value);

    let mut traversal = TreeRecordVisitor::with_defaults(&schema).unwrap();
    let (seen, result) = collect(&mut traversal, &tree);

    assert!(seen.is_empty());
    let err = result.unwrap_err();
    assert!(matches!(err, StrataError::CorruptKey { table, .. } if table == b));
    assert!(err.is_corruption());
}

#[test]
fn test_strict_key_length() {
    let schema = schema();
    let (a, b) = ids(&schema);
    let mut codec = KeyCodec::new(&schema, &LoaderConfig::default()).unwrap();

    let short = [Value::BigInt(5), Value::Int(1), Value::BigInt(6)];
    assert!(matches!(
        codec.decode(b, &short),
        Err(StrataError::CorruptKey { .. })
    ));

    let long = [Value::BigInt(5), Value::Int(1), Value::Int(99)];
    assert!(matches!(
        codec.decode(a, &long),
        Err(StrataError::CorruptKey { .. })
    ));

    let text_ordinal = [Value::string("5"), Value::Int(1)];
    assert!(matches!(
        codec.decode(a, &text_ordinal),
        Err(StrataError::CorruptKey { .. })
    ));

    let exact = [Value::BigInt(5), Value::Int(1)];
    let decoded = codec.decode(a, &exact).unwrap();
    assert_eq!(decoded.to_string(), format!("[table {a}, 1]"));
}

#[test]
fn test_encode_checks_segment_shape() {
    let schema = schema();
    let (_, b) = ids(&schema);
    let mut codec = KeyCodec::new(&schema, &LoaderConfig::default()).unwrap();

    assert!(matches!(
        codec.encode(b, &[vec![Value::Int(1)]]),
        Err(StrataError::InvalidArgument { .. })
    ));
    assert!(matches!(
        codec.encode(b, &[vec![Value::Int(1)], vec![]]),
        Err(StrataError::InvalidArgument { .. })
    ));
    assert_eq!(codec.hkey(b).unwrap().key_value_count(), 4);
}

#[test]
fn test_translated_storage_ids() {
    let schema = schema();
    let (a, b) = ids(&schema);

    let mut codec = KeyCodec::new(&schema, &LoaderConfig::default()).unwrap();
    let mut tree = MemoryTree::new();
    tree.insert(
        codec.encode(a, &[vec![Value::Int(1)]]).unwrap(),
        RowEncoder::new(TableId::new(100))
            .encode(&[Value::Int(1)])
            .unwrap(),
    );
    tree.insert(
        codec
            .encode(b, &[vec![Value::Int(1)], vec![Value::Int(1)]])
            .unwrap(),
        RowEncoder::new(TableId::new(101))
            .encode(&[Value::Int(10), Value::Int(1)])
            .unwrap(),
    );

    let translator: MappedTranslator = [(TableId::new(100), a), (TableId::new(101), b)]
        .into_iter()
        .collect();
    let mut traversal = TreeRecordVisitor::new(
        &schema,
        &LoaderConfig::default(),
        translator,
        BinaryRowMaterializer,
    )
    .unwrap();
    let (seen, result) = collect(&mut traversal, &tree);
    assert_eq!(result.unwrap(), 2);
    assert_eq!(seen[1].1.table(), b);

    let partial: MappedTranslator = [(TableId::new(100), a)].into_iter().collect();
    let mut traversal = TreeRecordVisitor::new(
        &schema,
        &LoaderConfig::default(),
        partial,
        BinaryRowMaterializer,
    )
    .unwrap();
    let (seen, result) = collect(&mut traversal, &tree);
    assert_eq!(seen.len(), 1);
    assert!(matches!(result, Err(StrataError::UnknownTableId { id: 101 })));
}

#[test]
fn test_malformed_value_delivers_nothing() {
    let schema = schema();
    let (a, _) = ids(&schema);
    let mut codec = KeyCodec::new(&schema, &LoaderConfig::default()).unwrap();

    let mut tree = MemoryTree::new();
    tree.insert(
        codec.encode(a, &[vec![Value::Int(1)]]).unwrap(),
        RowEncoder::new(a)
            .encode(&[Value::Int(1), Value::Int(2)])
            .unwrap(),
    );

    let mut traversal = TreeRecordVisitor::with_defaults(&schema).unwrap();
    let (seen, result) = collect(&mut traversal, &tree);
    assert!(seen.is_empty());
    assert!(matches!(result, Err(StrataError::CorruptValue { .. })));
}

#[test]
fn test_system_schema_excluded_from_ordinals() {
    let system = SchemaRecord {
        schema_name: Some("strata_information_schema".to_string()),
        tables: vec![table("tables", 5, &["id"])],
        ..Default::default()
    };
    let schema = schema_with(vec![system]);
    let (a, _) = ids(&schema);

    let codec = KeyCodec::new(&schema, &LoaderConfig::default()).unwrap();
    assert_eq!(codec.table_for(strata_common::types::Ordinal::new(5)), Some(a));

    let config = LoaderConfig {
        system_schema: "other".to_string(),
        ..LoaderConfig::default()
    };
    assert!(matches!(
        KeyCodec::new(&schema, &config),
        Err(StrataError::Internal { .. })
    ));
}
