//! Decode path benchmarks for Strata.
//!
//! Benchmarks for:
//! - Key tuple encoding and decoding
//! - HKey-guided key decoding
//! - Full group tree traversal

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use strata_common::types::{Row, Value};
use strata_common::LoaderConfig;
use strata_schema::artifact::{
    ArtifactRecord, ColumnRecord, GroupRecord, IndexColumnRecord, IndexRecord, JoinColumnRecord,
    JoinRecord, SchemaRecord, TableNameRecord, TableRecord, TypeRecord,
};
use strata_schema::{Schema, SchemaReader};
use strata_store::{
    decode_key, encode_key, DecodedKey, KeyCodec, MemoryTree, RowEncoder, TreeRecordVisitor,
};

fn int_columns(names: &[&str]) -> Vec<ColumnRecord> {
    names
        .iter()
        .zip(0u32..)
        .map(|(name, position)| ColumnRecord {
            column_name: Some(name.to_string()),
            type_name: Some("BIGINT".to_string()),
            is_nullable: Some(false),
            position: Some(position),
            ..Default::default()
        })
        .collect()
}

fn child_of(name: &str, parent: &str, parent_column: &str, child_column: &str) -> TableRecord {
    TableRecord {
        table_name: Some(name.to_string()),
        columns: int_columns(&["id", child_column]),
        parent_table: Some(JoinRecord {
            parent_table: Some(TableNameRecord {
                schema_name: Some("bench".to_string()),
                table_name: Some(parent.to_string()),
            }),
            columns: vec![JoinColumnRecord {
                parent_column: Some(parent_column.to_string()),
                child_column: Some(child_column.to_string()),
            }],
        }),
        ..Default::default()
    }
}

/// customers -> orders -> items
fn schema() -> Schema {
    let customers = TableRecord {
        table_name: Some("customers".to_string()),
        columns: int_columns(&["id"]),
        indexes: vec![IndexRecord {
            index_name: Some("PRIMARY".to_string()),
            index_id: Some(1),
            is_pk: Some(true),
            is_unique: Some(true),
            is_ak_fk: Some(false),
            columns: vec![IndexColumnRecord {
                column_name: Some("id".to_string()),
                table_name: None,
                position: Some(0),
                is_ascending: Some(true),
            }],
            ..Default::default()
        }],
        ..Default::default()
    };
    let artifact = ArtifactRecord {
        types: vec![TypeRecord {
            type_name: Some("BIGINT".to_string()),
            parameters: Some(0),
            fixed_size: Some(true),
            max_size_bytes: Some(8),
        }],
        schemas: vec![SchemaRecord {
            schema_name: Some("bench".to_string()),
            tables: vec![
                customers,
                child_of("orders", "customers", "id", "cid"),
                child_of("items", "orders", "id", "oid"),
            ],
            groups: vec![GroupRecord {
                root_table_name: Some("customers".to_string()),
                ..Default::default()
            }],
            char_coll: None,
        }],
    };
    SchemaReader::default()
        .load_artifact(&artifact)
        .expect("Failed to load schema")
}

/// Populates `customers` customers, each with one order of two items.
fn populate(schema: &Schema, customers: i64) -> MemoryTree {
    let table = |name| {
        schema
            .table_by_name("bench", name)
            .expect("missing table")
            .id()
    };
    let (c, o, i) = (table("customers"), table("orders"), table("items"));
    let mut codec = KeyCodec::new(schema, &LoaderConfig::default()).expect("codec");
    let mut tree = MemoryTree::new();

    for cid in 0..customers {
        let oid = cid * 10;
        tree.insert(
            codec.encode(c, &[vec![Value::BigInt(cid)]]).expect("encode"),
            RowEncoder::new(c).encode(&[Value::BigInt(cid)]).expect("row"),
        );
        tree.insert(
            codec
                .encode(o, &[vec![Value::BigInt(cid)], vec![Value::BigInt(cid)]])
                .expect("encode"),
            RowEncoder::new(o)
                .encode(&[Value::BigInt(oid), Value::BigInt(cid)])
                .expect("row"),
        );
        for item in 0..2 {
            tree.insert(
                codec
                    .encode(
                        i,
                        &[
                            vec![Value::BigInt(cid)],
                            vec![Value::BigInt(cid)],
                            vec![Value::BigInt(oid + item)],
                        ],
                    )
                    .expect("encode"),
                RowEncoder::new(i)
                    .encode(&[Value::BigInt(oid + item), Value::BigInt(oid)])
                    .expect("row"),
            );
        }
    }
    tree
}

fn bench_key_tuple(c: &mut Criterion) {
    let mut group = c.benchmark_group("key/tuple");
    let values = vec![
        Value::BigInt(3),
        Value::BigInt(42),
        Value::BigInt(5),
        Value::string("2024-01-01"),
        Value::BigInt(6),
        Value::Int(7),
    ];
    let key = encode_key(&values).expect("encode");

    group.bench_function("encode", |b| b.iter(|| encode_key(black_box(&values))));
    group.bench_function("decode", |b| b.iter(|| decode_key(black_box(key.as_bytes()))));

    group.finish();
}

fn bench_hkey_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("key/hkey");
    let schema = schema();
    let items = schema
        .table_by_name("bench", "items")
        .expect("missing table")
        .id();
    let mut codec = KeyCodec::new(&schema, &LoaderConfig::default()).expect("codec");
    let key = codec
        .encode(
            items,
            &[
                vec![Value::BigInt(1)],
                vec![Value::BigInt(1)],
                vec![Value::BigInt(10)],
            ],
        )
        .expect("encode");
    let values = decode_key(key.as_bytes()).expect("decode");

    group.bench_function("decode_leaf", |b| {
        b.iter(|| codec.decode(items, black_box(&values)))
    });

    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree/traverse");
    let schema = schema();

    for customers in [100i64, 1000].iter() {
        let tree = populate(&schema, *customers);
        group.throughput(Throughput::Elements(tree.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("full_scan", customers),
            &tree,
            |b, tree| {
                b.iter(|| {
                    let mut traversal =
                        TreeRecordVisitor::with_defaults(&schema).expect("traversal");
                    let mut rows = 0usize;
                    let mut cursor = tree.cursor();
                    traversal
                        .traverse(&mut cursor, &mut |_: &DecodedKey, row: Row| {
                            rows += row.values().len();
                        })
                        .expect("traverse");
                    black_box(rows)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_key_tuple, bench_hkey_decode, bench_traversal);
criterion_main!(benches);
