//! Artifact fixtures shared by the integration tests.

#![allow(dead_code)]

use strata_schema::artifact::{
    ArtifactRecord, CharCollationRecord, ColumnRecord, GroupRecord, IndexColumnRecord,
    IndexRecord, JoinColumnRecord, JoinRecord, SchemaRecord, TableNameRecord, TableRecord,
    TypeRecord,
};

pub fn type_record(name: &str, fixed_size: bool, max_size_bytes: u64) -> TypeRecord {
    TypeRecord {
        type_name: Some(name.to_string()),
        parameters: Some(0),
        fixed_size: Some(fixed_size),
        max_size_bytes: Some(max_size_bytes),
    }
}

pub fn column(name: &str, type_name: &str, position: u32) -> ColumnRecord {
    ColumnRecord {
        column_name: Some(name.to_string()),
        type_name: Some(type_name.to_string()),
        is_nullable: Some(false),
        position: Some(position),
        ..Default::default()
    }
}

pub fn int_columns(names: &[&str]) -> Vec<ColumnRecord> {
    names
        .iter()
        .zip(0u32..)
        .map(|(name, position)| column(name, "INT", position))
        .collect()
}

pub fn table_name(schema: &str, table: &str) -> TableNameRecord {
    TableNameRecord {
        schema_name: Some(schema.to_string()),
        table_name: Some(table.to_string()),
    }
}

pub fn index_column(name: &str, position: u32) -> IndexColumnRecord {
    IndexColumnRecord {
        column_name: Some(name.to_string()),
        table_name: None,
        position: Some(position),
        is_ascending: Some(true),
    }
}

pub fn index(name: &str, id: u32, pk: bool, unique: bool, columns: &[&str]) -> IndexRecord {
    IndexRecord {
        index_name: Some(name.to_string()),
        index_id: Some(id),
        is_pk: Some(pk),
        is_unique: Some(unique),
        is_ak_fk: Some(false),
        columns: columns
            .iter()
            .zip(0u32..)
            .map(|(c, position)| index_column(c, position))
            .collect(),
        ..Default::default()
    }
}

pub fn primary_key(columns: &[&str]) -> IndexRecord {
    index("PRIMARY", 1, true, true, columns)
}

pub fn join(schema: &str, parent: &str, pairs: &[(&str, &str)]) -> JoinRecord {
    JoinRecord {
        parent_table: Some(table_name(schema, parent)),
        columns: pairs
            .iter()
            .map(|(p, c)| JoinColumnRecord {
                parent_column: Some(p.to_string()),
                child_column: Some(c.to_string()),
            })
            .collect(),
    }
}

pub fn table(name: &str, columns: &[&str]) -> TableRecord {
    TableRecord {
        table_name: Some(name.to_string()),
        columns: int_columns(columns),
        ..Default::default()
    }
}

pub fn group(root: &str) -> GroupRecord {
    GroupRecord {
        root_table_name: Some(root.to_string()),
        ..Default::default()
    }
}

pub fn schema(name: &str, tables: Vec<TableRecord>, groups: Vec<GroupRecord>) -> SchemaRecord {
    SchemaRecord {
        schema_name: Some(name.to_string()),
        tables,
        groups,
        char_coll: None,
    }
}

/// Types = [INT]; schema "s" with group A and child B joined on A.id = B.a_id.
pub fn parent_child() -> ArtifactRecord {
    let mut a = table("A", &["id"]);
    a.indexes = vec![primary_key(&["id"])];

    let mut b = table("B", &["id", "a_id"]);
    b.parent_table = Some(join("s", "A", &[("id", "a_id")]));

    ArtifactRecord {
        types: vec![type_record("INT", true, 4)],
        schemas: vec![schema("s", vec![a, b], vec![group("A")])],
    }
}

/// A three-level customer/order/item hierarchy with an address branch, a
/// group index spanning customers and orders, and a second namespace.
///
/// Children are declared before their parents.
pub fn shop() -> ArtifactRecord {
    let mut items = table("items", &["iid", "oid", "qty"]);
    items.table_id = Some(40);
    items.ordinal = Some(4);
    items.indexes = vec![primary_key(&["iid"])];
    items.parent_table = Some(join("shop", "orders", &[("oid", "oid")]));

    let mut orders = table("orders", &["oid", "cid", "odate"]);
    orders.ordinal = Some(2);
    orders.indexes = vec![
        primary_key(&["oid"]),
        index("odate", 2, false, false, &["odate"]),
    ];
    orders.parent_table = Some(join("shop", "customers", &[("cid", "cid")]));

    let mut addresses = table("addresses", &["aid", "cid"]);
    addresses.ordinal = Some(3);
    addresses.description = Some("postal addresses".to_string());
    addresses.parent_table = Some(join("shop", "customers", &[("cid", "cid")]));

    let mut customers = TableRecord {
        table_name: Some("customers".to_string()),
        ordinal: Some(1),
        columns: vec![
            column("cid", "INT", 0),
            ColumnRecord {
                is_nullable: Some(true),
                type_param1: Some(64),
                default_value: Some("anonymous".to_string()),
                char_coll: Some(CharCollationRecord {
                    character_set_name: Some("utf8".to_string()),
                    collation_order_name: Some("utf8_bin".to_string()),
                }),
                ..column("name", "VARCHAR", 1)
            },
        ],
        indexes: vec![primary_key(&["cid"]), index("name", 2, false, true, &["name"])],
        protected: Some(true),
        ..Default::default()
    };
    customers.char_coll = Some(CharCollationRecord {
        character_set_name: Some("utf8".to_string()),
        collation_order_name: Some("utf8_general_ci".to_string()),
    });

    let mut name_date = index("name_date", 10, false, false, &[]);
    name_date.join_type = Some(1);
    name_date.columns = vec![
        IndexColumnRecord {
            table_name: Some(table_name("shop", "customers")),
            ..index_column("name", 0)
        },
        IndexColumnRecord {
            table_name: Some(table_name("shop", "orders")),
            ..index_column("odate", 1)
        },
        index_column("oid", 2),
    ];
    let mut customers_group = group("customers");
    customers_group.tree_name = Some("customers_tree".to_string());
    customers_group.indexes = vec![name_date];

    let mut audit = table("audit", &["id", "entry"]);
    audit.ordinal = Some(5);
    audit.indexes = vec![primary_key(&["id"])];

    ArtifactRecord {
        types: vec![type_record("INT", true, 4), type_record("VARCHAR", false, 255)],
        schemas: vec![
            schema(
                "shop",
                vec![items, orders, addresses, customers],
                vec![customers_group],
            ),
            schema("ops", vec![audit], vec![group("audit")]),
        ],
    }
}
