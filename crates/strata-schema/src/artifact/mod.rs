//! Serialized metadata artifact.
//!
//! An artifact is a 4-byte big-endian body length followed by a bincode
//! encoded [`ArtifactRecord`]. Scalar fields are `Option` so that absence is
//! observable; list fields count as present when non-empty. Which absences
//! are tolerated is decided per record kind in [`required`].

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use strata_common::constants::ARTIFACT_LENGTH_PREFIX_SIZE;
use strata_common::error::{StrataError, StrataResult};

pub mod required;

pub use required::{check_required, check_required_as, Record, RecordKind};

/// Top-level artifact message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Declared types.
    pub types: Vec<TypeRecord>,
    /// Declared schema namespaces.
    pub schemas: Vec<SchemaRecord>,
}

/// A type definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeRecord {
    /// Type name, unique per artifact.
    pub type_name: Option<String>,
    /// Number of type parameters.
    pub parameters: Option<u32>,
    /// Whether values have a fixed size.
    pub fixed_size: Option<bool>,
    /// Maximum storage size of one value.
    pub max_size_bytes: Option<u64>,
}

/// A schema namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaRecord {
    /// Namespace name.
    pub schema_name: Option<String>,
    /// Tables declared in this namespace.
    pub tables: Vec<TableRecord>,
    /// Groups whose root tables live in this namespace.
    pub groups: Vec<GroupRecord>,
    /// Default character set and collation.
    pub char_coll: Option<CharCollationRecord>,
}

/// A group, identified by the name of its root table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Root table name, resolved in the enclosing namespace.
    pub root_table_name: Option<String>,
    /// Physical tree name.
    pub tree_name: Option<String>,
    /// Group-scoped indexes.
    pub indexes: Vec<IndexRecord>,
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Table name.
    pub table_name: Option<String>,
    /// Explicit table id; generated when absent.
    pub table_id: Option<u32>,
    /// Ordinal written into physical keys; the table id when absent.
    pub ordinal: Option<u32>,
    /// Columns in declared order.
    pub columns: Vec<ColumnRecord>,
    /// Table-scoped indexes.
    pub indexes: Vec<IndexRecord>,
    /// Join to the parent table.
    pub parent_table: Option<JoinRecord>,
    /// Character set and collation.
    pub char_coll: Option<CharCollationRecord>,
    /// Free-form description.
    pub description: Option<String>,
    /// Whether the table is protected from DDL.
    pub protected: Option<bool>,
}

/// A column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    /// Column name.
    pub column_name: Option<String>,
    /// Name of a declared type.
    pub type_name: Option<String>,
    /// Nullability.
    pub is_nullable: Option<bool>,
    /// Position, unique within the table.
    pub position: Option<u32>,
    /// First type parameter.
    pub type_param1: Option<i64>,
    /// Second type parameter.
    pub type_param2: Option<i64>,
    /// Initial auto-increment value.
    pub init_auto_inc: Option<i64>,
    /// Default value literal.
    pub default_value: Option<String>,
    /// Character set and collation.
    pub char_coll: Option<CharCollationRecord>,
    /// Free-form description.
    pub description: Option<String>,
}

/// A table or group index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Index name.
    pub index_name: Option<String>,
    /// Index id.
    pub index_id: Option<u32>,
    /// Primary key flag.
    pub is_pk: Option<bool>,
    /// Uniqueness flag.
    pub is_unique: Option<bool>,
    /// Foreign key flag.
    pub is_ak_fk: Option<bool>,
    /// Columns in declared order.
    pub columns: Vec<IndexColumnRecord>,
    /// Physical tree name.
    pub tree_name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Raw group-index join type.
    pub join_type: Option<i32>,
}

/// One column of an index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexColumnRecord {
    /// Column name.
    pub column_name: Option<String>,
    /// Owning table; inherited from the previous column when absent.
    pub table_name: Option<TableNameRecord>,
    /// Position within the index.
    pub position: Option<u32>,
    /// Sort direction.
    pub is_ascending: Option<bool>,
}

/// A parent join, declared on the child table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinRecord {
    /// Qualified parent table name.
    pub parent_table: Option<TableNameRecord>,
    /// Column pairs in declared order.
    pub columns: Vec<JoinColumnRecord>,
}

/// One (parent column, child column) pair of a join.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinColumnRecord {
    /// Column on the parent table.
    pub parent_column: Option<String>,
    /// Column on the child table.
    pub child_column: Option<String>,
}

/// A schema-qualified table name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableNameRecord {
    /// Namespace.
    pub schema_name: Option<String>,
    /// Table name.
    pub table_name: Option<String>,
}

/// Character set and collation names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharCollationRecord {
    /// Character set.
    pub character_set_name: Option<String>,
    /// Collation.
    pub collation_order_name: Option<String>,
}

/// Encodes an artifact with its length prefix.
pub fn encode_artifact(artifact: &ArtifactRecord) -> StrataResult<Bytes> {
    let body = bincode::serialize(artifact)
        .map_err(|e| StrataError::internal(format!("failed to encode artifact: {e}")))?;

    let len = u32::try_from(body.len()).map_err(|_| {
        StrataError::invalid_argument(format!("artifact too large: {} bytes", body.len()))
    })?;

    let mut buf = BytesMut::with_capacity(ARTIFACT_LENGTH_PREFIX_SIZE + body.len());
    buf.put_u32(len);
    buf.put_slice(&body);
    Ok(buf.freeze())
}

/// Decodes a length-prefixed artifact.
///
/// The declared body length is checked against the available bytes and
/// against `max_bytes` before anything is decoded. Bytes after the body are
/// ignored.
pub fn decode_artifact(mut data: &[u8], max_bytes: usize) -> StrataResult<ArtifactRecord> {
    if data.len() < ARTIFACT_LENGTH_PREFIX_SIZE {
        return Err(StrataError::Decode {
            kind: "artifact",
            reason: format!("length prefix truncated: {} bytes", data.len()),
        });
    }

    let declared = data.get_u32() as usize;
    if declared > max_bytes {
        return Err(StrataError::SizeMismatch {
            declared,
            available: max_bytes,
        });
    }
    if declared > data.remaining() {
        return Err(StrataError::SizeMismatch {
            declared,
            available: data.remaining(),
        });
    }

    bincode::deserialize(&data[..declared]).map_err(|e| StrataError::Decode {
        kind: "artifact",
        reason: e.to_string(),
    })
}
