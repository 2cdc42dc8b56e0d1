//! Physical value encoding.
//!
//! # Value Envelope
//!
//! - Storage table id (4 bytes, big-endian)
//! - Row payload
//!
//! # Row Payload
//!
//! - Number of columns (4 bytes, big-endian)
//! - For each column: type tag (1 byte) followed by the little-endian value;
//!   strings and bytes carry a 4-byte little-endian length first

use bytes::{BufMut, Bytes, BytesMut};

use strata_common::constants::VALUE_ENVELOPE_HEADER_SIZE;
use strata_common::error::{StrataError, StrataResult};
use strata_common::types::{Row, TableId, Value};
use strata_schema::Table;

/// Type tags for binary encoding.
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
enum TypeTag {
    Null = 0,
    Boolean = 1,
    Int = 4,
    BigInt = 5,
    Double = 7,
    String = 9,
    Bytes = 10,
}

impl TypeTag {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(TypeTag::Null),
            1 => Some(TypeTag::Boolean),
            4 => Some(TypeTag::Int),
            5 => Some(TypeTag::BigInt),
            7 => Some(TypeTag::Double),
            9 => Some(TypeTag::String),
            10 => Some(TypeTag::Bytes),
            _ => None,
        }
    }
}

/// Writes value envelopes for one storage table.
#[derive(Debug, Clone, Copy)]
pub struct RowEncoder {
    storage_table_id: TableId,
}

impl RowEncoder {
    /// Creates an encoder that stamps `storage_table_id` on every value.
    pub fn new(storage_table_id: TableId) -> Self {
        Self { storage_table_id }
    }

    /// Returns the stamped storage table id.
    pub fn storage_table_id(&self) -> TableId {
        self.storage_table_id
    }

    /// Encodes row values into a value envelope.
    pub fn encode(&self, values: &[Value]) -> StrataResult<Bytes> {
        let mut buf = BytesMut::with_capacity(VALUE_ENVELOPE_HEADER_SIZE + 4 + values.len() * 9);
        buf.put_u32(self.storage_table_id.as_u32());
        encode_payload(values, &mut buf)?;
        Ok(buf.freeze())
    }
}

fn encode_payload(values: &[Value], buf: &mut BytesMut) -> StrataResult<()> {
    buf.put_u32(length(values.len())?);
    for value in values {
        match value {
            Value::Null => buf.put_u8(TypeTag::Null as u8),
            Value::Boolean(b) => {
                buf.put_u8(TypeTag::Boolean as u8);
                buf.put_u8(u8::from(*b));
            }
            Value::Int(i) => {
                buf.put_u8(TypeTag::Int as u8);
                buf.put_i32_le(*i);
            }
            Value::BigInt(i) => {
                buf.put_u8(TypeTag::BigInt as u8);
                buf.put_i64_le(*i);
            }
            Value::Double(f) => {
                buf.put_u8(TypeTag::Double as u8);
                buf.put_f64_le(*f);
            }
            Value::String(s) => {
                buf.put_u8(TypeTag::String as u8);
                buf.put_u32_le(length(s.len())?);
                buf.put_slice(s.as_bytes());
            }
            Value::Bytes(b) => {
                buf.put_u8(TypeTag::Bytes as u8);
                buf.put_u32_le(length(b.len())?);
                buf.put_slice(b);
            }
        }
    }
    Ok(())
}

fn length(len: usize) -> StrataResult<u32> {
    u32::try_from(len)
        .map_err(|_| StrataError::invalid_argument(format!("row value too large: {len}")))
}

/// Splits a value envelope into its storage table id and row payload.
pub fn split_envelope(value: &[u8]) -> StrataResult<(TableId, &[u8])> {
    if value.len() < VALUE_ENVELOPE_HEADER_SIZE {
        return Err(StrataError::corrupt_value(format!(
            "value too short for envelope: {} bytes",
            value.len()
        )));
    }
    let (header, payload) = value.split_at(VALUE_ENVELOPE_HEADER_SIZE);
    let id = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    Ok((TableId::new(id), payload))
}

/// Turns a row payload into a typed row of the given table.
pub trait RowMaterializer {
    /// Materializes `payload`, which excludes the envelope header.
    fn materialize(&self, table: &Table, payload: &[u8]) -> StrataResult<Row>;
}

/// Materializes payloads written by [`RowEncoder`].
///
/// The payload must carry exactly one value per column of the table and no
/// trailing bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryRowMaterializer;

impl RowMaterializer for BinaryRowMaterializer {
    fn materialize(&self, table: &Table, payload: &[u8]) -> StrataResult<Row> {
        let mut pos = 0;
        let num_cols = u32::from_be_bytes(read_array(payload, &mut pos, "column count")?) as usize;
        if num_cols != table.columns().len() {
            return Err(StrataError::corrupt_value(format!(
                "row has {num_cols} columns, table {} has {}",
                table.name(),
                table.columns().len()
            )));
        }

        let mut values = Vec::with_capacity(num_cols);
        for _ in 0..num_cols {
            values.push(decode_single_value(payload, &mut pos)?);
        }
        if pos != payload.len() {
            return Err(StrataError::corrupt_value(format!(
                "{} trailing bytes after row of table {}",
                payload.len() - pos,
                table.name()
            )));
        }

        Ok(Row::new(table.id(), values))
    }
}

fn read<'a>(bytes: &'a [u8], pos: &mut usize, len: usize, what: &str) -> StrataResult<&'a [u8]> {
    let end = *pos + len;
    let slice = bytes.get(*pos..end).ok_or_else(|| {
        StrataError::corrupt_value(format!("{what} truncated at offset {}", *pos))
    })?;
    *pos = end;
    Ok(slice)
}

fn read_array<const N: usize>(bytes: &[u8], pos: &mut usize, what: &str) -> StrataResult<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(read(bytes, pos, N, what)?);
    Ok(out)
}

fn decode_single_value(bytes: &[u8], pos: &mut usize) -> StrataResult<Value> {
    let [raw] = read_array::<1>(bytes, pos, "type tag")?;
    let tag = TypeTag::from_u8(raw)
        .ok_or_else(|| StrataError::corrupt_value(format!("unknown type tag: {raw}")))?;

    let value = match tag {
        TypeTag::Null => Value::Null,
        TypeTag::Boolean => {
            let [b] = read_array::<1>(bytes, pos, "boolean")?;
            Value::Boolean(b != 0)
        }
        TypeTag::Int => Value::Int(i32::from_le_bytes(read_array(bytes, pos, "int")?)),
        TypeTag::BigInt => Value::BigInt(i64::from_le_bytes(read_array(bytes, pos, "bigint")?)),
        TypeTag::Double => Value::Double(f64::from_le_bytes(read_array(bytes, pos, "double")?)),
        TypeTag::String => {
            let len = u32::from_le_bytes(read_array(bytes, pos, "string length")?) as usize;
            let data = read(bytes, pos, len, "string")?;
            let s = std::str::from_utf8(data)
                .map_err(|e| StrataError::corrupt_value(format!("invalid UTF-8: {e}")))?;
            Value::String(s.to_string())
        }
        TypeTag::Bytes => {
            let len = u32::from_le_bytes(read_array(bytes, pos, "bytes length")?) as usize;
            Value::Bytes(read(bytes, pos, len, "bytes")?.to_vec())
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_schema::artifact::{ArtifactRecord, ColumnRecord, SchemaRecord, TableRecord, TypeRecord};
    use strata_schema::{Schema, SchemaReader};

    fn schema() -> Schema {
        let column = |name: &str, ty: &str, position| ColumnRecord {
            column_name: Some(name.to_string()),
            type_name: Some(ty.to_string()),
            is_nullable: Some(true),
            position: Some(position),
            ..Default::default()
        };
        let artifact = ArtifactRecord {
            types: vec![
                TypeRecord {
                    type_name: Some("INT".to_string()),
                    parameters: Some(0),
                    fixed_size: Some(true),
                    max_size_bytes: Some(4),
                },
                TypeRecord {
                    type_name: Some("VARCHAR".to_string()),
                    parameters: Some(1),
                    fixed_size: Some(false),
                    max_size_bytes: Some(255),
                },
            ],
            schemas: vec![SchemaRecord {
                schema_name: Some("s".to_string()),
                tables: vec![TableRecord {
                    table_name: Some("t".to_string()),
                    table_id: Some(9),
                    columns: vec![
                        column("id", "INT", 0),
                        column("name", "VARCHAR", 1),
                        column("note", "VARCHAR", 2),
                    ],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        SchemaReader::default().load_artifact(&artifact).unwrap()
    }

    #[test]
    fn test_envelope_layout() {
        let value = RowEncoder::new(TableId::new(0x0102_0304))
            .encode(&[Value::Int(1)])
            .unwrap();
        assert_eq!(&value[..4], &[1, 2, 3, 4]);

        let (id, payload) = split_envelope(&value).unwrap();
        assert_eq!(id, TableId::new(0x0102_0304));
        assert_eq!(&payload[..4], &[0, 0, 0, 1]);
        assert_eq!(payload[4], TypeTag::Int as u8);
    }

    #[test]
    fn test_materialize() {
        let schema = schema();
        let table = schema.table(TableId::new(9)).unwrap();
        let values = vec![Value::Int(7), Value::string("Alice"), Value::Null];

        let value = RowEncoder::new(table.id()).encode(&values).unwrap();
        let (_, payload) = split_envelope(&value).unwrap();
        let row = BinaryRowMaterializer.materialize(table, payload).unwrap();

        assert_eq!(row.table(), table.id());
        assert_eq!(row.values(), values.as_slice());
    }

    #[test]
    fn test_column_count_mismatch() {
        let schema = schema();
        let table = schema.table(TableId::new(9)).unwrap();

        let value = RowEncoder::new(table.id()).encode(&[Value::Int(7)]).unwrap();
        let (_, payload) = split_envelope(&value).unwrap();
        let err = BinaryRowMaterializer.materialize(table, payload).unwrap_err();
        assert!(matches!(err, StrataError::CorruptValue { .. }));
    }

    #[test]
    fn test_truncated_payload_and_envelope() {
        let schema = schema();
        let table = schema.table(TableId::new(9)).unwrap();

        let values = vec![Value::Int(7), Value::string("Alice"), Value::Null];
        let value = RowEncoder::new(table.id()).encode(&values).unwrap();
        let (_, payload) = split_envelope(&value).unwrap();
        let err = BinaryRowMaterializer
            .materialize(table, &payload[..payload.len() - 3])
            .unwrap_err();
        assert!(err.is_corruption());

        assert!(matches!(
            split_envelope(&[0, 1]),
            Err(StrataError::CorruptValue { .. })
        ));
    }
}
