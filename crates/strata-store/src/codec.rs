//! HKey-guided physical key codec.
//!
//! A physical key of table `T` carries, for each segment of `T`'s HKey, the
//! segment table's ordinal followed by the segment's column values. Decoding
//! checks every ordinal against the segment it is read for, so a key read
//! with the wrong table's layout is reported as corrupt rather than
//! misinterpreted.

use std::collections::HashMap;
use std::fmt;

use strata_common::config::LoaderConfig;
use strata_common::error::{StrataError, StrataResult};
use strata_common::types::{Key, Ordinal, TableId, Value};
use strata_schema::{HKey, Schema};

use crate::key::encode_key;

/// One element of a decoded hierarchical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyElement {
    /// Marks the start of a segment owned by this table.
    Table(TableId),
    /// A column value of the current segment.
    Value(Value),
}

/// A decoded hierarchical key: for each segment, a table marker followed by
/// that table's column values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DecodedKey {
    elements: Vec<KeyElement>,
}

impl DecodedKey {
    /// Returns the flat element sequence.
    pub fn elements(&self) -> &[KeyElement] {
        &self.elements
    }

    /// Returns the segment tables from root to leaf.
    pub fn tables(&self) -> impl Iterator<Item = TableId> + '_ {
        self.elements.iter().filter_map(|e| match e {
            KeyElement::Table(t) => Some(*t),
            KeyElement::Value(_) => None,
        })
    }

    /// Returns every column value in key order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter().filter_map(|e| match e {
            KeyElement::Table(_) => None,
            KeyElement::Value(v) => Some(v),
        })
    }

    /// Returns the leaf table.
    pub fn leaf(&self) -> Option<TableId> {
        self.tables().last()
    }
}

impl fmt::Display for DecodedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match element {
                KeyElement::Table(t) => write!(f, "table {t}")?,
                KeyElement::Value(v) => write!(f, "{v}")?,
            }
        }
        write!(f, "]")
    }
}

/// Encodes and decodes physical keys against a schema.
///
/// Holds the ordinal map, built once from every table outside the system
/// schema, and caches HKeys per table.
#[derive(Debug)]
pub struct KeyCodec<'s> {
    schema: &'s Schema,
    tables_by_ordinal: HashMap<Ordinal, TableId>,
    hkeys: HashMap<TableId, HKey>,
}

impl<'s> KeyCodec<'s> {
    /// Builds the ordinal map for `schema`.
    ///
    /// Fails if two user tables share an ordinal.
    pub fn new(schema: &'s Schema, config: &LoaderConfig) -> StrataResult<Self> {
        let mut tables_by_ordinal = HashMap::new();
        for table in schema.tables() {
            if table.name().schema() == config.system_schema {
                continue;
            }
            if let Some(other) = tables_by_ordinal.insert(table.ordinal(), table.id()) {
                return Err(StrataError::internal(format!(
                    "ordinal {} is used by tables {} and {}",
                    table.ordinal(),
                    other,
                    table.id()
                )));
            }
        }

        Ok(Self {
            schema,
            tables_by_ordinal,
            hkeys: HashMap::new(),
        })
    }

    /// Returns the schema.
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Returns the table an ordinal stands for.
    pub fn table_for(&self, ordinal: Ordinal) -> Option<TableId> {
        self.tables_by_ordinal.get(&ordinal).copied()
    }

    /// Returns the HKey of a table, computing it on first use.
    pub fn hkey(&mut self, table: TableId) -> StrataResult<&HKey> {
        self.ensure_hkey(table)?;
        self.cached_hkey(table)
    }

    fn ensure_hkey(&mut self, table: TableId) -> StrataResult<()> {
        if self.hkeys.contains_key(&table) {
            return Ok(());
        }
        if self.schema.table(table).is_none() {
            return Err(StrataError::UnknownTableId {
                id: table.as_u32(),
            });
        }
        let hkey = self.schema.hkey(table)?;
        self.hkeys.insert(table, hkey);
        Ok(())
    }

    fn cached_hkey(&self, table: TableId) -> StrataResult<&HKey> {
        self.hkeys
            .get(&table)
            .ok_or_else(|| StrataError::internal(format!("hkey of table {table} not cached")))
    }

    /// Builds the physical key of a row of `table`.
    ///
    /// `segments` holds the column values of each HKey segment, root first.
    pub fn encode(&mut self, table: TableId, segments: &[Vec<Value>]) -> StrataResult<Key> {
        self.ensure_hkey(table)?;
        let hkey = self.cached_hkey(table)?;
        if segments.len() != hkey.segments().len() {
            return Err(StrataError::invalid_argument(format!(
                "table {table} has {} hkey segments, got {}",
                hkey.segments().len(),
                segments.len()
            )));
        }

        let mut values = Vec::with_capacity(hkey.key_value_count());
        for (segment, columns) in hkey.segments().iter().zip(segments) {
            if columns.len() != segment.columns().len() {
                return Err(StrataError::invalid_argument(format!(
                    "segment of table {} has {} columns, got {}",
                    segment.table(),
                    segment.columns().len(),
                    columns.len()
                )));
            }
            let ordinal = self
                .schema
                .table(segment.table())
                .map(|t| t.ordinal())
                .ok_or(StrataError::UnknownTableId {
                    id: segment.table().as_u32(),
                })?;
            values.push(Value::BigInt(i64::from(ordinal)));
            values.extend(columns.iter().cloned());
        }

        encode_key(&values)
    }

    /// Decodes the value sequence of a physical key of `table`.
    ///
    /// The key must hold exactly the values `table`'s HKey calls for, and
    /// each segment's ordinal must name that segment's table.
    pub fn decode(&mut self, table: TableId, values: &[Value]) -> StrataResult<DecodedKey> {
        self.ensure_hkey(table)?;
        let hkey = self.cached_hkey(table)?;

        let mut elements = Vec::with_capacity(hkey.key_value_count());
        let mut rest = values.iter();
        for (i, segment) in hkey.segments().iter().enumerate() {
            let slot = rest.next().ok_or_else(|| {
                StrataError::corrupt_key(
                    table,
                    format!("key ends before segment {i} of {}", hkey.segments().len()),
                )
            })?;
            let ordinal = slot.to_i64().and_then(Ordinal::from_i64).ok_or_else(|| {
                StrataError::corrupt_key(
                    table,
                    format!("segment {i} ordinal slot holds {} {slot}", slot.type_name()),
                )
            })?;

            let found = self.table_for(ordinal);
            if found != Some(segment.table()) {
                return Err(StrataError::corrupt_key(
                    table,
                    format!(
                        "segment {i} expects table {} but ordinal {ordinal} maps to {}",
                        segment.table(),
                        found.map_or_else(|| "nothing".to_string(), |t| format!("table {t}"))
                    ),
                ));
            }
            elements.push(KeyElement::Table(segment.table()));

            for _ in segment.columns() {
                let value = rest.next().ok_or_else(|| {
                    StrataError::corrupt_key(
                        table,
                        format!("key ends inside segment {i} of table {}", segment.table()),
                    )
                })?;
                elements.push(KeyElement::Value(value.clone()));
            }
        }

        let leftover = rest.len();
        if leftover > 0 {
            return Err(StrataError::corrupt_key(
                table,
                format!("{leftover} values left after the last segment"),
            ));
        }

        Ok(DecodedKey { elements })
    }
}
