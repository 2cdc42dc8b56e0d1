//! Group tree traversal.
//!
//! For each physical entry the traversal reads the storage table id from
//! the value envelope, translates it to a schema table, materializes the
//! row, decodes the key against that table's HKey, and hands the pair to a
//! [`RecordVisitor`]. Nothing reaches the visitor for an entry that fails
//! any of these steps.

use tracing::{debug, trace};

use strata_common::config::LoaderConfig;
use strata_common::error::{StrataError, StrataResult};
use strata_common::types::{Row, Value};
use strata_schema::Schema;

use crate::codec::{DecodedKey, KeyCodec};
use crate::cursor::{CursorGuard, KvCursor};
use crate::row_codec::{split_envelope, BinaryRowMaterializer, RowMaterializer};
use crate::translate::{IdentityTranslator, TableIdTranslator};

/// Receives decoded entries.
pub trait RecordVisitor {
    /// Called once per entry with its decoded key and row.
    fn visit(&mut self, key: &DecodedKey, row: Row);
}

impl<F> RecordVisitor for F
where
    F: FnMut(&DecodedKey, Row),
{
    fn visit(&mut self, key: &DecodedKey, row: Row) {
        self(key, row)
    }
}

/// Decodes group tree entries for a visitor.
///
/// One instance serves one traversal at a time. Independent traversals over
/// the same schema each use their own instance.
#[derive(Debug)]
pub struct TreeRecordVisitor<'s, T, M> {
    schema: &'s Schema,
    codec: KeyCodec<'s>,
    translator: T,
    materializer: M,
}

impl<'s> TreeRecordVisitor<'s, IdentityTranslator, BinaryRowMaterializer> {
    /// Creates a traversal with identity translation, binary rows, and the
    /// default configuration.
    pub fn with_defaults(schema: &'s Schema) -> StrataResult<Self> {
        Self::new(
            schema,
            &LoaderConfig::default(),
            IdentityTranslator,
            BinaryRowMaterializer,
        )
    }
}

impl<'s, T, M> TreeRecordVisitor<'s, T, M>
where
    T: TableIdTranslator,
    M: RowMaterializer,
{
    /// Creates a traversal.
    pub fn new(
        schema: &'s Schema,
        config: &LoaderConfig,
        translator: T,
        materializer: M,
    ) -> StrataResult<Self> {
        Ok(Self {
            schema,
            codec: KeyCodec::new(schema, config)?,
            translator,
            materializer,
        })
    }

    /// Returns the key codec.
    pub fn codec(&mut self) -> &mut KeyCodec<'s> {
        &mut self.codec
    }

    /// Decodes one entry and delivers it to `visitor`.
    pub fn visit_entry<V>(&mut self, key: &[Value], value: &[u8], visitor: &mut V) -> StrataResult<()>
    where
        V: RecordVisitor + ?Sized,
    {
        let (storage_id, payload) = split_envelope(value)?;
        let table_id = self.translator.translate(storage_id)?;
        let table = self
            .schema
            .table(table_id)
            .ok_or(StrataError::UnknownTableId {
                id: table_id.as_u32(),
            })?;

        let row = self.materializer.materialize(table, payload)?;
        let decoded = self.codec.decode(table_id, key)?;
        trace!("Visiting {} row {}", table.name(), decoded);
        visitor.visit(&decoded, row);
        Ok(())
    }

    /// Visits every entry under `cursor`, returning the number visited.
    ///
    /// The cursor is closed on return, including when an entry fails.
    pub fn traverse<C, V>(&mut self, cursor: &mut C, visitor: &mut V) -> StrataResult<usize>
    where
        C: KvCursor,
        V: RecordVisitor + ?Sized,
    {
        let mut cursor = CursorGuard::new(cursor);
        let mut visited = 0;
        while cursor.is_valid() {
            let key = cursor.current_key()?;
            let value = cursor.current_value()?;
            self.visit_entry(&key, &value, visitor)?;
            visited += 1;
            cursor.advance()?;
        }

        debug!("Traversal visited {} entries", visited);
        Ok(visited)
    }
}
