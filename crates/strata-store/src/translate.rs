//! Storage table id translation.
//!
//! A physical volume may number tables differently from the schema it is
//! read with. Translators map the table id stamped on a value envelope to
//! the schema's table id.

use std::collections::HashMap;

use strata_common::error::{StrataError, StrataResult};
use strata_common::types::TableId;

/// Maps storage table ids to schema table ids.
pub trait TableIdTranslator {
    /// Translates a storage table id.
    fn translate(&self, storage_id: TableId) -> StrataResult<TableId>;
}

/// Storage and schema share one numbering.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl TableIdTranslator for IdentityTranslator {
    fn translate(&self, storage_id: TableId) -> StrataResult<TableId> {
        Ok(storage_id)
    }
}

/// Explicit storage to schema mapping.
#[derive(Debug, Clone, Default)]
pub struct MappedTranslator {
    map: HashMap<TableId, TableId>,
}

impl MappedTranslator {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `storage_id` to `schema_id`, returning the previous mapping.
    pub fn insert(&mut self, storage_id: TableId, schema_id: TableId) -> Option<TableId> {
        self.map.insert(storage_id, schema_id)
    }

    /// Returns the number of mapped ids.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(TableId, TableId)> for MappedTranslator {
    fn from_iter<I: IntoIterator<Item = (TableId, TableId)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl TableIdTranslator for MappedTranslator {
    fn translate(&self, storage_id: TableId) -> StrataResult<TableId> {
        self.map
            .get(&storage_id)
            .copied()
            .ok_or(StrataError::UnknownTableId {
                id: storage_id.as_u32(),
            })
    }
}
