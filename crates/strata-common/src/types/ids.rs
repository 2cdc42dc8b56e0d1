//! Core identifier types for Strata.
//!
//! These types provide type-safe wrappers around numeric identifiers,
//! preventing accidental misuse of different ID types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Table identifier - the declared or generated numeric id of a table.
///
/// Ids are explicit in the metadata artifact or generated per load starting
/// at 1. Group storage tables are numbered after every declared table.
///
/// # Example
///
/// ```rust
/// use strata_common::types::TableId;
///
/// let table = TableId::new(42);
/// assert_eq!(table.as_u32(), 42);
/// assert_eq!(table.checked_next(), Some(TableId::new(43)));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TableId(u32);

impl TableId {
    /// Invalid table ID constant, used as a sentinel value.
    pub const INVALID: Self = Self(0);

    /// First id handed out by id generation.
    pub const FIRST: Self = Self(1);

    /// Creates a new `TableId` from a raw u32 value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the next table ID, or `None` once the id space is exhausted.
    #[inline]
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Checks if this is a valid table ID.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "TableId(INVALID)")
        } else {
            write!(f, "TableId({})", self.0)
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TableId {
    #[inline]
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

impl From<TableId> for u32 {
    #[inline]
    fn from(id: TableId) -> Self {
        id.0
    }
}

/// Index identifier, unique within its owning table or group.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct IndexId(u32);

impl IndexId {
    /// Creates a new `IndexId` from a raw u32 value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexId({})", self.0)
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compact per-schema table number written into physical keys.
///
/// Physical keys identify a table by ordinal rather than by name or id; the
/// first value of every HKey segment is an ordinal.
///
/// # Example
///
/// ```rust
/// use strata_common::types::Ordinal;
///
/// let ordinal = Ordinal::new(5);
/// assert_eq!(i64::from(ordinal), 5);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Ordinal(u32);

impl Ordinal {
    /// Creates a new `Ordinal` from a raw u32 value.
    #[inline]
    #[must_use]
    pub const fn new(ordinal: u32) -> Self {
        Self(ordinal)
    }

    /// Returns the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Converts a decoded key value into an ordinal, if it is in range.
    #[must_use]
    pub fn from_i64(raw: i64) -> Option<Self> {
        u32::try_from(raw).ok().map(Self)
    }
}

impl fmt::Debug for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ordinal({})", self.0)
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Ordinal> for i64 {
    #[inline]
    fn from(ordinal: Ordinal) -> Self {
        i64::from(ordinal.0)
    }
}
