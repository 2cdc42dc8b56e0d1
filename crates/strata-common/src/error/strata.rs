//! Strata error types.
//!
//! Every failure in schema loading, HKey derivation, and key decoding is
//! surfaced as one [`StrataError`] carrying the offending entity or record
//! kind and a human-readable detail.

use std::fmt;
use thiserror::Error;

use crate::types::TableId;

/// Error codes for categorizing errors.
///
/// These codes can be used for programmatic error handling and
/// are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // General errors (0x0000 - 0x00FF)
    /// Internal error (bug).
    Internal = 0x0001,
    /// Invalid argument provided.
    InvalidArgument = 0x0003,
    /// Invalid configuration.
    InvalidConfig = 0x0004,

    // I/O errors (0x0100 - 0x01FF)
    /// General I/O error.
    Io = 0x0100,

    // Schema errors (0x0200 - 0x02FF)
    /// A serialized record is missing a required field.
    MalformedRecord = 0x0200,
    /// A type name was registered twice.
    DuplicateType = 0x0201,
    /// A type name did not resolve.
    UnknownType = 0x0202,
    /// A table name or id was declared twice.
    DuplicateTable = 0x0203,
    /// A column position was declared twice within a table.
    DuplicateColumn = 0x0204,
    /// An index name was declared twice within its scope.
    DuplicateIndex = 0x0205,
    /// A group root was declared twice.
    DuplicateGroup = 0x0206,
    /// A join connects missing or identical tables.
    InvalidJoin = 0x0207,
    /// A parent table reference did not resolve.
    UnresolvedParent = 0x0208,
    /// A table reference did not resolve.
    UnresolvedTable = 0x0209,
    /// A column reference did not resolve.
    UnresolvedColumn = 0x020A,
    /// An enumerated field carries an unknown value.
    UnsupportedEnum = 0x020B,
    /// Declared serialized length exceeds the available bytes.
    SizeMismatch = 0x020C,
    /// The serialized artifact could not be decoded.
    Decode = 0x020D,

    // Storage errors (0x0300 - 0x03FF)
    /// A physical key does not match the HKey layout.
    CorruptKey = 0x0300,
    /// A physical value is malformed.
    CorruptValue = 0x0301,
    /// A physical value names a table the schema does not know.
    UnknownTableId = 0x0302,
}

impl ErrorCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match (*self as u16) >> 8 {
            0x00 => "General",
            0x01 => "I/O",
            0x02 => "Schema",
            0x03 => "Storage",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The main error type for Strata.
///
/// All variants are fail-fast: the current load, or the decode of the
/// current entry, is aborted and no partial result is returned.
///
/// # Example
///
/// ```rust
/// use strata_common::error::{StrataError, StrataResult};
///
/// fn lookup(name: &str) -> StrataResult<()> {
///     Err(StrataError::UnknownType { name: name.to_string() })
/// }
///
/// assert!(lookup("POINT").is_err());
/// ```
#[derive(Debug, Error)]
pub enum StrataError {
    // ==========================================================================
    // General Errors
    // ==========================================================================
    /// Internal error - this indicates a bug.
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },

    /// Invalid argument provided.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Error message.
        message: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Error message.
        message: String,
    },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// I/O error from the underlying system.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    // ==========================================================================
    // Schema Errors
    // ==========================================================================
    /// A serialized record is missing fields that are not on its allow-list.
    #[error("malformed {kind} record: missing required fields [{}]", missing.join(", "))]
    MalformedRecord {
        /// Record kind.
        kind: &'static str,
        /// Names of the missing fields, in declaration order.
        missing: Vec<String>,
    },

    /// A type name was registered twice.
    #[error("type '{name}' is already registered")]
    DuplicateType {
        /// The type name.
        name: String,
    },

    /// A type name did not resolve.
    #[error("unknown type '{name}'")]
    UnknownType {
        /// The type name.
        name: String,
    },

    /// A table name or id was declared twice.
    #[error("duplicate table {table}: {reason}")]
    DuplicateTable {
        /// Qualified table name.
        table: String,
        /// What collided.
        reason: String,
    },

    /// A column position or name was declared twice within a table.
    #[error("duplicate column '{column}' at position {position} in table {table}")]
    DuplicateColumn {
        /// Qualified table name.
        table: String,
        /// Column name.
        column: String,
        /// Declared position.
        position: u32,
    },

    /// An index name was declared twice within its scope.
    #[error("duplicate index '{index}' on {owner}")]
    DuplicateIndex {
        /// Owning table or group.
        owner: String,
        /// Index name.
        index: String,
    },

    /// A group root was declared twice.
    #[error("duplicate group rooted at {root}")]
    DuplicateGroup {
        /// Qualified root table name.
        root: String,
    },

    /// A join connects missing or identical tables.
    #[error("invalid join {parent} -> {child}: {reason}")]
    InvalidJoin {
        /// Parent table.
        parent: String,
        /// Child table.
        child: String,
        /// Why the join was rejected.
        reason: String,
    },

    /// A parent table reference did not resolve.
    #[error("table {child} has unknown parent table {parent}")]
    UnresolvedParent {
        /// Qualified child table name.
        child: String,
        /// Qualified parent table name as declared.
        parent: String,
    },

    /// A table reference did not resolve.
    #[error("{kind} references unknown table {table}")]
    UnresolvedTable {
        /// The referencing entity kind.
        kind: &'static str,
        /// Qualified table name as declared.
        table: String,
    },

    /// A column reference did not resolve.
    #[error("{kind} references unknown column '{column}' in {table}")]
    UnresolvedColumn {
        /// The referencing entity kind.
        kind: &'static str,
        /// Qualified table name, or `<none>` when no owning table is known.
        table: String,
        /// Column name as declared.
        column: String,
    },

    /// An enumerated field carries a value this reader does not recognize.
    #[error("unsupported {kind} value {value}")]
    UnsupportedEnum {
        /// The enumerated field.
        kind: &'static str,
        /// The raw value.
        value: i32,
    },

    /// Declared serialized length exceeds the available bytes.
    #[error("required size exceeded actual size: {declared} vs {available}")]
    SizeMismatch {
        /// Declared length.
        declared: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// The serialized artifact could not be decoded.
    #[error("failed to decode {kind}: {reason}")]
    Decode {
        /// What was being decoded.
        kind: &'static str,
        /// Decoder message.
        reason: String,
    },

    // ==========================================================================
    // Storage Errors
    // ==========================================================================
    /// A physical key does not match the HKey layout of its table.
    #[error("corrupt key for table {table}: {reason}")]
    CorruptKey {
        /// The table whose HKey guided the decode.
        table: TableId,
        /// What did not match.
        reason: String,
    },

    /// A physical value is malformed.
    #[error("corrupt value: {reason}")]
    CorruptValue {
        /// What did not match.
        reason: String,
    },

    /// A physical value names a table the schema does not have.
    #[error("unknown table id {id}")]
    UnknownTableId {
        /// The raw table id.
        id: u32,
    },
}

impl StrataError {
    /// Returns the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Internal { .. } => ErrorCode::Internal,
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            Self::Io { .. } => ErrorCode::Io,
            Self::MalformedRecord { .. } => ErrorCode::MalformedRecord,
            Self::DuplicateType { .. } => ErrorCode::DuplicateType,
            Self::UnknownType { .. } => ErrorCode::UnknownType,
            Self::DuplicateTable { .. } => ErrorCode::DuplicateTable,
            Self::DuplicateColumn { .. } => ErrorCode::DuplicateColumn,
            Self::DuplicateIndex { .. } => ErrorCode::DuplicateIndex,
            Self::DuplicateGroup { .. } => ErrorCode::DuplicateGroup,
            Self::InvalidJoin { .. } => ErrorCode::InvalidJoin,
            Self::UnresolvedParent { .. } => ErrorCode::UnresolvedParent,
            Self::UnresolvedTable { .. } => ErrorCode::UnresolvedTable,
            Self::UnresolvedColumn { .. } => ErrorCode::UnresolvedColumn,
            Self::UnsupportedEnum { .. } => ErrorCode::UnsupportedEnum,
            Self::SizeMismatch { .. } => ErrorCode::SizeMismatch,
            Self::Decode { .. } => ErrorCode::Decode,
            Self::CorruptKey { .. } => ErrorCode::CorruptKey,
            Self::CorruptValue { .. } => ErrorCode::CorruptValue,
            Self::UnknownTableId { .. } => ErrorCode::UnknownTableId,
        }
    }

    /// Returns true if this error indicates damaged storage rather than bad
    /// input.
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self, Self::CorruptKey { .. } | Self::CorruptValue { .. })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a corrupt key error.
    #[must_use]
    pub fn corrupt_key(table: TableId, reason: impl Into<String>) -> Self {
        Self::CorruptKey {
            table,
            reason: reason.into(),
        }
    }

    /// Creates a corrupt value error.
    #[must_use]
    pub fn corrupt_value(reason: impl Into<String>) -> Self {
        Self::CorruptValue {
            reason: reason.into(),
        }
    }
}
