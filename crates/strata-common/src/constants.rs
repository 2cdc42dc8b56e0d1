//! System-wide constants for Strata.
//!
//! This module defines constants used across the schema and storage layers.

// =============================================================================
// Metadata Artifact Constants
// =============================================================================

/// Size of the big-endian length prefix in front of a serialized artifact.
pub const ARTIFACT_LENGTH_PREFIX_SIZE: usize = 4;

/// Default upper bound on a declared artifact length (64 MB).
pub const DEFAULT_MAX_ARTIFACT_BYTES: usize = 64 * 1024 * 1024;

// =============================================================================
// Schema Constants
// =============================================================================

/// Schema holding internal/system tables.
///
/// Tables in this schema never appear in physical-key ordinal maps.
pub const DEFAULT_SYSTEM_SCHEMA: &str = "strata_information_schema";

/// Prefix of the generated storage table name of every group.
pub const DEFAULT_GROUP_TABLE_PREFIX: &str = "_group_";

/// Raw join-type value for a left outer group index.
pub const JOIN_TYPE_LEFT_OUTER: i32 = 1;

/// Raw join-type value for a right outer group index.
pub const JOIN_TYPE_RIGHT_OUTER: i32 = 2;

// =============================================================================
// Physical Value Envelope
// =============================================================================

/// Size of the storage table id at the front of every physical value.
///
/// Layout: table id (4 bytes, big-endian) followed by the row payload.
pub const VALUE_ENVELOPE_HEADER_SIZE: usize = 4;
