//! # strata-store
//!
//! Physical key and value handling for Strata group trees.
//!
//! Every row of a group lives in one ordered tree. Its key is the row's
//! hierarchical key: for each HKey segment, the segment table's ordinal
//! followed by the segment's column values. Its value is a small envelope
//! holding the storage table id and the encoded row.
//!
//! This crate provides:
//!
//! - **Key tuple codec**: order-preserving encoding of a value sequence
//! - **Row codec**: value envelopes and the binary row materializer
//! - **Translation**: storage table ids to schema table ids
//! - **Cursors**: the cursor abstraction and an in-memory ordered tree
//! - **Key codec**: HKey-guided encoding and decoding of physical keys
//! - **Traversal**: pairing decoded keys with materialized rows for a visitor
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_store::{MemoryTree, TreeRecordVisitor};
//!
//! let mut traversal = TreeRecordVisitor::with_defaults(&schema)?;
//! let mut cursor = tree.cursor();
//! let visited = traversal.traverse(&mut cursor, &mut |key: &DecodedKey, row: Row| {
//!     println!("{key} -> {row}");
//! })?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// HKey-guided physical key codec
pub mod codec;

/// Cursor abstraction and in-memory ordered tree
pub mod cursor;

/// Order-preserving key tuple codec
pub mod key;

/// Value envelopes and row materialization
pub mod row_codec;

/// Storage to schema table id translation
pub mod translate;

/// Group tree traversal
pub mod visitor;

pub use codec::{DecodedKey, KeyCodec, KeyElement};
pub use cursor::{CursorGuard, CursorState, KvCursor, MemoryCursor, MemoryTree};
pub use key::{decode_key, encode_key};
pub use row_codec::{split_envelope, BinaryRowMaterializer, RowEncoder, RowMaterializer};
pub use translate::{IdentityTranslator, MappedTranslator, TableIdTranslator};
pub use visitor::{RecordVisitor, TreeRecordVisitor};
