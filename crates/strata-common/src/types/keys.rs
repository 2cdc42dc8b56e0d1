//! Physical key type for Strata.
//!
//! A [`Key`] is the encoded byte form of a row's hierarchical key as stored in
//! a group's ordered tree. Byte order equals tree order.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Maximum key size in bytes (16 KB).
pub const MAX_KEY_SIZE: usize = 16 * 1024;

/// An encoded physical key.
///
/// # Example
///
/// ```rust
/// use strata_common::types::Key;
///
/// let key = Key::from_bytes(&[0x04, 0x80, 0x00, 0x00, 0x05]);
/// assert_eq!(key.len(), 5);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key(Bytes);

impl Key {
    /// Creates a key from a byte slice.
    #[inline]
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }

    /// Creates a key from owned bytes.
    #[inline]
    #[must_use]
    pub fn from_vec(vec: Vec<u8>) -> Self {
        Self(Bytes::from(vec))
    }

    /// Returns the length of the key in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the key is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the key as a byte slice.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Checks if this key starts with the given prefix.
    ///
    /// Every descendant row of a parent shares the parent's encoded key as a
    /// prefix.
    #[inline]
    #[must_use]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.0.starts_with(prefix)
    }
}

impl Deref for Key {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Key {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Ord for Key {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Key {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key(0x")?;
        for byte in &self.0[..self.0.len().min(32)] {
            write!(f, "{byte:02x}")?;
        }
        if self.0.len() > 32 {
            write!(f, "...")?;
        }
        write!(f, ")")
    }
}

impl From<Vec<u8>> for Key {
    #[inline]
    fn from(vec: Vec<u8>) -> Self {
        Self::from_vec(vec)
    }
}
