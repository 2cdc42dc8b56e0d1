//! Cursor abstraction over an ordered key-value tree.
//!
//! A [`KvCursor`] yields entries in key order, presenting each key already
//! decoded into its value sequence and each value as raw bytes. A
//! [`CursorGuard`] closes its cursor when dropped, so every exit from a
//! traversal releases the cursor.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use bytes::Bytes;

use strata_common::error::{StrataError, StrataResult};
use strata_common::types::{Key, Value};

use crate::key::decode_key;

/// An ordered key-value cursor.
pub trait KvCursor {
    /// Returns true if the cursor is positioned on an entry.
    fn is_valid(&self) -> bool;

    /// Returns the current key, decoded into its value sequence.
    fn current_key(&self) -> StrataResult<Vec<Value>>;

    /// Returns the current value bytes.
    fn current_value(&self) -> StrataResult<Bytes>;

    /// Moves to the next entry.
    fn advance(&mut self) -> StrataResult<()>;

    /// Releases the cursor. Closing twice is a no-op.
    fn close(&mut self);
}

/// State of a [`MemoryCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Cursor is positioned on a valid entry.
    Valid,
    /// Cursor is past all entries.
    AtEnd,
    /// Cursor has been released.
    Closed,
}

/// In-memory ordered key-value tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    entries: BTreeMap<Key, Bytes>,
}

impl MemoryTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the previous value for the key.
    pub fn insert(&mut self, key: Key, value: Bytes) -> Option<Bytes> {
        self.entries.insert(key, value)
    }

    /// Gets the value for a key.
    pub fn get(&self, key: &Key) -> Option<&Bytes> {
        self.entries.get(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Opens a cursor over every entry.
    pub fn cursor(&self) -> MemoryCursor {
        MemoryCursor::new(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Opens a cursor over the entries whose keys start with `prefix`.
    ///
    /// With a hierarchical key prefix this visits a row and all of its
    /// descendants.
    pub fn cursor_prefix(&self, prefix: &Key) -> MemoryCursor {
        MemoryCursor::new(
            self.entries
                .range(prefix.clone()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

/// Cursor over a snapshot of a [`MemoryTree`].
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    entries: Vec<(Key, Bytes)>,
    position: usize,
    state: CursorState,
}

impl MemoryCursor {
    fn new(entries: Vec<(Key, Bytes)>) -> Self {
        let state = if entries.is_empty() {
            CursorState::AtEnd
        } else {
            CursorState::Valid
        };
        Self {
            entries,
            position: 0,
            state,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Returns true once the cursor has been closed.
    pub fn is_closed(&self) -> bool {
        self.state == CursorState::Closed
    }

    fn current(&self) -> StrataResult<&(Key, Bytes)> {
        if self.state != CursorState::Valid {
            return Err(StrataError::invalid_argument(format!(
                "cursor is not positioned on an entry ({:?})",
                self.state
            )));
        }
        self.entries
            .get(self.position)
            .ok_or_else(|| StrataError::internal("cursor position out of range"))
    }
}

impl KvCursor for MemoryCursor {
    fn is_valid(&self) -> bool {
        self.state == CursorState::Valid
    }

    fn current_key(&self) -> StrataResult<Vec<Value>> {
        decode_key(self.current()?.0.as_bytes())
    }

    fn current_value(&self) -> StrataResult<Bytes> {
        Ok(self.current()?.1.clone())
    }

    fn advance(&mut self) -> StrataResult<()> {
        self.current()?;
        self.position += 1;
        if self.position >= self.entries.len() {
            self.state = CursorState::AtEnd;
        }
        Ok(())
    }

    fn close(&mut self) {
        self.entries.clear();
        self.state = CursorState::Closed;
    }
}

/// Closes the wrapped cursor on drop.
pub struct CursorGuard<'a, C: KvCursor> {
    cursor: &'a mut C,
}

impl<'a, C: KvCursor> CursorGuard<'a, C> {
    /// Takes responsibility for closing `cursor`.
    pub fn new(cursor: &'a mut C) -> Self {
        Self { cursor }
    }
}

impl<C: KvCursor> Deref for CursorGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.cursor
    }
}

impl<C: KvCursor> DerefMut for CursorGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.cursor
    }
}

impl<C: KvCursor> Drop for CursorGuard<'_, C> {
    fn drop(&mut self) {
        self.cursor.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::encode_key;

    fn tree() -> MemoryTree {
        let mut tree = MemoryTree::new();
        for (a, b) in [(2, 0), (1, 0), (1, 5), (3, 0)] {
            let key = if b == 0 {
                encode_key(&[Value::BigInt(a)]).unwrap()
            } else {
                encode_key(&[Value::BigInt(a), Value::BigInt(b)]).unwrap()
            };
            tree.insert(key, Bytes::from(vec![a as u8]));
        }
        tree
    }

    #[test]
    fn test_cursor_visits_in_key_order() {
        let tree = tree();
        let mut cursor = tree.cursor();
        let mut seen = Vec::new();
        while cursor.is_valid() {
            seen.push(cursor.current_key().unwrap());
            cursor.advance().unwrap();
        }

        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], vec![Value::BigInt(1)]);
        assert_eq!(seen[1], vec![Value::BigInt(1), Value::BigInt(5)]);
        assert_eq!(seen[3], vec![Value::BigInt(3)]);
        assert_eq!(cursor.state(), CursorState::AtEnd);
        assert!(cursor.advance().is_err());
    }

    #[test]
    fn test_prefix_cursor() {
        let tree = tree();
        let prefix = encode_key(&[Value::BigInt(1)]).unwrap();
        let mut cursor = tree.cursor_prefix(&prefix);
        let mut count = 0;
        while cursor.is_valid() {
            count += 1;
            cursor.advance().unwrap();
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_guard_closes_on_drop() {
        let tree = tree();
        let mut cursor = tree.cursor();
        {
            let guard = CursorGuard::new(&mut cursor);
            assert!(guard.is_valid());
        }
        assert!(cursor.is_closed());
        assert!(!cursor.is_valid());
        assert!(cursor.current_value().is_err());
    }

    #[test]
    fn test_empty_tree() {
        let cursor = MemoryTree::new().cursor();
        assert!(!cursor.is_valid());
        assert_eq!(cursor.state(), CursorState::AtEnd);
    }
}
