//! Primitive values carried by physical keys and materialized rows.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A decoded primitive value.
///
/// Both the key tuple decoder and the row materializer produce `Value`s.
/// Integer variants of different widths compare equal when they hold the
/// same number, so a key column decoded as `BigInt` matches a row column
/// decoded as `Int`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// NULL value.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    BigInt(i64),
    /// 64-bit floating point.
    Double(f64),
    /// String value.
    String(String),
    /// Binary data.
    Bytes(Vec<u8>),
}

impl Value {
    /// Creates a string value.
    pub fn string(v: impl Into<String>) -> Self {
        Value::String(v.into())
    }

    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the value as an i64 if it is an integer.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(i64::from(*i)),
            Value::BigInt(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(_) => "BOOLEAN",
            Value::Int(_) => "INT",
            Value::BigInt(_) => "BIGINT",
            Value::Double(_) => "DOUBLE",
            Value::String(_) => "VARCHAR",
            Value::Bytes(_) => "VARBINARY",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (a, b) => match (a.to_i64(), b.to_i64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Some(i) = self.to_i64() {
            0u8.hash(state);
            i.hash(state);
            return;
        }
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Boolean(b) => b.hash(state),
            Value::Double(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Null | Value::Int(_) | Value::BigInt(_) => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::BigInt(i) => write!(f, "{i}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "'{s}'"),
            Value::Bytes(b) => {
                write!(f, "0x")?;
                for byte in b {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_integer_widths_compare_equal() {
        assert_eq!(Value::Int(7), Value::BigInt(7));
        assert_eq!(hash_of(&Value::Int(7)), hash_of(&Value::BigInt(7)));
        assert_ne!(Value::Int(7), Value::BigInt(8));
    }

    #[test]
    fn test_cross_type_inequality() {
        assert_ne!(Value::Int(1), Value::string("1"));
        assert_ne!(Value::Null, Value::Int(0));
        assert_eq!(Value::Null, Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::string("x").to_string(), "'x'");
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).to_string(), "0xdead");
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}
