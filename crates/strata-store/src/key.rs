//! Key tuple encoding.
//!
//! A physical key is a sequence of primitive values. Each value is written
//! as a type tag followed by an order-preserving body:
//!
//! - integers: big-endian with the sign bit flipped
//! - doubles: big-endian IEEE 754 with the sign bit flipped for positives
//!   and every bit flipped for negatives
//! - strings and bytes: 4-byte big-endian length followed by the data
//!
//! Values of the same type compare in the same order as their encodings.

use strata_common::error::{StrataError, StrataResult};
use strata_common::types::{Key, TableId, Value, MAX_KEY_SIZE};

const TAG_NULL: u8 = 0x00;
const TAG_BOOLEAN: u8 = 0x01;
const TAG_INT: u8 = 0x04;
const TAG_BIGINT: u8 = 0x05;
const TAG_DOUBLE: u8 = 0x07;
const TAG_STRING: u8 = 0x09;
const TAG_BYTES: u8 = 0x0A;

/// Encodes a value sequence into a key.
///
/// Fails if the encoded key would exceed [`MAX_KEY_SIZE`].
pub fn encode_key(values: &[Value]) -> StrataResult<Key> {
    let mut buf = Vec::with_capacity(values.len() * 9);
    for value in values {
        encode_key_value(value, &mut buf)?;
    }
    if buf.len() > MAX_KEY_SIZE {
        return Err(StrataError::invalid_argument(format!(
            "key of {} bytes exceeds the {MAX_KEY_SIZE} byte limit",
            buf.len()
        )));
    }
    Ok(Key::from_vec(buf))
}

/// Encodes a single value in order-preserving form.
fn encode_key_value(value: &Value, buf: &mut Vec<u8>) -> StrataResult<()> {
    match value {
        Value::Null => buf.push(TAG_NULL),
        Value::Boolean(b) => {
            buf.push(TAG_BOOLEAN);
            buf.push(u8::from(*b));
        }
        Value::Int(i) => {
            buf.push(TAG_INT);
            let v = (*i as u32) ^ 0x8000_0000;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        Value::BigInt(i) => {
            buf.push(TAG_BIGINT);
            let v = (*i as u64) ^ 0x8000_0000_0000_0000;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        Value::Double(f) => {
            buf.push(TAG_DOUBLE);
            let bits = f.to_bits();
            let v = if bits >> 63 == 1 {
                !bits
            } else {
                bits ^ 0x8000_0000_0000_0000
            };
            buf.extend_from_slice(&v.to_be_bytes());
        }
        Value::String(s) => {
            buf.push(TAG_STRING);
            put_length_prefixed(s.as_bytes(), buf)?;
        }
        Value::Bytes(b) => {
            buf.push(TAG_BYTES);
            put_length_prefixed(b, buf)?;
        }
    }
    Ok(())
}

fn put_length_prefixed(data: &[u8], buf: &mut Vec<u8>) -> StrataResult<()> {
    let len = u32::try_from(data.len()).map_err(|_| {
        StrataError::invalid_argument(format!("key value too large: {} bytes", data.len()))
    })?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(data);
    Ok(())
}

/// Decodes a key back into its value sequence.
pub fn decode_key(key: &[u8]) -> StrataResult<Vec<Value>> {
    let mut reader = KeyReader { bytes: key, pos: 0 };
    let mut values = Vec::new();
    while reader.pos < key.len() {
        values.push(reader.value()?);
    }
    Ok(values)
}

struct KeyReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> KeyReader<'a> {
    fn take(&mut self, len: usize, what: &str) -> StrataResult<&'a [u8]> {
        let end = self.pos + len;
        if end > self.bytes.len() {
            return Err(corrupt(format!(
                "{what} truncated at offset {}: need {len} bytes, have {}",
                self.pos,
                self.bytes.len() - self.pos
            )));
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, what: &str) -> StrataResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn length_prefixed(&mut self, what: &str) -> StrataResult<&'a [u8]> {
        let len = u32::from_be_bytes(self.array(what)?) as usize;
        self.take(len, what)
    }

    fn value(&mut self) -> StrataResult<Value> {
        let [tag] = self.array::<1>("type tag")?;
        let value = match tag {
            TAG_NULL => Value::Null,
            TAG_BOOLEAN => {
                let [b] = self.array::<1>("boolean")?;
                Value::Boolean(b != 0)
            }
            TAG_INT => {
                let v = u32::from_be_bytes(self.array("int")?) ^ 0x8000_0000;
                Value::Int(v as i32)
            }
            TAG_BIGINT => {
                let v = u64::from_be_bytes(self.array("bigint")?) ^ 0x8000_0000_0000_0000;
                Value::BigInt(v as i64)
            }
            TAG_DOUBLE => {
                let v = u64::from_be_bytes(self.array("double")?);
                let bits = if v >> 63 == 1 {
                    v ^ 0x8000_0000_0000_0000
                } else {
                    !v
                };
                Value::Double(f64::from_bits(bits))
            }
            TAG_STRING => {
                let data = self.length_prefixed("string")?;
                let s = std::str::from_utf8(data)
                    .map_err(|e| corrupt(format!("string is not valid UTF-8: {e}")))?;
                Value::String(s.to_string())
            }
            TAG_BYTES => Value::Bytes(self.length_prefixed("bytes")?.to_vec()),
            other => {
                return Err(corrupt(format!(
                    "unknown type tag 0x{other:02x} at offset {}",
                    self.pos - 1
                )))
            }
        };
        Ok(value)
    }
}

/// Key bytes are decoded before the owning table is known.
fn corrupt(reason: String) -> StrataError {
    StrataError::corrupt_key(TableId::INVALID, reason)
}
