// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoded value type system.
//!
//! Provides the value representation produced by the field decoder. A decoded
//! packet is an *ordered* list of named fields, since presentation follows the
//! layout's offset order and the fix engine addresses fields by name.

use std::fmt;

use serde::Serialize;

use super::error::{CodecError, DecodeError, Result};

/// One decoded field with the offset it was read from (relative to the layout).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedField {
    pub name: String,
    pub offset: usize,
    pub value: DecodedValue,
}

/// Ordered field name -> value list for one decoded layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedMessage {
    fields: Vec<DecodedField>,
}

impl DecodedMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty message with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<String>, offset: usize, value: DecodedValue) {
        self.fields.push(DecodedField {
            name: name.into(),
            offset,
            value,
        });
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&DecodedValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Get a mutable field value by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut DecodedValue> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .map(|f| &mut f.value)
    }

    /// Iterate over fields in layout order.
    pub fn iter(&self) -> impl Iterator<Item = &DecodedField> {
        self.fields.iter()
    }

    /// Number of decoded fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no fields were decoded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check whether any field (at any nesting level) carries a soft failure.
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.value.contains_error())
    }

    /// Collect `(name, value)` pairs, consuming the message.
    pub fn into_pairs(self) -> Vec<(String, DecodedValue)> {
        self.fields.into_iter().map(|f| (f.name, f.value)).collect()
    }
}

impl<'a> IntoIterator for &'a DecodedMessage {
    type Item = &'a DecodedField;
    type IntoIter = std::slice::Iter<'a, DecodedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Count-gated run of fixed-size sub-records backed by one contiguous buffer.
///
/// Records are index-addressed; any index at or past `count` is rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedRecords {
    count: usize,
    record_size: usize,
    /// Layout-relative offset of record 0
    offset: usize,
    /// Captured bytes for records `0..count` (may be truncated)
    buffer: Vec<u8>,
    records: Vec<DecodedMessage>,
}

impl NestedRecords {
    pub(crate) fn new(
        count: usize,
        record_size: usize,
        offset: usize,
        buffer: Vec<u8>,
        records: Vec<DecodedMessage>,
    ) -> Self {
        Self {
            count,
            record_size,
            offset,
            buffer,
            records,
        }
    }

    /// Number of valid records.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the count field was zero.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Size of each record in bytes.
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Layout-relative offset of the first record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get the decoded record at `index`.
    pub fn get(&self, index: usize) -> Result<&DecodedMessage> {
        if index >= self.count {
            return Err(CodecError::index_out_of_range(index, self.count));
        }
        self.records
            .get(index)
            .ok_or_else(|| CodecError::index_out_of_range(index, self.count))
    }

    /// Get the raw bytes of the record at `index`.
    ///
    /// Returns the captured prefix when the capture ended inside the record.
    pub fn raw(&self, index: usize) -> Result<&[u8]> {
        if index >= self.count {
            return Err(CodecError::index_out_of_range(index, self.count));
        }
        let start = (index * self.record_size).min(self.buffer.len());
        let end = (start + self.record_size).min(self.buffer.len());
        Ok(&self.buffer[start..end])
    }

    /// Iterate over the decoded records.
    pub fn iter(&self) -> impl Iterator<Item = &DecodedMessage> {
        self.records.iter()
    }
}

/// Value of one decoded field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DecodedValue {
    // Unsigned integers
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),

    // Signed integers
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),

    // Floating point
    F32(f32),
    F64(f64),

    /// Fixed byte run, with best-effort text for name-like fields
    Bytes {
        raw: Vec<u8>,
        text: Option<String>,
    },

    /// Inline fixed-length array of scalars
    Array(Vec<DecodedValue>),

    /// Enum-typed integer resolved against its variant table
    Enum { name: String, value: u32 },

    /// Count-gated `u32` array
    U32Array(Vec<u32>),

    /// Count-gated array whose count was zero
    EmptyArray,

    /// Count-gated nested records
    Records(NestedRecords),

    /// Per-field soft failure
    Error(DecodeError),
}

impl DecodedValue {
    /// Check if this value is a soft failure marker.
    pub fn is_error(&self) -> bool {
        matches!(self, DecodedValue::Error(_))
    }

    /// Check if this value is an out-of-range marker.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, DecodedValue::Error(DecodeError::OutOfRange { .. }))
    }

    /// Check this value and everything nested in it for soft failures.
    pub fn contains_error(&self) -> bool {
        match self {
            DecodedValue::Error(_) => true,
            DecodedValue::Array(items) => items.iter().any(|v| v.contains_error()),
            DecodedValue::Records(records) => records.iter().any(|r| r.has_errors()),
            _ => false,
        }
    }

    /// Try to convert this value to u64 (unsigned, non-negative signed, enums).
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DecodedValue::U8(v) => Some(*v as u64),
            DecodedValue::U16(v) => Some(*v as u64),
            DecodedValue::U32(v) => Some(*v as u64),
            DecodedValue::U64(v) => Some(*v),
            DecodedValue::I8(v) => u64::try_from(*v).ok(),
            DecodedValue::I16(v) => u64::try_from(*v).ok(),
            DecodedValue::I32(v) => u64::try_from(*v).ok(),
            DecodedValue::I64(v) => u64::try_from(*v).ok(),
            DecodedValue::Enum { value, .. } => Some(*value as u64),
            _ => None,
        }
    }

    /// Try to convert this value to i64 (integer types only).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DecodedValue::I8(v) => Some(*v as i64),
            DecodedValue::I16(v) => Some(*v as i64),
            DecodedValue::I32(v) => Some(*v as i64),
            DecodedValue::I64(v) => Some(*v),
            DecodedValue::U64(v) => i64::try_from(*v).ok(),
            other => other.as_u64().map(|v| v as i64),
        }
    }

    /// Try to convert this value to f64 (numeric values only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DecodedValue::F32(v) => Some(*v as f64),
            DecodedValue::F64(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Try to get the decoded text of a byte field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedValue::Bytes { text, .. } => text.as_deref(),
            _ => None,
        }
    }

    /// Try to get nested records.
    pub fn as_records(&self) -> Option<&NestedRecords> {
        match self {
            DecodedValue::Records(r) => Some(r),
            _ => None,
        }
    }

    /// Get the type name of this value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            DecodedValue::U8(_) => "u8",
            DecodedValue::U16(_) => "u16",
            DecodedValue::U32(_) => "u32",
            DecodedValue::U64(_) => "u64",
            DecodedValue::I8(_) => "i8",
            DecodedValue::I16(_) => "i16",
            DecodedValue::I32(_) => "i32",
            DecodedValue::I64(_) => "i64",
            DecodedValue::F32(_) => "f32",
            DecodedValue::F64(_) => "f64",
            DecodedValue::Bytes { .. } => "bytes",
            DecodedValue::Array(_) => "array",
            DecodedValue::Enum { .. } => "enum",
            DecodedValue::U32Array(_) | DecodedValue::EmptyArray => "u32[]",
            DecodedValue::Records(_) => "records",
            DecodedValue::Error(_) => "error",
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::U8(v) => write!(f, "0x{v:02X}"),
            DecodedValue::U16(v) => write!(f, "0x{v:04X}"),
            DecodedValue::U32(v) => write!(f, "0x{v:08X}"),
            DecodedValue::U64(v) => write!(f, "0x{v:016X}"),
            DecodedValue::I8(v) => write!(f, "{v}"),
            DecodedValue::I16(v) => write!(f, "{v}"),
            DecodedValue::I32(v) => write!(f, "{v}"),
            DecodedValue::I64(v) => write!(f, "{v}"),
            DecodedValue::F32(v) => write!(f, "{v:.2}"),
            DecodedValue::F64(v) => write!(f, "{v:.2}"),
            DecodedValue::Bytes { text: Some(t), .. } => write!(f, "{t:?}"),
            DecodedValue::Bytes { raw, text: None } => {
                let parts: Vec<String> = raw.iter().map(|b| format!("{b:02X}")).collect();
                f.write_str(&parts.join(" "))
            }
            DecodedValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            DecodedValue::Enum { name, value } => write!(f, "{name} ({value})"),
            DecodedValue::U32Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| format!("0x{v:08X}")).collect();
                write!(f, "[{}] {}", items.len(), parts.join(", "))
            }
            DecodedValue::EmptyArray => write!(f, "[0] (empty)"),
            DecodedValue::Records(r) => write!(f, "[{} records x {} bytes]", r.len(), r.record_size()),
            DecodedValue::Error(e) => write!(f, "<{e}>"),
        }
    }
}
