// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Layout-driven field decoder.
//!
//! Walks a [`LayoutDescriptor`] over captured bytes and produces an ordered
//! [`DecodedMessage`]. A field that cannot be read is recorded as a
//! [`DecodedValue::Error`] and decoding moves on to the next field; only a
//! malformed descriptor fails the whole call.

use crate::core::{CodecError, DecodeError, DecodedMessage, DecodedValue, NestedRecords, Result};
use crate::schema::{FieldDescriptor, FieldKind, LayoutDescriptor, ScalarKind};

use super::cursor::ByteCursor;

/// Deepest allowed chain of nested record arrays.
pub const MAX_NESTING_DEPTH: usize = 8;

/// Decoder for layout descriptors.
#[derive(Debug, Clone, Copy)]
pub struct FieldDecoder {
    max_depth: usize,
}

impl Default for FieldDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDecoder {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    /// Decode `layout` from `bytes`, with field offsets measured from `base_offset`.
    ///
    /// # Example
    ///
    /// ```
    /// use pktcodec::encoding::FieldDecoder;
    /// use pktcodec::schema::LayoutDescriptor;
    ///
    /// let layout = LayoutDescriptor::builder("DOWN_UpdateHpMpGp", 8)
    ///     .u32("Hp", 0)
    ///     .u16("Mp", 4)
    ///     .build();
    /// let bytes = [0u8, 0, 0, 0, 0x64, 0, 0, 0, 0x10, 0x27, 0, 0];
    /// let msg = FieldDecoder::new().decode(&layout, &bytes, 4).unwrap();
    /// assert_eq!(msg.get("Hp").and_then(|v| v.as_u64()), Some(100));
    /// ```
    pub fn decode(
        &self,
        layout: &LayoutDescriptor,
        bytes: &[u8],
        base_offset: usize,
    ) -> Result<DecodedMessage> {
        let depth = nesting_depth(layout, self.max_depth + 1);
        if depth > self.max_depth {
            return Err(CodecError::invalid_layout(
                layout.name(),
                format!("record nesting exceeds {} levels", self.max_depth),
            ));
        }

        Ok(self.decode_layout(layout, &ByteCursor::new(bytes), base_offset))
    }

    fn decode_layout(
        &self,
        layout: &LayoutDescriptor,
        cursor: &ByteCursor<'_>,
        base_offset: usize,
    ) -> DecodedMessage {
        let mut msg = DecodedMessage::with_capacity(layout.field_count());
        for field in layout.fields() {
            let at = base_offset.saturating_add(field.offset as usize);
            let value = match self.decode_field(field, cursor, at, &msg) {
                Ok(value) => value,
                Err(err) => DecodedValue::Error(err),
            };
            msg.push(field.name.as_str(), field.offset as usize, value);
        }
        msg
    }

    fn decode_field(
        &self,
        field: &FieldDescriptor,
        cursor: &ByteCursor<'_>,
        at: usize,
        siblings: &DecodedMessage,
    ) -> std::result::Result<DecodedValue, DecodeError> {
        match &field.kind {
            FieldKind::Scalar(kind) => cursor.read_scalar(*kind, at),
            FieldKind::FixedBytes(len) => {
                let raw = cursor.window(at, *len)?;
                let text = field.is_name_like().then(|| text_until_nul(raw));
                Ok(DecodedValue::Bytes {
                    raw: raw.to_vec(),
                    text,
                })
            }
            FieldKind::FixedArray { element, len } => {
                cursor.window(at, element.width().saturating_mul(*len))?;
                read_scalars(cursor, *element, at, *len).map(DecodedValue::Array)
            }
            FieldKind::EnumU16(table) => {
                let value = cursor.read_u16(at)? as u32;
                Ok(enum_value(table.variant_name(value), value))
            }
            FieldKind::EnumU32(table) => {
                let value = cursor.read_u32(at)?;
                Ok(enum_value(table.variant_name(value), value))
            }
            FieldKind::DynamicU32Array {
                count_field,
                max_count,
            } => {
                let count = resolve_count(siblings, count_field)?.min(*max_count);
                if count == 0 {
                    return Ok(DecodedValue::EmptyArray);
                }
                let available = cursor.len().saturating_sub(at);
                let required = count.checked_mul(4).ok_or(DecodeError::InsufficientData {
                    required: usize::MAX,
                    available,
                })?;
                let raw = cursor
                    .window(at, required)
                    .map_err(|_| DecodeError::InsufficientData {
                        required,
                        available,
                    })?;
                Ok(DecodedValue::U32Array(
                    raw.chunks_exact(4)
                        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                        .collect(),
                ))
            }
            FieldKind::NestedRecordArray {
                count_field,
                record_size,
                capacity,
                record,
            } => {
                let count = resolve_count(siblings, count_field)?.min(*capacity);
                let span = count
                    .checked_mul(*record_size)
                    .filter(|span| at.checked_add(*span).is_some())
                    .ok_or(DecodeError::InsufficientData {
                        required: usize::MAX,
                        available: cursor.len().saturating_sub(at),
                    })?;
                let buffer = cursor.prefix(at, span).to_vec();
                let records = (0..count)
                    .map(|i| self.decode_layout(record, cursor, at + i * record_size))
                    .collect();
                Ok(DecodedValue::Records(NestedRecords::new(
                    count,
                    *record_size,
                    field.offset as usize,
                    buffer,
                    records,
                )))
            }
        }
    }
}

/// Depth of record nesting below `layout`, stopping once `limit` is passed.
fn nesting_depth(layout: &LayoutDescriptor, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    layout
        .fields()
        .iter()
        .filter_map(|f| match &f.kind {
            FieldKind::NestedRecordArray { record, .. } => Some(1 + nesting_depth(record, limit - 1)),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

fn resolve_count(siblings: &DecodedMessage, count_field: &str) -> std::result::Result<usize, DecodeError> {
    let value = siblings
        .get(count_field)
        .ok_or_else(|| DecodeError::UnknownField(count_field.to_string()))?;
    value
        .as_u64()
        .map(|n| n.min(usize::MAX as u64) as usize)
        .ok_or_else(|| DecodeError::CountUnavailable(count_field.to_string()))
}

fn read_scalars(
    cursor: &ByteCursor<'_>,
    kind: ScalarKind,
    at: usize,
    len: usize,
) -> std::result::Result<Vec<DecodedValue>, DecodeError> {
    (0..len)
        .map(|i| cursor.read_scalar(kind, at + i * kind.width()))
        .collect()
}

fn enum_value(name: Option<&str>, value: u32) -> DecodedValue {
    DecodedValue::Enum {
        name: name
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown(0x{value:04X})")),
        value,
    }
}

fn text_until_nul(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
