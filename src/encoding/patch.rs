// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Field patching for the resend path.
//!
//! A [`ResendDraft`] is an editable copy of a captured upstream record. Field
//! edits arrive as user text, are parsed for the field's kind and written
//! little-endian at the field's absolute offset. Sending the result is up to
//! the caller.

use crate::capture::HEADER_SIZE;
use crate::core::{CodecError, Direction, PacketRecord, Result};
use crate::schema::{FieldDescriptor, FieldKind, LayoutDescriptor, ScalarKind};

use super::cursor::ByteCursorMut;

/// Absolute byte offset of a top-level field.
pub fn field_offset(layout: &LayoutDescriptor, field: &str, base_offset: usize) -> Result<usize> {
    layout
        .field(field)
        .map(|f| base_offset + f.offset as usize)
        .ok_or_else(|| CodecError::field_not_found(layout.name(), field))
}

/// Editable copy of an upstream record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendDraft {
    opcode: u16,
    opcode_name: String,
    base_offset: usize,
    original: Vec<u8>,
    bytes: Vec<u8>,
}

impl ResendDraft {
    /// Copy a record for editing. Only upstream records can be resent.
    pub fn from_record(record: &PacketRecord) -> Result<Self> {
        if record.direction() != Direction::Send {
            return Err(CodecError::not_resendable(record.direction().as_str()));
        }
        Ok(Self {
            opcode: record.opcode(),
            opcode_name: record.opcode_name().to_string(),
            base_offset: HEADER_SIZE,
            original: record.raw_bytes().to_vec(),
            bytes: record.raw_bytes().to_vec(),
        })
    }

    /// Measure field offsets from `base_offset` instead of the header size.
    pub fn with_base_offset(mut self, base_offset: usize) -> Self {
        self.base_offset = base_offset;
        self
    }

    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    pub fn opcode_name(&self) -> &str {
        &self.opcode_name
    }

    pub fn base_offset(&self) -> usize {
        self.base_offset
    }

    /// Current (possibly edited) bytes, header included.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable access for in-place rewrites such as packet fixes.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Check if any byte differs from the captured copy.
    pub fn is_modified(&self) -> bool {
        self.bytes != self.original
    }

    /// Discard all edits.
    pub fn reset(&mut self) {
        self.bytes.clone_from(&self.original);
    }

    /// Parse `text` for the named field and write it into the draft.
    pub fn set_field(&mut self, layout: &LayoutDescriptor, name: &str, text: &str) -> Result<()> {
        let field = layout
            .field(name)
            .ok_or_else(|| CodecError::field_not_found(layout.name(), name))?;
        let at = field_offset(layout, name, self.base_offset)?;
        let mut writer = ByteCursorMut::new(&mut self.bytes);

        match &field.kind {
            FieldKind::Scalar(kind) => write_scalar(&mut writer, *kind, at, text, field),
            FieldKind::EnumU16(table) | FieldKind::EnumU32(table) => {
                let kind = if matches!(field.kind, FieldKind::EnumU16(_)) {
                    ScalarKind::U16
                } else {
                    ScalarKind::U32
                };
                let value = match table.value_of(text.trim()) {
                    Some(v) => v as u64,
                    None => parse_unsigned(text, kind, field)?,
                };
                writer.write_unsigned(kind, at, value)
            }
            FieldKind::FixedBytes(len) => {
                let data = if field.is_name_like() {
                    text.as_bytes().to_vec()
                } else {
                    let compact: String = text.split_whitespace().collect();
                    hex::decode(&compact).map_err(|e| parse_error(field, e.to_string()))?
                };
                if data.len() > *len {
                    return Err(parse_error(
                        field,
                        format!("{} bytes do not fit in {len}", data.len()),
                    ));
                }
                writer.write_bytes(at, *len, &data)
            }
            FieldKind::FixedArray { element, len } => {
                let parts: Vec<&str> = text.split(',').map(str::trim).collect();
                if parts.len() != *len {
                    return Err(parse_error(
                        field,
                        format!("expected {len} comma-separated values, got {}", parts.len()),
                    ));
                }
                for (i, part) in parts.iter().enumerate() {
                    write_scalar(&mut writer, *element, at + i * element.width(), part, field)?;
                }
                Ok(())
            }
            FieldKind::DynamicU32Array { .. } | FieldKind::NestedRecordArray { .. } => Err(
                CodecError::unsupported(format!("editing count-gated field '{name}'")),
            ),
        }
    }
}

fn write_scalar(
    writer: &mut ByteCursorMut<'_>,
    kind: ScalarKind,
    at: usize,
    text: &str,
    field: &FieldDescriptor,
) -> Result<()> {
    match kind {
        ScalarKind::F32 | ScalarKind::F64 => {
            let value: f64 = text
                .trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| parse_error(field, e.to_string()))?;
            writer.write_float(kind, at, value)
        }
        ScalarKind::I8 | ScalarKind::I16 | ScalarKind::I32 | ScalarKind::I64 => {
            writer.write_signed(kind, at, parse_signed(text, kind, field)?)
        }
        _ => writer.write_unsigned(kind, at, parse_unsigned(text, kind, field)?),
    }
}

fn parse_error(field: &FieldDescriptor, message: impl Into<String>) -> CodecError {
    CodecError::parse(format!("field '{}'", field.name), message)
}

fn strip_hex(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

/// Parse `0x`-prefixed hex or decimal, rejecting values wider than `kind`.
fn parse_unsigned(text: &str, kind: ScalarKind, field: &FieldDescriptor) -> Result<u64> {
    let text = text.trim();
    let value = match strip_hex(text) {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => text.parse::<u64>(),
    }
    .map_err(|e| parse_error(field, format!("'{text}': {e}")))?;

    let bits = kind.width() * 8;
    if bits < 64 && value >> bits != 0 {
        return Err(parse_error(
            field,
            format!("{value} does not fit in {}", kind.as_str()),
        ));
    }
    Ok(value)
}

/// Parse decimal, or `0x` hex read as the two's complement bit pattern.
fn parse_signed(text: &str, kind: ScalarKind, field: &FieldDescriptor) -> Result<i64> {
    let trimmed = text.trim();
    let bits = kind.width() * 8;
    if strip_hex(trimmed).is_some() {
        let raw = parse_unsigned(trimmed, kind, field)?;
        let shift = 64 - bits;
        return Ok(((raw << shift) as i64) >> shift);
    }

    let value: i64 = trimmed
        .parse()
        .map_err(|e: std::num::ParseIntError| parse_error(field, format!("'{trimmed}': {e}")))?;
    let (min, max) = if bits == 64 {
        (i64::MIN, i64::MAX)
    } else {
        (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1)
    };
    if value < min || value > max {
        return Err(parse_error(
            field,
            format!("{value} does not fit in {}", kind.as_str()),
        ));
    }
    Ok(value)
}
