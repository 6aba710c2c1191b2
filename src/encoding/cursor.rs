// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bounds-checked little-endian access at absolute offsets.
//!
//! Layout fields live at fixed offsets, so unlike a streaming reader the
//! cursor has no read position: every access names its own offset and is
//! checked against the captured length before any byte is touched.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::{CodecError, DecodeError, DecodedValue};
use crate::schema::ScalarKind;

/// Read-only view over captured packet bytes.
///
/// # Example
///
/// ```
/// use pktcodec::encoding::cursor::ByteCursor;
///
/// let data = [0x22, 0x00, 0x05, 0x00, 0x00, 0x10];
/// let cursor = ByteCursor::new(&data);
/// assert_eq!(cursor.read_u16(0).unwrap(), 0x22);
/// assert!(cursor.read_u32(4).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of captured bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `width` bytes at `offset`, or report how far short the capture is.
    pub fn window(&self, offset: usize, width: usize) -> Result<&'a [u8], DecodeError> {
        match offset.checked_add(width) {
            Some(end) if end <= self.data.len() => Ok(&self.data[offset..end]),
            _ => Err(DecodeError::OutOfRange {
                offset,
                width,
                available: self.data.len(),
            }),
        }
    }

    /// Borrow whatever part of `offset..offset + width` was captured.
    pub fn prefix(&self, offset: usize, width: usize) -> &'a [u8] {
        let start = offset.min(self.data.len());
        let end = offset.saturating_add(width).min(self.data.len());
        &self.data[start..end]
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        Ok(self.window(offset, 1)?[0])
    }

    pub fn read_i8(&self, offset: usize) -> Result<i8, DecodeError> {
        Ok(self.read_u8(offset)? as i8)
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16, DecodeError> {
        Ok(LittleEndian::read_u16(self.window(offset, 2)?))
    }

    pub fn read_i16(&self, offset: usize) -> Result<i16, DecodeError> {
        Ok(LittleEndian::read_i16(self.window(offset, 2)?))
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32, DecodeError> {
        Ok(LittleEndian::read_u32(self.window(offset, 4)?))
    }

    pub fn read_i32(&self, offset: usize) -> Result<i32, DecodeError> {
        Ok(LittleEndian::read_i32(self.window(offset, 4)?))
    }

    pub fn read_u64(&self, offset: usize) -> Result<u64, DecodeError> {
        Ok(LittleEndian::read_u64(self.window(offset, 8)?))
    }

    pub fn read_i64(&self, offset: usize) -> Result<i64, DecodeError> {
        Ok(LittleEndian::read_i64(self.window(offset, 8)?))
    }

    pub fn read_f32(&self, offset: usize) -> Result<f32, DecodeError> {
        Ok(LittleEndian::read_f32(self.window(offset, 4)?))
    }

    pub fn read_f64(&self, offset: usize) -> Result<f64, DecodeError> {
        Ok(LittleEndian::read_f64(self.window(offset, 8)?))
    }

    /// Read one scalar of the given kind.
    pub fn read_scalar(&self, kind: ScalarKind, offset: usize) -> Result<DecodedValue, DecodeError> {
        Ok(match kind {
            ScalarKind::U8 => DecodedValue::U8(self.read_u8(offset)?),
            ScalarKind::U16 => DecodedValue::U16(self.read_u16(offset)?),
            ScalarKind::U32 => DecodedValue::U32(self.read_u32(offset)?),
            ScalarKind::U64 => DecodedValue::U64(self.read_u64(offset)?),
            ScalarKind::I8 => DecodedValue::I8(self.read_i8(offset)?),
            ScalarKind::I16 => DecodedValue::I16(self.read_i16(offset)?),
            ScalarKind::I32 => DecodedValue::I32(self.read_i32(offset)?),
            ScalarKind::I64 => DecodedValue::I64(self.read_i64(offset)?),
            ScalarKind::F32 => DecodedValue::F32(self.read_f32(offset)?),
            ScalarKind::F64 => DecodedValue::F64(self.read_f64(offset)?),
        })
    }
}

/// Mutable view used to patch scalars in place.
#[derive(Debug)]
pub struct ByteCursorMut<'a> {
    data: &'a mut [u8],
}

impl<'a> ByteCursorMut<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data }
    }

    fn window_mut(&mut self, offset: usize, width: usize) -> crate::Result<&mut [u8]> {
        let available = self.data.len();
        match offset.checked_add(width) {
            Some(end) if end <= available => Ok(&mut self.data[offset..end]),
            _ => Err(CodecError::buffer_too_short(
                width,
                available.saturating_sub(offset),
                offset,
            )),
        }
    }

    pub fn read_u32(&mut self, offset: usize) -> crate::Result<u32> {
        Ok(LittleEndian::read_u32(self.window_mut(offset, 4)?))
    }

    /// Write an unsigned value truncated to the kind's width.
    pub fn write_unsigned(&mut self, kind: ScalarKind, offset: usize, value: u64) -> crate::Result<()> {
        let buf = self.window_mut(offset, kind.width())?;
        match kind.width() {
            1 => buf[0] = value as u8,
            2 => LittleEndian::write_u16(buf, value as u16),
            4 => LittleEndian::write_u32(buf, value as u32),
            _ => LittleEndian::write_u64(buf, value),
        }
        Ok(())
    }

    /// Write a signed value truncated to the kind's width.
    pub fn write_signed(&mut self, kind: ScalarKind, offset: usize, value: i64) -> crate::Result<()> {
        let buf = self.window_mut(offset, kind.width())?;
        match kind.width() {
            1 => buf[0] = value as i8 as u8,
            2 => LittleEndian::write_i16(buf, value as i16),
            4 => LittleEndian::write_i32(buf, value as i32),
            _ => LittleEndian::write_i64(buf, value),
        }
        Ok(())
    }

    /// Write a float of the kind's width.
    pub fn write_float(&mut self, kind: ScalarKind, offset: usize, value: f64) -> crate::Result<()> {
        let buf = self.window_mut(offset, kind.width())?;
        match kind {
            ScalarKind::F32 => LittleEndian::write_f32(buf, value as f32),
            ScalarKind::F64 => LittleEndian::write_f64(buf, value),
            other => return Err(CodecError::unsupported(format!("float write to {}", other.as_str()))),
        }
        Ok(())
    }

    /// Copy bytes into the buffer, zero-filling the rest of a `width`-byte slot.
    pub fn write_bytes(&mut self, offset: usize, width: usize, bytes: &[u8]) -> crate::Result<()> {
        let buf = self.window_mut(offset, width)?;
        let n = bytes.len().min(width);
        buf[..n].copy_from_slice(&bytes[..n]);
        buf[n..].fill(0);
        Ok(())
    }
}
