// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Captured packet record.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::{Direction, CAPTURE_CEILING, UNKNOWN_OPCODE_NAME};

/// One captured message.
///
/// Immutable once built, apart from the session id the store stamps on
/// append. `raw_bytes.len()` never exceeds `declared_length` or
/// [`CAPTURE_CEILING`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketRecord {
    session_id: i64,
    timestamp: DateTime<Local>,
    direction: Direction,
    opcode: u16,
    opcode_name: String,
    raw_bytes: Vec<u8>,
    declared_length: u32,
    priority: u16,
    target_id: u32,
}

impl PacketRecord {
    /// Build a record, truncating `raw_bytes` to `declared_length` capped at
    /// [`CAPTURE_CEILING`].
    pub fn new(
        direction: Direction,
        opcode: u16,
        opcode_name: impl Into<String>,
        mut raw_bytes: Vec<u8>,
        declared_length: u32,
    ) -> Self {
        raw_bytes.truncate((declared_length as usize).min(CAPTURE_CEILING));
        Self {
            session_id: 0,
            timestamp: Local::now(),
            direction,
            opcode,
            opcode_name: opcode_name.into(),
            raw_bytes,
            declared_length,
            priority: 0,
            target_id: 0,
        }
    }

    /// Set the send priority.
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = priority;
        self
    }

    /// Set the receiving target id.
    pub fn with_target_id(mut self, target_id: u32) -> Self {
        self.target_id = target_id;
        self
    }

    /// Override the capture timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub(crate) fn stamp_session(&mut self, session_id: i64) {
        self.session_id = session_id;
    }

    #[inline]
    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    #[inline]
    pub fn opcode_name(&self) -> &str {
        &self.opcode_name
    }

    #[inline]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    #[inline]
    pub fn declared_length(&self) -> u32 {
        self.declared_length
    }

    /// Send priority (zero for received records).
    #[inline]
    pub fn priority(&self) -> u16 {
        self.priority
    }

    /// Receiving target id (zero for sent records).
    #[inline]
    pub fn target_id(&self) -> u32 {
        self.target_id
    }

    /// Check if the capture stopped before the declared end of the packet.
    pub fn is_truncated(&self) -> bool {
        (self.raw_bytes.len() as u64) < self.declared_length as u64
    }

    /// Check if the opcode resolved to a name.
    pub fn is_known(&self) -> bool {
        self.opcode_name != UNKNOWN_OPCODE_NAME
    }

    /// Capture time as `HH:MM:SS.fff`.
    pub fn time_string(&self) -> String {
        self.timestamp.format("%H:%M:%S%.3f").to_string()
    }

    /// Short direction label with an arrow.
    pub fn direction_label(&self) -> &'static str {
        match self.direction {
            Direction::Send => "send ↑",
            Direction::Receive => "recv ↓",
        }
    }

    /// Classic 16-bytes-per-row hex dump with an ASCII column.
    pub fn hex_dump(&self) -> String {
        if self.raw_bytes.is_empty() {
            return "No data".to_string();
        }

        let mut out = String::with_capacity(self.raw_bytes.len() * 4 + 16);
        for (row, chunk) in self.raw_bytes.chunks(16).enumerate() {
            let _ = write!(out, "{:04X}: ", row * 16);
            for j in 0..16 {
                match chunk.get(j) {
                    Some(b) => {
                        let _ = write!(out, "{b:02X} ");
                    }
                    None => out.push_str("   "),
                }
                if j == 7 {
                    out.push(' ');
                }
            }
            out.push(' ');
            for &b in chunk {
                out.push(if (32..127).contains(&b) { b as char } else { '.' });
            }
            out.push('\n');
        }
        out
    }

    /// Bytes as an array literal, e.g. `[0x01, 0xFF]`.
    pub fn byte_literal(&self) -> String {
        let parts: Vec<String> = self.raw_bytes.iter().map(|b| format!("0x{b:02X}")).collect();
        format!("[{}]", parts.join(", "))
    }

    /// Bytes as contiguous uppercase hex.
    pub fn hex_string(&self) -> String {
        hex::encode_upper(&self.raw_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_bytes_truncated_to_declared_length() {
        let record = PacketRecord::new(Direction::Send, 1, "UP_PingReq", vec![0; 64], 40);
        assert_eq!(record.raw_bytes().len(), 40);
        assert!(!record.is_truncated());
    }

    #[test]
    fn test_raw_bytes_capped_at_capture_ceiling() {
        let record = PacketRecord::new(Direction::Send, 1, "UP_PingReq", vec![0; 4096], 8000);
        assert_eq!(record.raw_bytes().len(), CAPTURE_CEILING);
        assert_eq!(record.declared_length(), 8000);
        assert!(record.is_truncated());
    }

    #[test]
    fn test_is_known() {
        let known = PacketRecord::new(Direction::Send, 1, "UP_PingReq", Vec::new(), 0);
        let unknown = PacketRecord::new(Direction::Send, 1, UNKNOWN_OPCODE_NAME, Vec::new(), 0);
        assert!(known.is_known());
        assert!(!unknown.is_known());
    }

    #[test]
    fn test_hex_dump_layout() {
        let bytes: Vec<u8> = (0x41..0x41 + 18).collect();
        let record = PacketRecord::new(Direction::Receive, 1, "X", bytes, 18);
        let dump = record.hex_dump();
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "0000: 41 42 43 44 45 46 47 48  49 4A 4B 4C 4D 4E 4F 50  ABCDEFGHIJKLMNOP"
        );
        assert!(lines[1].starts_with("0010: 51 52 "));
        assert!(lines[1].ends_with(" QR"));
    }

    #[test]
    fn test_hex_dump_empty() {
        let record = PacketRecord::new(Direction::Receive, 1, "X", Vec::new(), 0);
        assert_eq!(record.hex_dump(), "No data");
    }

    #[test]
    fn test_byte_literal_and_hex_string() {
        let record = PacketRecord::new(Direction::Send, 1, "X", vec![0x01, 0xAB], 2);
        assert_eq!(record.byte_literal(), "[0x01, 0xAB]");
        assert_eq!(record.hex_string(), "01AB");
    }

    #[test]
    fn test_meta_builders() {
        let record = PacketRecord::new(Direction::Receive, 1, "X", Vec::new(), 0x38)
            .with_target_id(0x1000_0001);
        assert_eq!(record.target_id(), 0x1000_0001);
        assert_eq!(record.priority(), 0);
        assert!(record.is_truncated());
    }
}
