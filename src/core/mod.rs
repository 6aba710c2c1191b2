// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout pktcodec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] / [`DecodeError`] - Hard errors and per-field soft failures
//! - [`DecodedValue`] - Unified decoded field representation
//! - [`LayoutRegistry`] - Opcode name to layout catalogue
//! - [`PacketRecord`] - One captured message
//! - [`Direction`] - Wire direction of a message

pub mod error;
pub mod record;
pub mod registry;
pub mod value;

use serde::{Deserialize, Serialize};

pub use error::{CodecError, DecodeError, Result};
pub use record::PacketRecord;
pub use registry::{LayoutRegistry, LayoutRegistryBuilder, LayoutSource};
pub use value::{DecodedField, DecodedMessage, DecodedValue, NestedRecords};

/// Name reported for opcodes missing from the opcode table.
pub const UNKNOWN_OPCODE_NAME: &str = "Unknown";

/// Most bytes kept from any single frame.
pub const CAPTURE_CEILING: usize = 2048;

/// Wire direction of a captured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Client to server (upstream, `UP_` opcodes)
    Send,
    /// Server to client (downstream, `DOWN_` opcodes)
    Receive,
}

/// Error returned when parsing a `Direction` from string fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDirectionError {
    _private: (),
}

impl std::fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid direction, expected 'send', 'up', 'receive', 'recv' or 'down'"
        )
    }
}

impl std::error::Error for ParseDirectionError {}

impl std::str::FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "send" | "up" => Ok(Direction::Send),
            "receive" | "recv" | "down" => Ok(Direction::Receive),
            _ => Err(ParseDirectionError { _private: () }),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Direction {
    /// Check if this is the upstream direction.
    pub fn is_send(&self) -> bool {
        matches!(self, Direction::Send)
    }

    /// Check if this is the downstream direction.
    pub fn is_receive(&self) -> bool {
        matches!(self, Direction::Receive)
    }

    /// Opcode name prefix used by layouts of this direction.
    pub fn name_prefix(&self) -> &'static str {
        match self {
            Direction::Send => "UP_",
            Direction::Receive => "DOWN_",
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Send => "send",
            Direction::Receive => "receive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_str() {
        assert_eq!("send".parse::<Direction>(), Ok(Direction::Send));
        assert_eq!("UP".parse::<Direction>(), Ok(Direction::Send));
        assert_eq!("recv".parse::<Direction>(), Ok(Direction::Receive));
        assert_eq!("Down".parse::<Direction>(), Ok(Direction::Receive));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_prefix() {
        assert_eq!(Direction::Send.name_prefix(), "UP_");
        assert_eq!(Direction::Receive.name_prefix(), "DOWN_");
        assert!(Direction::Send.is_send());
        assert!(Direction::Receive.is_receive());
    }
}
