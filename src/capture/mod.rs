// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Capture path from intercepted frames to the bounded record queue.

pub mod opcodes;
pub mod pipeline;
pub mod queue;

pub use opcodes::{OpcodeTable, OpcodeTableError, SharedOpcodeTable};
pub use pipeline::{
    CaptureMeta, CaptureOutcome, CapturePipeline, CaptureStats, CaptureStatsSnapshot, DropReason,
};
pub use queue::CaptureQueue;

pub use crate::core::CAPTURE_CEILING;

/// Bookkeeping header kept in front of every captured payload.
pub const HEADER_SIZE: usize = 0x20;

/// Offset of the `u16` opcode inside a downstream header.
pub const RECEIVE_OPCODE_OFFSET: usize = 0x12;

/// Offset of the `u16` opcode inside an upstream frame.
pub const SEND_OPCODE_OFFSET: usize = 0;

/// Offset of the `u32` payload length inside an upstream frame.
pub const SEND_LENGTH_OFFSET: usize = 8;

/// Capture queue bound; further records are dropped.
pub const MAX_QUEUE_SIZE: usize = 10_000;

/// Payload size assumed for downstream opcodes without a registered layout.
pub const FALLBACK_PAYLOAD_SIZE: u32 = 512;
