// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use pktcodec::capture::{
    CapturePipeline, CaptureQueue, OpcodeTable, SharedOpcodeTable, HEADER_SIZE,
    RECEIVE_OPCODE_OFFSET, SEND_LENGTH_OFFSET,
};
use pktcodec::core::{Direction, LayoutRegistry};

// ============================================================================
// Frames
// ============================================================================

/// Downstream frame of `len` bytes carrying `opcode` in its header.
pub fn receive_frame(opcode: u16, len: usize) -> Vec<u8> {
    let mut frame = vec![0u8; len.max(RECEIVE_OPCODE_OFFSET + 2)];
    frame[RECEIVE_OPCODE_OFFSET..RECEIVE_OPCODE_OFFSET + 2].copy_from_slice(&opcode.to_le_bytes());
    frame
}

/// Upstream frame declaring `payload_len` bytes of payload.
pub fn send_frame(opcode: u16, payload_len: u32, len: usize) -> Vec<u8> {
    let mut frame = vec![0u8; len.max(SEND_LENGTH_OFFSET + 4)];
    frame[0..2].copy_from_slice(&opcode.to_le_bytes());
    frame[SEND_LENGTH_OFFSET..SEND_LENGTH_OFFSET + 4].copy_from_slice(&payload_len.to_le_bytes());
    frame
}

/// Write a little-endian `u32` at a payload-relative offset.
pub fn put_u32(frame: &mut [u8], payload_offset: usize, value: u32) {
    let at = HEADER_SIZE + payload_offset;
    frame[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

/// Write a little-endian `u16` at a payload-relative offset.
pub fn put_u16(frame: &mut [u8], payload_offset: usize, value: u16) {
    let at = HEADER_SIZE + payload_offset;
    frame[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

// ============================================================================
// Pipelines
// ============================================================================

/// Opcode table naming a few built-in layouts.
pub fn sample_table() -> OpcodeTable {
    let mut table = OpcodeTable::new();
    table.insert(Direction::Receive, 0x0123, "DOWN_ActorControl");
    table.insert(Direction::Receive, 0x0200, "DOWN_Effect");
    table.insert(Direction::Receive, 0x0300, "DOWN_EffectResult");
    table.insert(Direction::Send, 0x0042, "UP_ActionSend");
    table
}

/// Pipeline over the built-in layouts and [`sample_table`].
pub fn builtin_pipeline(capacity: usize) -> CapturePipeline {
    CapturePipeline::new(
        Arc::<LayoutRegistry>::clone(LayoutRegistry::builtin()),
        SharedOpcodeTable::new(sample_table()),
        CaptureQueue::with_capacity(capacity),
    )
}

// ============================================================================
// Fixtures
// ============================================================================

/// Get the path to a test fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join(name)
}
