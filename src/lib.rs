// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # pktcodec
//!
//! Opcode classification and layout-driven field decoding for captured game
//! network packets.
//!
//! ## Architecture
//!
//! - `capture/` - Hook-side path from raw frames to the bounded capture queue
//! - `session/` - Consumer-side sessions drained from the queue
//! - `schema/` - Layout descriptors and the built-in layout catalogue
//! - `encoding/` - Field decoder, packet fixes, inspection and resend patching
//! - `io/` - Record filters for session views
//! - `config` - TOML configuration
//!
//! ## Example: Capture and decode
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pktcodec::capture::{CapturePipeline, CaptureQueue, OpcodeTable, SharedOpcodeTable};
//! use pktcodec::core::{Direction, LayoutRegistry};
//! use pktcodec::encoding::Inspector;
//! use pktcodec::session::SessionStore;
//!
//! let mut table = OpcodeTable::new();
//! table.insert(Direction::Receive, 0x0123, "DOWN_UpdateHpMpGp");
//!
//! let registry = Arc::clone(LayoutRegistry::builtin());
//! let pipeline = CapturePipeline::new(
//!     registry.clone(),
//!     SharedOpcodeTable::new(table),
//!     CaptureQueue::new(),
//! );
//!
//! let mut frame = vec![0u8; 0x40];
//! frame[0x12..0x14].copy_from_slice(&0x0123u16.to_le_bytes());
//! pipeline.on_receive(&frame, 0, true);
//!
//! let mut store = SessionStore::new();
//! store.drain(pipeline.queue());
//!
//! let record = &store.active().records()[0];
//! let inspection = Inspector::builtin().inspect(record, 0).unwrap();
//! assert!(inspection.is_decoded());
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{
    CodecError, DecodeError, DecodedMessage, DecodedValue, Direction, LayoutRegistry,
    PacketRecord, Result,
};

// Layout descriptors and the built-in catalogue
pub mod schema;

// Decoding, fixes and patching
pub mod encoding;

pub use encoding::{FieldDecoder, Inspection, Inspector, PacketFixEngine, ResendDraft};

// Capture path
pub mod capture;

pub use capture::{CapturePipeline, CaptureQueue, SharedOpcodeTable};

// Sessions
pub mod session;

pub use session::SessionStore;

// Filters
pub mod io;

pub use io::PacketFilter;

pub mod config;

pub use config::PktConfig;
