// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Layout-driven packet decoding and patching.
//!
//! - [`cursor`] - Bounds-checked little-endian byte access
//! - [`decoder`] - Generic field decoder over layout descriptors
//! - [`fix`] - Opcode-specific packet fixes
//! - [`inspect`] - Record inspection for the detail view
//! - [`patch`] - Field offsets and resend drafts

pub mod cursor;
pub mod decoder;
pub mod fix;
pub mod inspect;
pub mod patch;

pub use cursor::{ByteCursor, ByteCursorMut};
pub use decoder::{FieldDecoder, MAX_NESTING_DEPTH};
pub use fix::{FixOutcome, FixRule, PacketFixEngine};
pub use inspect::{Inspection, Inspector};
pub use patch::{field_offset, ResendDraft};
