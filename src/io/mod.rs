// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Record selection for session views.

pub mod filter;

pub use filter::{OpcodeFilter, PacketFilter};
