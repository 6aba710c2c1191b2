// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in layout catalogue.
//!
//! Layout names match opcode names exactly: `UP_` for client-to-server and
//! `DOWN_` for server-to-client messages. Offsets are payload-relative.

pub mod down;
pub mod enums;
pub mod up;

use crate::core::LayoutRegistryBuilder;

/// Register every built-in layout.
pub fn register_all(builder: LayoutRegistryBuilder) -> LayoutRegistryBuilder {
    let builder = up::layouts().into_iter().fold(builder, |b, l| b.register(l));
    down::layouts().into_iter().fold(builder, |b, l| b.register(l))
}
