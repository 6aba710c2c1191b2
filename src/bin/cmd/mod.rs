// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod decode;
mod layout;
mod patch;
mod replay;

pub use decode::DecodeCmd;
pub use layout::LayoutCmd;
pub use patch::PatchCmd;
pub use replay::ReplayCmd;
