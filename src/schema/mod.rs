// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Packet layout descriptors.
//!
//! This module provides:
//! - [`LayoutDescriptor`] / [`FieldDescriptor`] - data-only payload layouts
//! - [`FieldKind`] - binary shape of a field
//! - [`builtin`] - the catalogue of known upstream and downstream layouts

pub mod builtin;
pub mod layout;

pub use layout::{
    EnumTable, FieldDescriptor, FieldKind, LayoutBuilder, LayoutDescriptor, ScalarKind,
};
