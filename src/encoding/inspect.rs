// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! On-demand record inspection for the detail view.

use std::sync::Arc;

use serde::Serialize;

use crate::capture::HEADER_SIZE;
use crate::core::{DecodedMessage, LayoutRegistry, PacketRecord, Result};

use super::decoder::FieldDecoder;
use super::fix::{FixOutcome, PacketFixEngine};

/// What the detail view shows for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inspection {
    /// No layout is registered for the opcode name
    Opaque { hex_dump: String },
    /// Fields decoded through the named layout, after the packet fix
    Decoded {
        layout: String,
        fields: DecodedMessage,
        fix: FixOutcome,
    },
}

impl Inspection {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Inspection::Decoded { .. })
    }

    pub fn fields(&self) -> Option<&DecodedMessage> {
        match self {
            Inspection::Decoded { fields, .. } => Some(fields),
            Inspection::Opaque { .. } => None,
        }
    }
}

/// Decodes records against a layout registry and applies packet fixes.
#[derive(Debug, Clone)]
pub struct Inspector {
    registry: Arc<LayoutRegistry>,
    fixes: PacketFixEngine,
    decoder: FieldDecoder,
}

impl Inspector {
    pub fn new(registry: Arc<LayoutRegistry>, fixes: PacketFixEngine) -> Self {
        Self {
            registry,
            fixes,
            decoder: FieldDecoder::new(),
        }
    }

    /// Inspector over the built-in layouts and fix rules.
    pub fn builtin() -> Self {
        Self::new(Arc::clone(LayoutRegistry::builtin()), PacketFixEngine::builtin())
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Decode a record. Both directions keep the 0x20-byte header in front
    /// of the payload, so field offsets start at [`HEADER_SIZE`].
    pub fn inspect(&self, record: &PacketRecord, base_value: u32) -> Result<Inspection> {
        let Some(layout) = self.registry.lookup(record.opcode_name()) else {
            return Ok(Inspection::Opaque {
                hex_dump: record.hex_dump(),
            });
        };

        let mut fields = self.decoder.decode(layout, record.raw_bytes(), HEADER_SIZE)?;
        let fix = self.fixes.apply_fix(layout.name(), base_value, &mut fields);
        Ok(Inspection::Decoded {
            layout: layout.name().to_string(),
            fields,
            fix,
        })
    }
}
