// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode command - decode raw bytes through a built-in layout.

use clap::Args;
use serde::Serialize;

use crate::common::{output_json_or, parse_hex_bytes, parse_u32, print_fields, Result};
use pktcodec::capture::HEADER_SIZE;
use pktcodec::core::{DecodedMessage, LayoutRegistry};
use pktcodec::encoding::{FieldDecoder, FixOutcome, PacketFixEngine};

/// Decode bytes as one opcode's payload.
#[derive(Args, Clone, Debug)]
pub struct DecodeCmd {
    /// Opcode name, e.g. DOWN_Effect
    #[arg(value_name = "NAME")]
    name: String,

    /// Captured bytes as hex (contiguous, spaced, or a byte literal)
    #[arg(value_name = "HEX")]
    bytes: String,

    /// Offset of the payload inside the bytes
    #[arg(long, default_value_t = HEADER_SIZE)]
    offset: usize,

    /// Runtime base for packet fixes (decimal or 0x hex)
    #[arg(long, value_parser = parse_u32, default_value = "0")]
    base_value: u32,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

impl DecodeCmd {
    pub fn run(self) -> Result<()> {
        let registry = LayoutRegistry::builtin();
        let layout = registry
            .lookup(&self.name)
            .ok_or_else(|| anyhow::anyhow!("No layout registered for '{}'", self.name))?;
        let bytes = parse_hex_bytes(&self.bytes)?;

        let mut fields = FieldDecoder::new().decode(layout, &bytes, self.offset)?;
        let fix = PacketFixEngine::builtin().apply_fix(layout.name(), self.base_value, &mut fields);
        tracing::debug!(layout = layout.name(), len = bytes.len(), ?fix, "decoded");

        let output = DecodeOutput {
            layout: layout.name(),
            fix,
            has_errors: fields.has_errors(),
            fields: &fields,
        };
        output_json_or(self.json, &output, || {
            println!("=== {} ===", output.layout);
            print_fields(output.fields, 2);
            if output.fix.is_applied() {
                println!();
                println!("Packet fix applied (base 0x{:08X})", self.base_value);
            }
            Ok(())
        })
    }
}

#[derive(Serialize)]
struct DecodeOutput<'a> {
    layout: &'a str,
    fix: FixOutcome,
    has_errors: bool,
    fields: &'a DecodedMessage,
}
