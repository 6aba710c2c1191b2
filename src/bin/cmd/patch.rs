// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Patch command - edit fields of an upstream packet for resending.

use clap::Args;
use serde::Serialize;

use crate::common::{output_json_or, parse_hex_bytes, parse_u32, Result};
use pktcodec::capture::HEADER_SIZE;
use pktcodec::core::{Direction, LayoutRegistry, PacketRecord};
use pktcodec::encoding::{PacketFixEngine, ResendDraft};

/// Rewrite fields of a captured send packet.
#[derive(Args, Clone, Debug)]
pub struct PatchCmd {
    /// Opcode name, e.g. UP_ActionSend
    #[arg(value_name = "NAME")]
    name: String,

    /// Captured bytes as hex, header included
    #[arg(value_name = "HEX")]
    bytes: String,

    /// Field assignment FIELD=VALUE (repeatable)
    #[arg(short, long = "set", value_name = "FIELD=VALUE")]
    sets: Vec<String>,

    /// Offset of the payload inside the bytes
    #[arg(long, default_value_t = HEADER_SIZE)]
    offset: usize,

    /// Apply the opcode's packet fix with this base before editing
    #[arg(long, value_parser = parse_u32)]
    fix_base: Option<u32>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

impl PatchCmd {
    pub fn run(self) -> Result<()> {
        let registry = LayoutRegistry::builtin();
        let layout = registry
            .lookup(&self.name)
            .ok_or_else(|| anyhow::anyhow!("No layout registered for '{}'", self.name))?;
        let bytes = parse_hex_bytes(&self.bytes)?;
        let len = bytes.len() as u32;

        let direction = if self.name.starts_with(Direction::Send.name_prefix()) {
            Direction::Send
        } else {
            Direction::Receive
        };
        let record = PacketRecord::new(direction, 0, layout.name(), bytes, len);
        let mut draft = ResendDraft::from_record(&record)?.with_base_offset(self.offset);

        if let Some(base) = self.fix_base {
            let outcome = PacketFixEngine::builtin().apply_fix_raw(
                layout.name(),
                base,
                layout,
                draft.bytes_mut(),
                self.offset,
            )?;
            tracing::debug!(?outcome, base, "packet fix on draft");
        }

        for assignment in &self.sets {
            let (field, value) = assignment
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Expected FIELD=VALUE, got '{assignment}'"))?;
            draft.set_field(layout, field.trim(), value)?;
        }

        let output = PatchOutput {
            layout: layout.name(),
            modified: draft.is_modified(),
            hex: hex::encode_upper(draft.bytes()),
        };
        output_json_or(self.json, &output, || {
            println!("{}", output.hex);
            if !output.modified {
                eprintln!("(unchanged)");
            }
            Ok(())
        })
    }
}

#[derive(Serialize)]
struct PatchOutput<'a> {
    layout: &'a str,
    modified: bool,
    hex: String,
}
