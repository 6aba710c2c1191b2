// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::Path;

use serde::Serialize;

use pktcodec::capture::OpcodeTable;
use pktcodec::core::{DecodedMessage, DecodedValue};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Install the stderr log subscriber, filtered by `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Print `value` as pretty JSON, or run the human-readable printer.
pub fn output_json_or<T>(json: bool, value: &T, human_fn: impl FnOnce() -> Result<()>) -> Result<()>
where
    T: Serialize,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human_fn()?;
    }
    Ok(())
}

/// Parse bytes written as contiguous hex, spaced hex or a byte literal.
///
/// Accepts `"0100ff"`, `"01 00 FF"` and `"[0x01, 0x00, 0xFF]"`.
pub fn parse_hex_bytes(s: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split([',', ' ', '\t'])
        .filter(|t| !t.is_empty())
        .map(|t| t.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();
    hex::decode(&cleaned).map_err(|e| anyhow::anyhow!("Invalid hex bytes: {e}"))
}

/// Parse a `u32` written in decimal or `0x` hex.
pub fn parse_u32(s: &str) -> CliResult<u32> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| anyhow::anyhow!("Invalid number '{s}': {e}"))
}

/// Print decoded fields one per line, expanding nested records.
pub fn print_fields(msg: &DecodedMessage, indent: usize) {
    let pad = " ".repeat(indent);
    for field in msg.iter() {
        println!("{pad}+0x{:04X}  {:<24} {}", field.offset, field.name, field.value);
        if let DecodedValue::Records(records) = &field.value {
            for (i, record) in records.iter().enumerate() {
                println!("{pad}  [{i}]");
                print_fields(record, indent + 4);
            }
        }
    }
}

/// Load one version of a versioned opcode document.
pub fn load_opcode_table(path: &Path, version: &str) -> Result<OpcodeTable> {
    let doc = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    Ok(OpcodeTable::from_versioned_json(&doc, version)?)
}
