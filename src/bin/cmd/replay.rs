// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Replay command - feed a frame dump through capture, sessions and inspection.
//!
//! The dump is plain text, one frame per line:
//!
//! ```text
//! # direction  frame-hex                      [priority|target-id]
//! send         0100000000000000100000000000...  3
//! recv         00000000000000000000000000...    0x10000001
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Serialize;

use crate::common::{
    load_opcode_table, output_json_or, parse_hex_bytes, parse_u32, print_fields, Result,
};
use pktcodec::capture::{
    CaptureMeta, CapturePipeline, CaptureQueue, CaptureStatsSnapshot, OpcodeTable,
    SharedOpcodeTable,
};
use pktcodec::config::{self, PktConfig};
use pktcodec::core::{Direction, LayoutRegistry, PacketRecord};
use pktcodec::encoding::{Inspection, Inspector, PacketFixEngine};
use pktcodec::io::OpcodeFilter;
use pktcodec::session::SessionStore;

/// Replay a frame dump.
#[derive(Args, Clone, Debug)]
pub struct ReplayCmd {
    /// Frame dump file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Versioned opcode JSON document (overrides the config)
    #[arg(long)]
    opcodes: Option<PathBuf>,

    /// Game version key inside the opcode document
    #[arg(long)]
    game_version: Option<String>,

    /// Case-insensitive match on opcode name or 4-digit hex opcode
    #[arg(short, long)]
    text: Option<String>,

    /// Regex on opcode names
    #[arg(long)]
    name_regex: Option<String>,

    /// Hide opcodes missing from the table
    #[arg(long)]
    only_known: bool,

    /// Show only one direction
    #[arg(short, long)]
    direction: Option<Direction>,

    /// Runtime base for packet fixes (overrides the config)
    #[arg(long, value_parser = parse_u32)]
    base_value: Option<u32>,

    /// Decode every shown record
    #[arg(long)]
    decode: bool,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

impl ReplayCmd {
    pub fn run(self) -> Result<()> {
        let cfg = match &self.config {
            Some(path) => config::load_from_file(path)?,
            None => PktConfig::default(),
        };

        let table = self.opcode_table(&cfg)?;
        let registry = Arc::clone(LayoutRegistry::builtin());
        let pipeline = CapturePipeline::new(
            registry.clone(),
            SharedOpcodeTable::new(table),
            CaptureQueue::new(),
        );
        let mut store = cfg.session_store();

        let text = std::fs::read_to_string(&self.input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", self.input.display()))?;
        let mut frames = 0usize;
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (direction, frame, meta) = parse_frame_line(line)
                .map_err(|e| anyhow::anyhow!("{}:{}: {e}", self.input.display(), line_no + 1))?;
            pipeline.on_capture(direction, &frame, meta, cfg.capture_enabled);
            frames += 1;

            if pipeline.queue().len() >= store.drain_batch() {
                store.drain(pipeline.queue());
            }
        }
        drain_all(&mut store, pipeline.queue());
        tracing::debug!(frames, stats = ?pipeline.stats(), "replay captured");

        let mut filter = cfg.filter.to_filter();
        if let Some(text) = &self.text {
            filter.text = text.clone();
        }
        if let Some(direction) = self.direction {
            filter = filter.direction(direction);
        }
        if self.only_known {
            filter.only_known = true;
        }
        if let Some(pattern) = &self.name_regex {
            filter.names = OpcodeFilter::regex_include(pattern)?;
        }

        let base_value = self.base_value.unwrap_or(cfg.base_value);
        let inspector = Inspector::new(registry, PacketFixEngine::builtin());
        let session = store.active();
        let mut rows = Vec::new();
        for record in store.filtered(session.id(), &filter)? {
            let inspection = if self.decode {
                Some(inspector.inspect(record, base_value)?)
            } else {
                None
            };
            rows.push(ReplayRow { record, inspection });
        }

        let output = ReplayOutput {
            frames,
            stats: pipeline.stats(),
            session: session.display_name(),
            shown: rows.len(),
            records: rows,
        };
        output_json_or(self.json, &output, || {
            println!("=== {} ===", output.session);
            for row in &output.records {
                print_row(row);
            }
            println!();
            println!(
                "{} frames, {} queued, {} dropped, {} shown",
                output.frames,
                output.stats.queued,
                output.stats.dropped_full + output.stats.dropped_malformed,
                output.shown
            );
            Ok(())
        })
    }

    fn opcode_table(&self, cfg: &PktConfig) -> Result<OpcodeTable> {
        let path = self.opcodes.as_ref().or(cfg.opcodes.path.as_ref());
        let version = self.game_version.as_ref().or(cfg.opcodes.version.as_ref());
        match (path, version) {
            (Some(path), Some(version)) => load_opcode_table(path, version),
            (Some(_), None) => Err(anyhow::anyhow!("--game-version is required with --opcodes")),
            (None, _) => Ok(OpcodeTable::new()),
        }
    }
}

fn drain_all(store: &mut SessionStore, queue: &CaptureQueue) {
    while !queue.is_empty() {
        if store.drain(queue).drained == 0 {
            break;
        }
    }
}

fn parse_frame_line(line: &str) -> Result<(Direction, Vec<u8>, CaptureMeta)> {
    let mut parts = line.split_whitespace();
    let direction: Direction = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing direction"))?
        .parse()?;
    let frame = parse_hex_bytes(parts.next().ok_or_else(|| anyhow::anyhow!("missing frame"))?)?;
    let extra = parts.next().map(parse_u32).transpose()?.unwrap_or(0);

    let meta = match direction {
        Direction::Send => CaptureMeta::Send {
            priority: u16::try_from(extra)
                .map_err(|_| anyhow::anyhow!("priority {extra} does not fit in u16"))?,
        },
        Direction::Receive => CaptureMeta::Receive { target_id: extra },
    };
    Ok((direction, frame, meta))
}

fn print_row(row: &ReplayRow<'_>) {
    let record = row.record;
    let marker = if record.is_truncated() { " (truncated)" } else { "" };
    println!(
        "{} {} 0x{:04X} {:<28} {} bytes{}",
        record.time_string(),
        record.direction_label(),
        record.opcode(),
        record.opcode_name(),
        record.raw_bytes().len(),
        marker
    );
    match &row.inspection {
        Some(Inspection::Decoded { fields, .. }) => print_fields(fields, 4),
        Some(Inspection::Opaque { hex_dump }) => {
            for line in hex_dump.lines() {
                println!("    {line}");
            }
        }
        None => {}
    }
}

#[derive(Serialize)]
struct ReplayOutput<'a> {
    frames: usize,
    stats: CaptureStatsSnapshot,
    session: String,
    shown: usize,
    records: Vec<ReplayRow<'a>>,
}

#[derive(Serialize)]
struct ReplayRow<'a> {
    record: &'a PacketRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    inspection: Option<Inspection>,
}
