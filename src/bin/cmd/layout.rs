// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Layout command - browse the built-in layout catalogue.

use clap::Subcommand;
use serde::Serialize;

use crate::common::{output_json_or, Result};
use pktcodec::core::{Direction, LayoutRegistry};

/// Layout catalogue operations.
#[derive(Subcommand, Clone, Debug)]
pub enum LayoutCmd {
    /// List registered layouts
    List {
        /// Only layouts of one direction (send/up or receive/down)
        #[arg(short, long)]
        direction: Option<Direction>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the fields of one layout
    Show {
        /// Opcode name, e.g. DOWN_ActorControl
        #[arg(value_name = "NAME")]
        name: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

impl LayoutCmd {
    pub fn run(self) -> Result<()> {
        match self {
            LayoutCmd::List { direction, json } => cmd_list(direction, json),
            LayoutCmd::Show { name, json } => cmd_show(&name, json),
        }
    }
}

fn cmd_list(direction: Option<Direction>, json: bool) -> Result<()> {
    let registry = LayoutRegistry::builtin();
    let items: Vec<LayoutSummary> = registry
        .iter()
        .filter(|l| direction.map_or(true, |d| l.name().starts_with(d.name_prefix())))
        .map(|l| LayoutSummary {
            name: l.name().to_string(),
            size: l.total_size(),
            fields: l.field_count(),
        })
        .collect();

    output_json_or(json, &items, || {
        for item in &items {
            println!("{:<28} size=0x{:03X} fields={}", item.name, item.size, item.fields);
        }
        println!();
        println!("{} layouts", items.len());
        Ok(())
    })
}

fn cmd_show(name: &str, json: bool) -> Result<()> {
    let registry = LayoutRegistry::builtin();
    let layout = registry
        .lookup(name)
        .ok_or_else(|| anyhow::anyhow!("No layout registered for '{name}'"))?;

    let fields: Vec<FieldRow> = layout
        .fields()
        .iter()
        .map(|f| FieldRow {
            name: f.name.clone(),
            offset: f.offset,
            kind: f.kind.type_label(),
        })
        .collect();

    output_json_or(json, &fields, || {
        println!("=== {} (0x{:X} bytes) ===", layout.name(), layout.total_size());
        for field in &fields {
            println!("  +0x{:04X}  {:<24} {}", field.offset, field.name, field.kind);
        }
        Ok(())
    })
}

// Output types

#[derive(Serialize)]
struct LayoutSummary {
    name: String,
    size: u32,
    fields: usize,
}

#[derive(Serialize)]
struct FieldRow {
    name: String,
    offset: u32,
    kind: String,
}
