// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # pktcodec CLI
//!
//! Offline front-end for the packet decoding engine.
//!
//! ## Usage
//!
//! ```sh
//! # List built-in layouts
//! pktcodec layout list --direction down
//!
//! # Show one layout's fields
//! pktcodec layout show DOWN_ActorControl
//!
//! # Decode captured bytes (0x20-byte header included)
//! pktcodec decode DOWN_Effect 0000...
//!
//! # Edit a send packet for resending
//! pktcodec patch UP_ActionSend 0000... --set action_id=0x1D0C
//!
//! # Replay a frame dump through capture and sessions
//! pktcodec replay frames.txt --opcodes opcodes.json --game-version 7.1 --decode
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{DecodeCmd, LayoutCmd, PatchCmd, ReplayCmd};
use common::Result;

/// pktcodec - opcode packet decoding toolkit
#[derive(Parser, Clone)]
#[command(name = "pktcodec")]
#[command(about = "Decode, patch and replay captured opcode packets", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Browse built-in layouts (list, show)
    #[command(subcommand)]
    Layout(LayoutCmd),

    /// Decode bytes through a layout
    Decode(DecodeCmd),

    /// Edit fields of a send packet
    Patch(PatchCmd),

    /// Replay a frame dump
    Replay(ReplayCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Layout(cmd) => cmd.run(),
        Commands::Decode(cmd) => cmd.run(),
        Commands::Patch(cmd) => cmd.run(),
        Commands::Replay(cmd) => cmd.run(),
    }
}

fn main() {
    common::init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
