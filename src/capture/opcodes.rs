// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Opcode-name tables.
//!
//! The capture path only reads a table; an external loader builds a fresh one
//! and swaps it in whole with [`SharedOpcodeTable::replace`], so a capture
//! event sees either the old table or the new one, never a mix.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{Direction, UNKNOWN_OPCODE_NAME};

/// Errors raised while parsing an opcode table document.
#[derive(Debug, Error)]
pub enum OpcodeTableError {
    #[error("invalid opcode document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("opcode document has no entry for version '{0}'")]
    MissingVersion(String),
}

/// Resolved `opcode -> name` maps for both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcodeTable {
    up: HashMap<u16, String>,
    down: HashMap<u16, String>,
}

impl OpcodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "<version>": { "UP_Name": [opcodes], "DOWN_Name": [...] } }`
    /// and keep the entries of one version, split by name prefix.
    ///
    /// Opcodes outside the `u16` range and names without a direction prefix
    /// are skipped with a warning.
    pub fn from_versioned_json(doc: &str, version: &str) -> Result<Self, OpcodeTableError> {
        let mut versions: HashMap<String, HashMap<String, Vec<i64>>> = serde_json::from_str(doc)?;
        let entries = versions
            .remove(version)
            .ok_or_else(|| OpcodeTableError::MissingVersion(version.to_string()))?;

        let mut table = Self::new();
        for (name, opcodes) in entries {
            let direction = if name.starts_with(Direction::Send.name_prefix()) {
                Direction::Send
            } else if name.starts_with(Direction::Receive.name_prefix()) {
                Direction::Receive
            } else {
                warn!(name = %name, "opcode name has no direction prefix, skipped");
                continue;
            };

            for raw in opcodes {
                match u16::try_from(raw) {
                    Ok(opcode) => table.insert(direction, opcode, name.clone()),
                    Err(_) => warn!(name = %name, opcode = raw, "opcode outside u16 range, skipped"),
                }
            }
        }

        debug!(
            version,
            up = table.up.len(),
            down = table.down.len(),
            "opcode table parsed"
        );
        Ok(table)
    }

    fn map(&self, direction: Direction) -> &HashMap<u16, String> {
        match direction {
            Direction::Send => &self.up,
            Direction::Receive => &self.down,
        }
    }

    fn map_mut(&mut self, direction: Direction) -> &mut HashMap<u16, String> {
        match direction {
            Direction::Send => &mut self.up,
            Direction::Receive => &mut self.down,
        }
    }

    /// Set the name for an opcode, replacing any previous one.
    pub fn insert(&mut self, direction: Direction, opcode: u16, name: impl Into<String>) {
        self.map_mut(direction).insert(opcode, name.into());
    }

    /// Add a locally discovered opcode unless the table already names it.
    ///
    /// Returns `true` if the entry was added.
    pub fn insert_missing(&mut self, direction: Direction, opcode: u16, name: impl Into<String>) -> bool {
        let map = self.map_mut(direction);
        if map.contains_key(&opcode) {
            return false;
        }
        map.insert(opcode, name.into());
        true
    }

    /// Name for an opcode, if known.
    pub fn get(&self, direction: Direction, opcode: u16) -> Option<&str> {
        self.map(direction).get(&opcode).map(String::as_str)
    }

    /// Name for an opcode, or `"Unknown"`.
    pub fn resolve(&self, direction: Direction, opcode: u16) -> &str {
        self.get(direction, opcode).unwrap_or(UNKNOWN_OPCODE_NAME)
    }

    /// Number of entries for one direction.
    pub fn len(&self, direction: Direction) -> usize {
        self.map(direction).len()
    }

    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }
}

/// Opcode table shared between the capture context and an external loader.
#[derive(Debug, Clone, Default)]
pub struct SharedOpcodeTable {
    inner: Arc<RwLock<Arc<OpcodeTable>>>,
}

impl SharedOpcodeTable {
    pub fn new(table: OpcodeTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// Current table. The read lock is held only long enough to clone the `Arc`.
    pub fn snapshot(&self) -> Arc<OpcodeTable> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a whole new table.
    pub fn replace(&self, table: OpcodeTable) {
        let up = table.len(Direction::Send);
        let down = table.len(Direction::Receive);
        let table = Arc::new(table);
        match self.inner.write() {
            Ok(mut guard) => *guard = table,
            Err(poisoned) => *poisoned.into_inner() = table,
        }
        debug!(up, down, "opcode table replaced");
    }
}
