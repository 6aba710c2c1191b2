// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! TOML configuration (strict parsing).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{CodecError, Result};
use crate::io::PacketFilter;
use crate::session::{SessionStore, DEFAULT_DRAIN_BATCH, DEFAULT_MAX_PER_SESSION};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PktConfig {
    #[serde(default = "default_true")]
    pub capture_enabled: bool,

    #[serde(default = "default_max_packets_per_session")]
    pub max_packets_per_session: usize,

    #[serde(default = "default_drain_batch")]
    pub drain_batch: usize,

    /// Runtime base added by packet fixes
    #[serde(default)]
    pub base_value: u32,

    #[serde(default)]
    pub opcodes: OpcodeSection,

    #[serde(default)]
    pub filter: FilterSection,
}

impl Default for PktConfig {
    fn default() -> Self {
        Self {
            capture_enabled: true,
            max_packets_per_session: default_max_packets_per_session(),
            drain_batch: default_drain_batch(),
            base_value: 0,
            opcodes: OpcodeSection::default(),
            filter: FilterSection::default(),
        }
    }
}

impl PktConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_packets_per_session == 0 {
            return Err(CodecError::parse(
                "config",
                "max_packets_per_session must be at least 1",
            ));
        }
        if self.drain_batch == 0 {
            return Err(CodecError::parse("config", "drain_batch must be at least 1"));
        }
        self.opcodes.validate()
    }

    /// Session store sized by this config.
    pub fn session_store(&self) -> SessionStore {
        SessionStore::with_limits(self.max_packets_per_session, self.drain_batch)
    }
}

/// Where the opcode table document lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpcodeSection {
    pub path: Option<PathBuf>,
    /// Game version key inside the document
    pub version: Option<String>,
}

impl OpcodeSection {
    fn validate(&self) -> Result<()> {
        if self.path.is_some() && self.version.as_deref().map_or(true, str::is_empty) {
            return Err(CodecError::parse(
                "config",
                "opcodes.version is required when opcodes.path is set",
            ));
        }
        Ok(())
    }
}

/// Initial view filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    #[serde(default = "default_true")]
    pub show_send: bool,

    #[serde(default = "default_true")]
    pub show_receive: bool,

    #[serde(default)]
    pub only_known: bool,

    #[serde(default)]
    pub text: String,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            show_send: true,
            show_receive: true,
            only_known: false,
            text: String::new(),
        }
    }
}

impl FilterSection {
    pub fn to_filter(&self) -> PacketFilter {
        PacketFilter {
            show_send: self.show_send,
            show_receive: self.show_receive,
            only_known: self.only_known,
            text: self.text.clone(),
            ..PacketFilter::default()
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_max_packets_per_session() -> usize {
    DEFAULT_MAX_PER_SESSION
}
fn default_drain_batch() -> usize {
    DEFAULT_DRAIN_BATCH
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<PktConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| CodecError::parse(path.display().to_string(), format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PktConfig> {
    let cfg: PktConfig =
        toml::from_str(s).map_err(|e| CodecError::parse("config", format!("invalid toml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = load_from_str("").unwrap();
        assert_eq!(cfg, PktConfig::default());
        assert_eq!(cfg.max_packets_per_session, 5000);
        assert_eq!(cfg.drain_batch, 100);
        assert!(cfg.capture_enabled);
    }

    #[test]
    fn test_full_config() {
        let cfg = load_from_str(
            r#"
capture_enabled = false
max_packets_per_session = 200
base_value = 268435456

[opcodes]
path = "opcodes.json"
version = "7.1"

[filter]
show_send = false
only_known = true
text = "Effect"
"#,
        )
        .unwrap();
        assert!(!cfg.capture_enabled);
        assert_eq!(cfg.base_value, 0x1000_0000);
        assert_eq!(cfg.opcodes.version.as_deref(), Some("7.1"));

        let filter = cfg.filter.to_filter();
        assert!(!filter.show_send);
        assert!(filter.show_receive);
        assert!(filter.only_known);
        assert_eq!(cfg.session_store().max_per_session(), 200);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(load_from_str("max_packets = 10").is_err());
        assert!(load_from_str("[filter]\nshow_up = true").is_err());
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            load_from_str("max_packets_per_session = 0"),
            Err(CodecError::ParseError { .. })
        ));
        assert!(load_from_str("drain_batch = 0").is_err());
        assert!(load_from_str("[opcodes]\npath = \"x.json\"").is_err());
    }
}
