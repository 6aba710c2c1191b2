// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Record filtering for session views.
//!
//! [`OpcodeFilter`] selects opcode names; [`PacketFilter`] combines it with
//! the direction toggles, the known-opcode switch and free-text search.

use std::fmt;
use std::sync::Arc;

use crate::core::{Direction, PacketRecord};

/// Filter on opcode names.
#[derive(Clone, Default)]
pub enum OpcodeFilter {
    /// Accept every name
    #[default]
    All,
    /// Accept only the listed names
    Include(Vec<String>),
    /// Reject the listed names
    Exclude(Vec<String>),
    /// Accept names matching a regex
    RegexInclude(Arc<regex::Regex>),
    /// Reject names matching a regex
    RegexExclude(Arc<regex::Regex>),
    /// Custom predicate
    Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl fmt::Debug for OpcodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.debug_tuple("All").finish(),
            Self::Include(v) => f.debug_tuple("Include").field(v).finish(),
            Self::Exclude(v) => f.debug_tuple("Exclude").field(v).finish(),
            Self::RegexInclude(re) => f.debug_tuple("RegexInclude").field(&re.as_str()).finish(),
            Self::RegexExclude(re) => f.debug_tuple("RegexExclude").field(&re.as_str()).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"<fn>").finish(),
        }
    }
}

impl OpcodeFilter {
    /// Check if an opcode name passes.
    pub fn should_include(&self, name: &str) -> bool {
        match self {
            OpcodeFilter::All => true,
            OpcodeFilter::Include(names) => names.iter().any(|n| n == name),
            OpcodeFilter::Exclude(names) => !names.iter().any(|n| n == name),
            OpcodeFilter::RegexInclude(re) => re.is_match(name),
            OpcodeFilter::RegexExclude(re) => !re.is_match(name),
            OpcodeFilter::Custom(f) => f(name),
        }
    }

    pub fn include(names: Vec<String>) -> Self {
        Self::Include(names)
    }

    pub fn exclude(names: Vec<String>) -> Self {
        Self::Exclude(names)
    }

    pub fn regex_include(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(|re| Self::RegexInclude(Arc::new(re)))
    }

    pub fn regex_exclude(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(|re| Self::RegexExclude(Arc::new(re)))
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}

/// View filter over a session's records.
#[derive(Debug, Clone)]
pub struct PacketFilter {
    pub show_send: bool,
    pub show_receive: bool,
    /// Hide records whose opcode did not resolve to a name
    pub only_known: bool,
    /// Case-insensitive match on the name or the 4-digit hex opcode
    pub text: String,
    pub names: OpcodeFilter,
}

impl Default for PacketFilter {
    fn default() -> Self {
        Self {
            show_send: true,
            show_receive: true,
            only_known: false,
            text: String::new(),
            names: OpcodeFilter::All,
        }
    }
}

impl PacketFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_names(mut self, names: OpcodeFilter) -> Self {
        self.names = names;
        self
    }

    pub fn only_known(mut self, only_known: bool) -> Self {
        self.only_known = only_known;
        self
    }

    /// Show only one direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.show_send = direction.is_send();
        self.show_receive = direction.is_receive();
        self
    }

    /// Check if a record passes every enabled criterion.
    pub fn matches(&self, record: &PacketRecord) -> bool {
        let direction_shown = match record.direction() {
            Direction::Send => self.show_send,
            Direction::Receive => self.show_receive,
        };
        if !direction_shown {
            return false;
        }
        if self.only_known && !record.is_known() {
            return false;
        }
        if !self.names.should_include(record.opcode_name()) {
            return false;
        }

        let needle = self.text.trim();
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        record.opcode_name().to_lowercase().contains(&needle)
            || format!("{:04x}", record.opcode()).contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UNKNOWN_OPCODE_NAME;

    fn record(direction: Direction, opcode: u16, name: &str) -> PacketRecord {
        PacketRecord::new(direction, opcode, name, Vec::new(), 0)
    }

    #[test]
    fn test_opcode_filter_include_exclude() {
        let include = OpcodeFilter::include(vec!["DOWN_Effect".into()]);
        assert!(include.should_include("DOWN_Effect"));
        assert!(!include.should_include("DOWN_ActorCast"));

        let exclude = OpcodeFilter::exclude(vec!["UP_PingReq".into()]);
        assert!(!exclude.should_include("UP_PingReq"));
        assert!(exclude.should_include("UP_ActionSend"));
    }

    #[test]
    fn test_opcode_filter_regex() {
        let filter = OpcodeFilter::regex_include("^DOWN_AoeEffect\\d+$").unwrap();
        assert!(filter.should_include("DOWN_AoeEffect16"));
        assert!(!filter.should_include("DOWN_Effect"));
        assert!(OpcodeFilter::regex_include("(").is_err());
    }

    #[test]
    fn test_direction_toggles() {
        let filter = PacketFilter::new().direction(Direction::Receive);
        assert!(filter.matches(&record(Direction::Receive, 1, "DOWN_Effect")));
        assert!(!filter.matches(&record(Direction::Send, 1, "UP_PingReq")));
    }

    #[test]
    fn test_only_known() {
        let filter = PacketFilter::new().only_known(true);
        assert!(!filter.matches(&record(Direction::Receive, 1, UNKNOWN_OPCODE_NAME)));
        assert!(filter.matches(&record(Direction::Receive, 1, "DOWN_Effect")));
    }

    #[test]
    fn test_text_matches_name_or_hex() {
        let rec = record(Direction::Receive, 0x01AB, "DOWN_ActorControl");
        assert!(PacketFilter::new().with_text("actorcontrol").matches(&rec));
        assert!(PacketFilter::new().with_text("01ab").matches(&rec));
        assert!(PacketFilter::new().with_text("1AB").matches(&rec));
        assert!(!PacketFilter::new().with_text("effect").matches(&rec));
        assert!(PacketFilter::new().with_text("   ").matches(&rec));
    }
}
