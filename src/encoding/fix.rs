// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Opcode-specific packet fixes.
//!
//! Some downstream messages carry identifiers relative to a per-session base.
//! A fix rule adds that base to one `u32` field, optionally only when a
//! discriminant field holds a given value. Callers apply the engine exactly
//! once per record; applying it twice adds the base twice.

use std::collections::HashMap;

use serde::Serialize;
use tracing::trace;

use crate::core::{CodecError, DecodedMessage, DecodedValue, Result};
use crate::schema::builtin::enums::ACTOR_CONTROL_SET_LOCK_ON;
use crate::schema::{FieldKind, LayoutDescriptor, ScalarKind};

use super::cursor::{ByteCursor, ByteCursorMut};
use super::patch::field_offset;

/// Result of looking up and applying a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixOutcome {
    /// The target field was rewritten
    Applied,
    /// No rule is registered for the opcode
    NoRule,
    /// A rule exists but its discriminant did not match, or the target was unreadable
    NotApplicable,
}

impl FixOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FixOutcome::Applied)
    }
}

/// "Add the base to `target`", optionally gated on `when = (field, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixRule {
    target: String,
    when: Option<(String, u64)>,
}

impl FixRule {
    /// Unconditionally add the base to `target`.
    pub fn add_base(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            when: None,
        }
    }

    /// Only apply when `field` decodes to `value`.
    pub fn when(mut self, field: impl Into<String>, value: u64) -> Self {
        self.when = Some((field.into(), value));
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn discriminant(&self) -> Option<(&str, u64)> {
        self.when.as_ref().map(|(f, v)| (f.as_str(), *v))
    }
}

/// Rule table keyed by opcode name.
#[derive(Debug, Clone, Default)]
pub struct PacketFixEngine {
    rules: HashMap<String, FixRule>,
}

impl PacketFixEngine {
    /// Create an engine with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the built-in rules.
    pub fn builtin() -> Self {
        let engine = Self::new().with_rule(
            "DOWN_ActorControl",
            FixRule::add_base("Arg0").when("Id", ACTOR_CONTROL_SET_LOCK_ON as u64),
        );
        [
            "DOWN_Effect",
            "DOWN_AoeEffect8",
            "DOWN_AoeEffect16",
            "DOWN_AoeEffect24",
            "DOWN_AoeEffect32",
            "DOWN_ActorCast",
        ]
        .into_iter()
        .fold(engine, |engine, name| {
            engine.with_rule(name, FixRule::add_base("RealActionId"))
        })
    }

    /// Register a rule, replacing any previous rule for the opcode.
    pub fn with_rule(mut self, opcode_name: impl Into<String>, rule: FixRule) -> Self {
        self.rules.insert(opcode_name.into(), rule);
        self
    }

    /// Rule registered for an opcode name.
    pub fn rule(&self, opcode_name: &str) -> Option<&FixRule> {
        self.rules.get(opcode_name)
    }

    /// Apply the opcode's rule to decoded fields.
    pub fn apply_fix(&self, opcode_name: &str, base_value: u32, fields: &mut DecodedMessage) -> FixOutcome {
        let Some(rule) = self.rules.get(opcode_name) else {
            return FixOutcome::NoRule;
        };

        if let Some((field, expected)) = rule.discriminant() {
            if fields.get(field).and_then(DecodedValue::as_u64) != Some(expected) {
                return FixOutcome::NotApplicable;
            }
        }

        match fields.get_mut(rule.target()) {
            Some(DecodedValue::U32(value)) => {
                *value = value.wrapping_add(base_value);
                trace!(opcode = opcode_name, field = rule.target(), "packet fix applied");
                FixOutcome::Applied
            }
            _ => FixOutcome::NotApplicable,
        }
    }

    /// Apply the opcode's rule directly to raw bytes.
    ///
    /// Offsets are resolved through `layout` relative to `base_offset`, so the
    /// same rule can patch a buffer destined for the resend path.
    pub fn apply_fix_raw(
        &self,
        opcode_name: &str,
        base_value: u32,
        layout: &LayoutDescriptor,
        bytes: &mut [u8],
        base_offset: usize,
    ) -> Result<FixOutcome> {
        let Some(rule) = self.rules.get(opcode_name) else {
            return Ok(FixOutcome::NoRule);
        };

        if let Some((field, expected)) = rule.discriminant() {
            let descriptor = layout
                .field(field)
                .ok_or_else(|| CodecError::field_not_found(layout.name(), field))?;
            let at = field_offset(layout, field, base_offset)?;
            let cursor = ByteCursor::new(bytes);
            let actual = match &descriptor.kind {
                FieldKind::Scalar(kind) => cursor.read_scalar(*kind, at).ok().and_then(|v| v.as_u64()),
                FieldKind::EnumU16(_) => cursor.read_u16(at).ok().map(u64::from),
                FieldKind::EnumU32(_) => cursor.read_u32(at).ok().map(u64::from),
                _ => None,
            };
            if actual != Some(expected) {
                return Ok(FixOutcome::NotApplicable);
            }
        }

        let target = layout
            .field(rule.target())
            .ok_or_else(|| CodecError::field_not_found(layout.name(), rule.target()))?;
        if target.kind != FieldKind::Scalar(ScalarKind::U32) {
            return Ok(FixOutcome::NotApplicable);
        }

        let at = field_offset(layout, rule.target(), base_offset)?;
        let mut writer = ByteCursorMut::new(bytes);
        let value = writer.read_u32(at)?;
        writer.write_unsigned(ScalarKind::U32, at, value.wrapping_add(base_value) as u64)?;
        Ok(FixOutcome::Applied)
    }
}
