// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for pktcodec.
//!
//! [`CodecError`] covers hard failures: caller misuse (index past a nested
//! record count, closing the last session), missing layouts or fields, and
//! unparsable input on the resend path.
//!
//! Per-field decode problems are *not* errors at this level. They are carried
//! as [`DecodeError`] values inside the decoded output so one bad field never
//! aborts the rest of a record.

use std::fmt;

/// Errors that can occur while decoding, patching or managing sessions.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Nested record accessed at an index past its runtime count
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of valid records
        count: usize,
    },

    /// No layout registered for an opcode name
    UnregisteredLayout {
        /// Opcode name that was looked up
        name: String,
    },

    /// Field name not present in a layout
    FieldNotFound {
        /// Layout name
        layout: String,
        /// Field name that was not found
        field: String,
    },

    /// Buffer too short for requested read or write
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Absolute offset of the access
        offset: usize,
    },

    /// Layout descriptor is malformed
    InvalidLayout {
        /// Layout name
        layout: String,
        /// What is wrong with it
        reason: String,
    },

    /// Parse error in user-supplied text or documents
    ParseError {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Only upstream records can be handed back to the send path
    NotResendable {
        /// Direction of the rejected record
        direction: String,
    },

    /// Session id not known to the store
    SessionNotFound {
        /// Session id
        id: i64,
    },

    /// The sole remaining session can never be closed
    LastSession,

    /// Unsupported type or feature
    Unsupported {
        /// What is not supported
        feature: String,
    },

    /// Other error
    Other(String),
}

impl CodecError {
    /// Create an index out of range error.
    pub fn index_out_of_range(index: usize, count: usize) -> Self {
        CodecError::IndexOutOfRange { index, count }
    }

    /// Create an unregistered layout error.
    pub fn unregistered_layout(name: impl Into<String>) -> Self {
        CodecError::UnregisteredLayout { name: name.into() }
    }

    /// Create a "field not found" error.
    pub fn field_not_found(layout: impl Into<String>, field: impl Into<String>) -> Self {
        CodecError::FieldNotFound {
            layout: layout.into(),
            field: field.into(),
        }
    }

    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, offset: usize) -> Self {
        CodecError::BufferTooShort {
            requested,
            available,
            offset,
        }
    }

    /// Create an invalid layout error.
    pub fn invalid_layout(layout: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidLayout {
            layout: layout.into(),
            reason: reason.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::ParseError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a not-resendable error.
    pub fn not_resendable(direction: impl Into<String>) -> Self {
        CodecError::NotResendable {
            direction: direction.into(),
        }
    }

    /// Create a session not found error.
    pub fn session_not_found(id: i64) -> Self {
        CodecError::SessionNotFound { id }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        CodecError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::IndexOutOfRange { index, count } => {
                vec![("index", index.to_string()), ("count", count.to_string())]
            }
            CodecError::UnregisteredLayout { name } => vec![("layout", name.clone())],
            CodecError::FieldNotFound { layout, field } => {
                vec![("layout", layout.clone()), ("field", field.clone())]
            }
            CodecError::BufferTooShort {
                requested,
                available,
                offset,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("offset", offset.to_string()),
            ],
            CodecError::InvalidLayout { layout, reason } => {
                vec![("layout", layout.clone()), ("reason", reason.clone())]
            }
            CodecError::ParseError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::NotResendable { direction } => vec![("direction", direction.clone())],
            CodecError::SessionNotFound { id } => vec![("session", id.to_string())],
            CodecError::LastSession => Vec::new(),
            CodecError::Unsupported { feature } => vec![("feature", feature.clone())],
            CodecError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::IndexOutOfRange { index, count } => {
                write!(f, "Index {index} out of range: only {count} records are valid")
            }
            CodecError::UnregisteredLayout { name } => {
                write!(f, "No layout registered for '{name}'")
            }
            CodecError::FieldNotFound { layout, field } => {
                write!(f, "Field '{field}' not found in layout '{layout}'")
            }
            CodecError::BufferTooShort {
                requested,
                available,
                offset,
            } => write!(
                f,
                "Buffer too short: requested {requested} bytes at offset {offset}, but only {available} bytes available"
            ),
            CodecError::InvalidLayout { layout, reason } => {
                write!(f, "Invalid layout '{layout}': {reason}")
            }
            CodecError::ParseError { context, message } => {
                write!(f, "Parse error in {context}: {message}")
            }
            CodecError::NotResendable { direction } => {
                write!(f, "Records with direction '{direction}' cannot be resent")
            }
            CodecError::SessionNotFound { id } => write!(f, "Session {id} not found"),
            CodecError::LastSession => write!(f, "The last remaining session cannot be closed"),
            CodecError::Unsupported { feature } => {
                write!(f, "Unsupported feature: '{feature}'")
            }
            CodecError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Result type for pktcodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Per-field soft failure recorded in place of a decoded value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
pub enum DecodeError {
    /// Field window lies past the captured bytes
    #[error("out of range: {width} bytes at offset {offset}, {available} captured")]
    OutOfRange {
        offset: usize,
        width: usize,
        available: usize,
    },

    /// Array needs more bytes than were captured
    #[error("insufficient data: {required} bytes required, {available} available")]
    InsufficientData { required: usize, available: usize },

    /// Count field is not an earlier sibling of the array
    #[error("unknown count field '{0}'")]
    UnknownField(String),

    /// Count field exists but could not be decoded itself
    #[error("count field '{0}' has no value")]
    CountUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_error() {
        let err = CodecError::index_out_of_range(3, 2);
        assert!(matches!(err, CodecError::IndexOutOfRange { .. }));
        assert_eq!(
            err.to_string(),
            "Index 3 out of range: only 2 records are valid"
        );
    }

    #[test]
    fn test_field_not_found_error() {
        let err = CodecError::field_not_found("DOWN_ActorControl", "Arg9");
        assert_eq!(
            err.to_string(),
            "Field 'Arg9' not found in layout 'DOWN_ActorControl'"
        );
    }

    #[test]
    fn test_buffer_too_short_error() {
        let err = CodecError::buffer_too_short(4, 2, 0x24);
        assert_eq!(
            err.to_string(),
            "Buffer too short: requested 4 bytes at offset 36, but only 2 bytes available"
        );
    }

    #[test]
    fn test_last_session_error() {
        assert_eq!(
            CodecError::LastSession.to_string(),
            "The last remaining session cannot be closed"
        );
        assert!(CodecError::LastSession.log_fields().is_empty());
    }

    #[test]
    fn test_log_fields_buffer_too_short() {
        let fields = CodecError::buffer_too_short(100, 50, 10).log_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], ("requested", "100".to_string()));
        assert_eq!(fields[1], ("available", "50".to_string()));
        assert_eq!(fields[2], ("offset", "10".to_string()));
    }

    #[test]
    fn test_log_fields_invalid_layout() {
        let fields = CodecError::invalid_layout("DOWN_Effect", "too deep").log_fields();
        assert_eq!(fields[0], ("layout", "DOWN_Effect".to_string()));
        assert_eq!(fields[1], ("reason", "too deep".to_string()));
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::OutOfRange {
            offset: 0x24,
            width: 4,
            available: 0x20,
        };
        assert_eq!(err.to_string(), "out of range: 4 bytes at offset 36, 32 captured");
        assert_eq!(
            DecodeError::UnknownField("arg_cnt".into()).to_string(),
            "unknown count field 'arg_cnt'"
        );
    }
}
