//! Error handling module
//!
//! Defines custom error types for the world object core. Encoding and
//! inventory operations degrade silently; errors only surface from strict
//! validation and configuration.

use std::io;

use thiserror::Error;

/// Main error type for the world object core
#[derive(Error, Debug)]
pub enum WorldError {
    /// Protocol-related errors
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The receiving side of a session went away
    #[error("Session {0} closed")]
    ConnectionClosed(u64),
}

/// Protocol-specific errors raised by strict object validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Header flags set for unpopulated fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    #[error("String field {field} is {len} bytes (max: {max})")]
    StringTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Result type alias for world operations
pub type Result<T> = std::result::Result<T, WorldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::MissingFields {
            fields: vec!["value", "burden"],
        };
        assert_eq!(
            err.to_string(),
            "Header flags set for unpopulated fields: value, burden"
        );

        let err = ProtocolError::StringTooLong {
            field: "name",
            len: 70000,
            max: 65535,
        };
        assert_eq!(err.to_string(), "String field name is 70000 bytes (max: 65535)");
    }

    #[test]
    fn test_protocol_error_conversion() {
        let err: WorldError = ProtocolError::MissingFields { fields: vec![] }.into();
        assert!(matches!(err, WorldError::Protocol(_)));
    }
}
