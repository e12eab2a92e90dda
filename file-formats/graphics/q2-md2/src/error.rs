//! Error types for MD2 parsing, animation playback and writing

use std::io;
use thiserror::Error;

/// Errors produced while decoding an MD2 byte buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The identifier field is not `IDP2`
    #[error("Invalid magic value: expected 'IDP2', found '{}'", String::from_utf8_lossy(.found))]
    BadMagic {
        /// The four bytes found at the start of the buffer
        found: [u8; 4],
    },

    /// The version field is not the one supported version
    #[error("Unsupported MD2 version: {0} (expected 8)")]
    UnsupportedVersion(i32),

    /// A read would run past the end of the buffer
    #[error(
        "Truncated {section}: need {needed} bytes at offset {offset}, buffer holds {available}"
    )]
    Truncated {
        /// Section being read
        section: &'static str,
        /// Offset of the failed read
        offset: usize,
        /// Number of bytes the read needed
        needed: usize,
        /// Total length of the buffer
        available: usize,
    },

    /// An index stored in the file points outside its target table
    #[error("Index {index} out of range in {section} (limit {limit})")]
    IndexOutOfRange {
        /// Section holding the bad index
        section: &'static str,
        /// The offending index, as stored
        index: i64,
        /// Exclusive upper bound for the index
        limit: usize,
    },

    /// A count or size disagrees with what the header declares
    #[error("Section {section} mismatch: header implies {expected}, found {actual}")]
    SectionCountMismatch {
        /// Section whose size disagrees
        section: &'static str,
        /// Value implied by the header
        expected: usize,
        /// Value actually found
        actual: usize,
    },

    /// A header count or offset is negative
    #[error("Header field {field} is negative: {value}")]
    NegativeField {
        /// Header field name
        field: &'static str,
        /// Raw value read from the file
        value: i32,
    },
}

/// Errors produced by the animation state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimError {
    /// No animation with this name is attached to the model
    #[error("Unknown animation: {0}")]
    UnknownAnimation(String),
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Md2Error {
    /// Malformed input buffer
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Animation request failed
    #[error(transparent)]
    Anim(#[from] AnimError),

    /// I/O error while encoding
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type using `Md2Error`
pub type Result<T> = std::result::Result<T, Md2Error>;
