//! # Meter Decoding Error Handling
//!
//! This module defines the MeterError enum, which represents the different error
//! types that can occur while decoding smart meter push frames.
//!
//! Frame-level errors (`FrameLength`, `FrameFormat`, `KeyLength`,
//! `Authentication`) reject the whole frame. Field-level errors (`UnknownTag`,
//! `Truncated`, `RegisterNotFound`, `DateTime`) only downgrade the affected
//! register or timestamp to absent; the rest of the reading survives.

use crate::payload::register::ObisCode;
use thiserror::Error;

/// Represents the different error types that can occur in the decoding pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeterError {
    /// The wrapper frame does not have the fixed broadcast length.
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    FrameLength { expected: usize, actual: usize },

    /// The wrapper frame failed a structural check (start/stop marker).
    #[error("Invalid frame format: {0}")]
    FrameFormat(&'static str),

    /// The decryption key does not match the cipher's key size.
    #[error("Invalid key length: expected {expected}, got {actual}")]
    KeyLength { expected: usize, actual: usize },

    /// Authenticated decryption failed (tag mismatch or malformed ciphertext).
    #[error("Payload authentication failed")]
    Authentication,

    /// An unknown type tag was encountered while decoding a primitive value.
    #[error("Unknown value tag: 0x{0:02X}")]
    UnknownTag(u8),

    /// A primitive value ran past the end of the payload.
    #[error("Truncated value at offset {0}")]
    Truncated(usize),

    /// The requested OBIS code does not occur in the decrypted payload.
    #[error("Register not found: {0}")]
    RegisterNotFound(ObisCode),

    /// The embedded COSEM date-time could not be decoded.
    #[error("Invalid date-time: {0}")]
    DateTime(String),

    /// Indicates an invalid hexadecimal string was provided.
    #[error("Invalid hexadecimal string")]
    InvalidHexString,
}

impl MeterError {
    /// Whether this error rejects the whole frame, as opposed to downgrading
    /// a single field of the reading.
    pub fn is_frame_fatal(&self) -> bool {
        matches!(
            self,
            MeterError::FrameLength { .. }
                | MeterError::FrameFormat(_)
                | MeterError::KeyLength { .. }
                | MeterError::Authentication
        )
    }
}
