//! # Primitive Value Decoder
//!
//! Decodes one tag-prefixed COSEM scalar from the decrypted payload. The tag
//! byte selects the width and signedness; the payload bytes are big-endian.
//!
//! | tag  | type              | width |
//! |------|-------------------|-------|
//! | 0x06 | double-long-unsigned (u32) | 4 |
//! | 0x12 | long-unsigned (u16)        | 2 |
//! | 0x10 | long (i16)                 | 2 |
//! | 0x0F | integer (i8)               | 1 |
//! | 0x16 | enum (u8)                  | 1 |

use crate::error::MeterError;

/// One decoded scalar with the number of payload bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedValue {
    /// The raw type tag.
    pub tag: u8,
    /// Decoded value, sign-extended into 64 bits.
    pub value: i64,
    /// Bytes consumed including the tag.
    pub consumed: usize,
}

/// Decodes the typed scalar starting at `offset`.
///
/// Offsets and `consumed` are raw byte counts. An unknown tag or a value
/// running past the end of the buffer is field-local: the caller downgrades
/// the affected register, never the whole reading.
pub fn decode_value(buf: &[u8], offset: usize) -> Result<TypedValue, MeterError> {
    let tag = *buf.get(offset).ok_or(MeterError::Truncated(offset))?;
    let width = match tag {
        0x06 => 4,
        0x12 | 0x10 => 2,
        0x0F | 0x16 => 1,
        other => return Err(MeterError::UnknownTag(other)),
    };
    let field = buf
        .get(offset + 1..offset + 1 + width)
        .ok_or(MeterError::Truncated(offset))?;

    let raw = field.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    let value = match tag {
        0x10 => i64::from(raw as u16 as i16),
        0x0F => i64::from(raw as u8 as i8),
        _ => raw as i64,
    };

    Ok(TypedValue {
        tag,
        value,
        consumed: 1 + width,
    })
}
