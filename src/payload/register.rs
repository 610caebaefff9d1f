//! # OBIS Register Scanner
//!
//! Locates a register by its 6-byte OBIS code inside the decrypted payload
//! and decodes its value. Each register is encoded as the OBIS code followed
//! by the mantissa value, then a two-element scaler-unit structure holding
//! the decimal exponent and the DLMS unit code:
//!
//! ```text
//! <obis:6> <mantissa tag+value> 02 02 <exponent tag+value> <unit tag+value>
//! ```
//!
//! The walk is cursor-based over byte offsets rather than pattern search, so
//! mantissa bytes that happen to contain marker-like values cannot derail it.
//! A register that decodes badly is reported with an absent value; only a
//! missing OBIS code is reported as not found. Neither aborts the reading.

use crate::constants::{OBIS_LEN, SCALER_UNIT_HEADER};
use crate::error::MeterError;
use crate::logging::log_debug;
use crate::payload::units::unit_symbol;
use crate::payload::value::decode_value;
use crate::util::hex::encode_hex;
use serde::{Serialize, Serializer};
use std::fmt;

/// A 6-byte OBIS register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObisCode(pub [u8; OBIS_LEN]);

impl fmt::Display for ObisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, x] = self.0;
        write!(f, "{a}-{b}:{c}.{d}.{e}*{x}")
    }
}

impl Serialize for ObisCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_hex(&self.0))
    }
}

/// One decoded register value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Register {
    /// The register's OBIS identifier.
    pub obis: ObisCode,
    /// mantissa × 10^exponent, absent when mantissa or exponent failed to
    /// decode.
    pub value: Option<f64>,
    /// Display symbol from the unit table; empty for unitless or unmapped
    /// codes.
    pub unit: &'static str,
}

/// Scans the payload for `obis` and decodes the register behind it.
///
/// `RegisterNotFound` when the code does not occur; any later decode failure
/// yields a register with an absent value instead of an error, so one bad
/// field never suppresses the others.
pub fn find_register(payload: &[u8], obis: ObisCode) -> Result<Register, MeterError> {
    let pos = payload
        .windows(OBIS_LEN)
        .position(|w| w == obis.0)
        .ok_or(MeterError::RegisterNotFound(obis))?;

    match decode_register_fields(payload, pos + OBIS_LEN) {
        Ok((value, unit)) => Ok(Register {
            obis,
            value: Some(value),
            unit,
        }),
        Err(e) => {
            log_debug(&format!("register {obis}: value absent: {e}"));
            Ok(Register {
                obis,
                value: None,
                unit: "",
            })
        }
    }
}

/// Walks mantissa, scaler-unit header, exponent and unit starting right
/// after the OBIS code.
fn decode_register_fields(
    payload: &[u8],
    start: usize,
) -> Result<(f64, &'static str), MeterError> {
    let mut offset = start;

    let mantissa = decode_value(payload, offset)?;
    offset += mantissa.consumed;

    match payload.get(offset..offset + SCALER_UNIT_HEADER.len()) {
        Some(header) if header == SCALER_UNIT_HEADER => {}
        Some(header) => return Err(MeterError::UnknownTag(header[0])),
        None => return Err(MeterError::Truncated(offset)),
    }
    offset += SCALER_UNIT_HEADER.len();

    let exponent = decode_value(payload, offset)?;
    offset += exponent.consumed;

    // A failed unit lookup degrades to unitless; the value itself survives.
    let unit = match decode_value(payload, offset) {
        Ok(unit_value) => unit_symbol(unit_value.value as u8).unwrap_or(""),
        Err(e) => {
            log_debug(&format!("unit field at offset {offset} unreadable: {e}"));
            ""
        }
    };

    let value = mantissa.value as f64 * 10f64.powi(exponent.value as i32);
    Ok((value, unit))
}
