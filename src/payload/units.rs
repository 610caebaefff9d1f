//! # DLMS Unit Codes
//!
//! Mapping from the DLMS/COSEM enumerated unit code carried in a register's
//! scaler-unit structure to its display symbol, per the subset of the DLMS
//! Blue Book units that electricity push meters emit.

/// Returns the display symbol for a DLMS unit code.
///
/// Code 255 means "unitless" and maps to the empty string. Codes outside the
/// table return `None`; the register scanner treats those as empty rather
/// than failing the register.
pub fn unit_symbol(code: u8) -> Option<&'static str> {
    match code {
        27 => Some("W"),
        30 => Some("Wh"),
        33 => Some("A"),
        35 => Some("V"),
        255 => Some(""),
        _ => None,
    }
}
