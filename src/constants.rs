//! Smart Meter Push Protocol Constants
//!
//! This module defines constants for the wrapper transport and the
//! DLMS/COSEM payload layout used by broadcast-only smart meters.

use crate::payload::register::ObisCode;

// ----------------------------------------------------------------------------
// Wrapper frame geometry
// ----------------------------------------------------------------------------

/// Fixed length of a broadcast wrapper frame
pub const WRAPPER_FRAME_LEN: usize = 282;

/// Start marker, first four bytes of every wrapper frame
pub const FRAME_START: [u8; 4] = [0x68, 0x01, 0x01, 0x68];

/// Stop byte, last byte of every wrapper frame
pub const FRAME_STOP: u8 = 0x16;

/// Offset of the 8-byte system title (AEAD nonce component)
pub const SYSTEM_TITLE_OFFSET: usize = 11;

/// Length of the system title
pub const SYSTEM_TITLE_LEN: usize = 8;

/// Offset of the big-endian 32-bit frame counter
pub const FRAME_COUNTER_OFFSET: usize = 22;

/// Offset of the encrypted payload
pub const CIPHERTEXT_OFFSET: usize = 26;

/// Length of the encrypted payload
pub const CIPHERTEXT_LEN: usize = 254;

/// Offset of the checksum byte (extracted, not enforced by the core)
pub const CHECKSUM_OFFSET: usize = 280;

// ----------------------------------------------------------------------------
// Decrypted payload layout
// ----------------------------------------------------------------------------

/// Byte offset of the embedded COSEM date-time within the decrypted payload
pub const DATETIME_OFFSET: usize = 6;

/// Length of an OBIS register identifier
pub const OBIS_LEN: usize = 6;

/// Structure header preceding the scaler-unit pair of a register
pub const SCALER_UNIT_HEADER: [u8; 2] = [0x02, 0x02];

// ----------------------------------------------------------------------------
// OBIS codes (IEC 62056-61, electricity)
// ----------------------------------------------------------------------------

/// Active energy import (+A), 1-0:1.8.0*255
pub const OBIS_ACTIVE_ENERGY_IMPORT: ObisCode =
    ObisCode([0x01, 0x00, 0x01, 0x08, 0x00, 0xFF]);

/// Active energy export (-A), 1-0:2.8.0*255
pub const OBIS_ACTIVE_ENERGY_EXPORT: ObisCode =
    ObisCode([0x01, 0x00, 0x02, 0x08, 0x00, 0xFF]);

/// Instantaneous active power import (+P), 1-0:1.7.0*255
pub const OBIS_ACTIVE_POWER_IMPORT: ObisCode =
    ObisCode([0x01, 0x00, 0x01, 0x07, 0x00, 0xFF]);

/// Instantaneous active power export (-P), 1-0:2.7.0*255
pub const OBIS_ACTIVE_POWER_EXPORT: ObisCode =
    ObisCode([0x01, 0x00, 0x02, 0x07, 0x00, 0xFF]);

/// Phase voltage L1, 1-0:32.7.0*255
pub const OBIS_VOLTAGE_L1: ObisCode = ObisCode([0x01, 0x00, 0x20, 0x07, 0x00, 0xFF]);

/// Phase voltage L2, 1-0:52.7.0*255
pub const OBIS_VOLTAGE_L2: ObisCode = ObisCode([0x01, 0x00, 0x34, 0x07, 0x00, 0xFF]);

/// Phase voltage L3, 1-0:72.7.0*255
pub const OBIS_VOLTAGE_L3: ObisCode = ObisCode([0x01, 0x00, 0x48, 0x07, 0x00, 0xFF]);

/// Phase current L1, 1-0:31.7.0*255
pub const OBIS_CURRENT_L1: ObisCode = ObisCode([0x01, 0x00, 0x1F, 0x07, 0x00, 0xFF]);

/// Phase current L2, 1-0:51.7.0*255
pub const OBIS_CURRENT_L2: ObisCode = ObisCode([0x01, 0x00, 0x33, 0x07, 0x00, 0xFF]);

/// Phase current L3, 1-0:71.7.0*255
pub const OBIS_CURRENT_L3: ObisCode = ObisCode([0x01, 0x00, 0x47, 0x07, 0x00, 0xFF]);

/// Instantaneous power factor, 1-0:13.7.0*255
pub const OBIS_POWER_FACTOR: ObisCode = ObisCode([0x01, 0x00, 0x0D, 0x07, 0x00, 0xFF]);
