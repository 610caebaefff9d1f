//! # Reading Aggregator
//!
//! Assembles one complete [`Reading`] from a decrypted payload by scanning a
//! manifest of OBIS codes and decoding the embedded timestamp. Every field
//! is individually optional: a register the payload lacks or fails to decode
//! is reported absent, never defaulted to zero, and never blocks the rest.

use crate::constants::{
    DATETIME_OFFSET, OBIS_ACTIVE_ENERGY_EXPORT, OBIS_ACTIVE_ENERGY_IMPORT,
    OBIS_ACTIVE_POWER_EXPORT, OBIS_ACTIVE_POWER_IMPORT, OBIS_CURRENT_L1, OBIS_CURRENT_L2,
    OBIS_CURRENT_L3, OBIS_POWER_FACTOR, OBIS_VOLTAGE_L1, OBIS_VOLTAGE_L2, OBIS_VOLTAGE_L3,
};
use crate::logging::log_debug;
use crate::payload::datetime::{decode_datetime, DateTimeFields};
use crate::payload::register::{find_register, ObisCode, Register};
use serde::Serialize;
use std::collections::BTreeMap;

/// Logical name of the import power register, used for the derived net
/// power field.
pub const ACTIVE_POWER_IMPORT: &str = "active_power_import";

/// Logical name of the export power register.
pub const ACTIVE_POWER_EXPORT: &str = "active_power_export";

/// One manifest row: a logical field name and the OBIS code to scan for.
#[derive(Debug, Clone, Copy)]
pub struct ManifestEntry {
    pub name: &'static str,
    pub obis: ObisCode,
}

/// The registers an electricity push meter broadcasts. Callers may pass
/// their own manifest to [`build_reading`] without touching this table.
pub const DEFAULT_MANIFEST: &[ManifestEntry] = &[
    ManifestEntry {
        name: "active_energy_import",
        obis: OBIS_ACTIVE_ENERGY_IMPORT,
    },
    ManifestEntry {
        name: "active_energy_export",
        obis: OBIS_ACTIVE_ENERGY_EXPORT,
    },
    ManifestEntry {
        name: ACTIVE_POWER_IMPORT,
        obis: OBIS_ACTIVE_POWER_IMPORT,
    },
    ManifestEntry {
        name: ACTIVE_POWER_EXPORT,
        obis: OBIS_ACTIVE_POWER_EXPORT,
    },
    ManifestEntry {
        name: "voltage_l1",
        obis: OBIS_VOLTAGE_L1,
    },
    ManifestEntry {
        name: "voltage_l2",
        obis: OBIS_VOLTAGE_L2,
    },
    ManifestEntry {
        name: "voltage_l3",
        obis: OBIS_VOLTAGE_L3,
    },
    ManifestEntry {
        name: "current_l1",
        obis: OBIS_CURRENT_L1,
    },
    ManifestEntry {
        name: "current_l2",
        obis: OBIS_CURRENT_L2,
    },
    ManifestEntry {
        name: "current_l3",
        obis: OBIS_CURRENT_L3,
    },
    ManifestEntry {
        name: "power_factor",
        obis: OBIS_POWER_FACTOR,
    },
];

/// One decoded meter reading. Constructed fresh per frame, never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Meter clock at transmission time, absent if the date-time failed to
    /// decode.
    pub timestamp: Option<DateTimeFields>,
    /// Registers keyed by logical manifest name. `None` marks a register
    /// the payload did not contain.
    pub registers: BTreeMap<&'static str, Option<Register>>,
    /// Import minus export power, only when both operands are present.
    pub net_active_power: Option<f64>,
}

impl Reading {
    /// Convenience accessor: the decoded value of a register by logical
    /// name, if present.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.registers.get(name)?.as_ref()?.value
    }
}

/// Scans the payload for every manifest entry and assembles the reading.
///
/// Always returns a (possibly partial) reading; the caller has already
/// established that the frame itself was valid and decrypted.
pub fn build_reading(payload: &[u8], manifest: &[ManifestEntry]) -> Reading {
    let mut registers = BTreeMap::new();
    for entry in manifest {
        let register = match find_register(payload, entry.obis) {
            Ok(register) => Some(register),
            Err(e) => {
                log_debug(&format!("{}: {e}", entry.name));
                None
            }
        };
        registers.insert(entry.name, register);
    }

    let timestamp = match decode_datetime(payload, DATETIME_OFFSET) {
        Ok(fields) => Some(fields),
        Err(e) => {
            log_debug(&format!("timestamp absent: {e}"));
            None
        }
    };

    let mut reading = Reading {
        timestamp,
        registers,
        net_active_power: None,
    };
    reading.net_active_power = net_active_power(&reading);
    reading
}

/// Derived field: import power minus export power, absent unless both
/// operands decoded.
fn net_active_power(reading: &Reading) -> Option<f64> {
    let import = reading.value(ACTIVE_POWER_IMPORT)?;
    let export = reading.value(ACTIVE_POWER_EXPORT)?;
    Some(import - export)
}
