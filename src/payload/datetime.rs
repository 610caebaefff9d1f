//! # COSEM Date-Time Decoder
//!
//! Decodes the fixed 12-byte date-time structure embedded near the start of
//! the decrypted payload. All-or-nothing: a truncated window or an
//! impossible calendar field reports the whole timestamp absent rather than
//! a partially filled one.

use crate::error::MeterError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Length of the encoded date-time window in bytes.
pub const DATETIME_LEN: usize = 12;

/// Decoded COSEM date-time fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateTimeFields {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// 1 = Monday .. 7 = Sunday.
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
    /// Deviation from UTC in minutes.
    pub utc_offset_minutes: i16,
    /// Daylight saving time flag from the clock status byte.
    pub is_dst: bool,
}

impl DateTimeFields {
    /// Converts to a calendar timestamp, ignoring the UTC deviation.
    ///
    /// Returns `None` for field combinations chrono rejects (e.g. Feb 30).
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )?
        .and_hms_milli_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
            u32::from(self.hundredths) * 10,
        )
    }
}

/// Decodes the date-time window starting at `offset`.
///
/// Layout: year (u16 BE), month, day, weekday, hour, minute, second,
/// hundredths (u8 each), deviation (i16 BE, minutes from UTC), clock status
/// byte whose low bit selects the DST flag.
pub fn decode_datetime(payload: &[u8], offset: usize) -> Result<DateTimeFields, MeterError> {
    let w = payload
        .get(offset..offset + DATETIME_LEN)
        .ok_or_else(|| MeterError::DateTime("window out of range".into()))?;

    let fields = DateTimeFields {
        year: u16::from_be_bytes([w[0], w[1]]),
        month: w[2],
        day: w[3],
        weekday: w[4],
        hour: w[5],
        minute: w[6],
        second: w[7],
        hundredths: w[8],
        utc_offset_minutes: i16::from_be_bytes([w[9], w[10]]),
        is_dst: w[11] & 0x01 != 0,
    };

    if !(1..=12).contains(&fields.month) || !(1..=31).contains(&fields.day) {
        return Err(MeterError::DateTime(format!(
            "impossible date {}-{}-{}",
            fields.year, fields.month, fields.day
        )));
    }
    if fields.hour > 23 || fields.minute > 59 || fields.second > 59 {
        return Err(MeterError::DateTime(format!(
            "impossible time {}:{}:{}",
            fields.hour, fields.minute, fields.second
        )));
    }

    Ok(fields)
}
