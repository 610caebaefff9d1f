//! # dlms-push-rs - Decoding Encrypted DLMS/COSEM Push Telemetry
//!
//! The dlms-push-rs crate decodes the periodic broadcast frames that smart
//! electricity meters push over their customer interface: a fixed-size
//! M-Bus style wrapper carrying an AES-encrypted DLMS/COSEM payload of
//! OBIS-addressed register values.
//!
//! ## Features
//!
//! - Validate the 282-byte wrapper frame and extract system title, frame
//!   counter, ciphertext and checksum
//! - Detect lost frames through wraparound-safe frame counter tracking
//! - Decrypt the payload with AES-128-GCM (authenticated profile) or the
//!   GCM counter keystream (encrypt-only broadcast profile)
//! - Decode typed, unit-tagged, exponent-scaled register values addressed
//!   by OBIS codes, plus the embedded COSEM date-time
//! - Tolerate partial failure: a malformed register or timestamp is
//!   reported absent without dropping the rest of the reading
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dlms_push_rs::{AesKey, MeterDecoder};
//!
//! let key = AesKey::from_hex("0EAF2F77101465606630CE80E1234567").unwrap();
//! let mut decoder = MeterDecoder::new(key);
//!
//! // Frames arrive as opaque byte buffers from the caller's receive loop.
//! let frame: Vec<u8> = todo!();
//! match decoder.decode_frame(&frame) {
//!     Ok(decoded) => println!("{:?}", decoded.reading),
//!     Err(e) => eprintln!("frame rejected: {e}"),
//! }
//! ```

pub mod constants;
pub mod crypto;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod logging;
pub mod payload;
pub mod util;

pub use crate::error::MeterError;
pub use crate::logging::{init_logger, log_info};

// Core pipeline types
pub use crypto::{AesKey, MeterCipher, SecurityMode};
pub use decoder::{DecodedFrame, MeterDecoder};
pub use frame::{parse_wrapper, SequenceTracker, WrapperFrame};
pub use payload::{
    build_reading, decode_datetime, decode_value, find_register, unit_symbol, DateTimeFields,
    ManifestEntry, ObisCode, Reading, Register, TypedValue, DEFAULT_MANIFEST,
};
