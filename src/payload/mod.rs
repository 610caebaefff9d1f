//! The payload module contains the components responsible for decoding the
//! decrypted DLMS/COSEM payload: typed primitive values, unit codes, the
//! embedded date-time, OBIS-addressed registers and the assembled reading.

pub mod datetime;
pub mod reading;
pub mod register;
pub mod units;
pub mod value;

pub use datetime::{decode_datetime, DateTimeFields};
pub use reading::{build_reading, ManifestEntry, Reading, DEFAULT_MANIFEST};
pub use register::{find_register, ObisCode, Register};
pub use units::unit_symbol;
pub use value::{decode_value, TypedValue};
