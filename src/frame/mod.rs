//! # Wrapper Transport Module
//!
//! This module handles the fixed-size wrapper frames that carry the encrypted
//! DLMS/COSEM payload: structural validation and field extraction, plus
//! frame-counter gap tracking across successive broadcasts.

pub mod sequence;
pub mod wrapper;

pub use sequence::SequenceTracker;
pub use wrapper::{additive_checksum, parse_wrapper, WrapperFrame};
