//! # Wrapper Frame Validator
//!
//! Parses the fixed 282-byte broadcast frame emitted by the meter's customer
//! interface. The frame is an M-Bus style envelope:
//!
//! | offset | length | field                                  |
//! |--------|--------|----------------------------------------|
//! | 0      | 4      | start marker `68 01 01 68`             |
//! | 11     | 8      | system title (AEAD nonce component)    |
//! | 22     | 4      | frame counter, big-endian unsigned     |
//! | 26     | 254    | ciphertext payload                     |
//! | 280    | 1      | checksum                               |
//! | 281    | 1      | stop byte `16`                         |
//!
//! The checksum byte is extracted and exposed but not enforced; meters in the
//! field do not reliably populate it. Callers that want verification can
//! compare it against [`additive_checksum`].

use crate::constants::{
    CIPHERTEXT_LEN, CHECKSUM_OFFSET, FRAME_START, FRAME_STOP, SYSTEM_TITLE_LEN,
    WRAPPER_FRAME_LEN,
};
use crate::error::MeterError;
use nom::{
    bytes::complete::take,
    number::complete::{be_u32, be_u8},
    IResult,
};

/// Fields extracted from one validated wrapper frame.
///
/// Borrows the ciphertext from the raw frame; nothing is retained across
/// calls.
#[derive(Debug, PartialEq, Eq)]
pub struct WrapperFrame<'a> {
    /// 8-byte system title, the fixed half of the AEAD nonce.
    pub system_title: [u8; 8],
    /// Monotonic frame counter, the variable half of the AEAD nonce.
    pub frame_counter: u32,
    /// Encrypted payload, 254 bytes.
    pub ciphertext: &'a [u8],
    /// Checksum byte as transmitted. Not verified here.
    pub checksum: u8,
}

/// Validates a raw broadcast frame and extracts the wrapper fields.
///
/// Pure function of its input. Length and marker violations are frame-fatal;
/// the caller drops the frame and waits for the next one.
pub fn parse_wrapper(frame: &[u8]) -> Result<WrapperFrame<'_>, MeterError> {
    if frame.len() != WRAPPER_FRAME_LEN {
        return Err(MeterError::FrameLength {
            expected: WRAPPER_FRAME_LEN,
            actual: frame.len(),
        });
    }
    if frame[..FRAME_START.len()] != FRAME_START {
        return Err(MeterError::FrameFormat("bad start"));
    }
    if frame[WRAPPER_FRAME_LEN - 1] != FRAME_STOP {
        return Err(MeterError::FrameFormat("bad stop"));
    }

    // Length and markers verified above, so this cannot fail on 282 bytes.
    let (_, wrapper) = wrapper_fields(&frame[FRAME_START.len()..])
        .map_err(|_| MeterError::FrameFormat("truncated fields"))?;
    Ok(wrapper)
}

/// Parses the wrapper fields after the start marker.
fn wrapper_fields(input: &[u8]) -> IResult<&[u8], WrapperFrame<'_>> {
    let (input, _) = take(7usize)(input)?; // transport header, not used
    let (input, title) = take(SYSTEM_TITLE_LEN)(input)?;
    let (input, _) = take(3usize)(input)?; // security control + length
    let (input, frame_counter) = be_u32(input)?;
    let (input, ciphertext) = take(CIPHERTEXT_LEN)(input)?;
    let (input, checksum) = be_u8(input)?;

    let mut system_title = [0u8; SYSTEM_TITLE_LEN];
    system_title.copy_from_slice(title);

    Ok((
        input,
        WrapperFrame {
            system_title,
            frame_counter,
            ciphertext,
            checksum,
        },
    ))
}

/// Computes the M-Bus style additive checksum over the frame body
/// (everything between the start marker and the checksum byte).
///
/// Provided so callers can verify the transmitted checksum byte themselves;
/// the decode pipeline does not enforce it.
pub fn additive_checksum(frame: &[u8]) -> u8 {
    frame
        .get(FRAME_START.len()..CHECKSUM_OFFSET)
        .unwrap_or(&[])
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b))
}
