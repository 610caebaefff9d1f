//! # Frame-to-Reading Decoder
//!
//! Ties the pipeline together: wrapper validation, sequence-gap tracking,
//! payload decryption and reading assembly. One decoder per meter; the
//! sequence state lives inside it and the caller serializes frame arrivals.
//! A rejected frame leaves the decoder ready for the next one.

use crate::crypto::{AesKey, MeterCipher, SecurityMode};
use crate::error::MeterError;
use crate::frame::sequence::SequenceTracker;
use crate::frame::wrapper::parse_wrapper;
use crate::logging::log_warn;
use crate::payload::reading::{build_reading, ManifestEntry, Reading, DEFAULT_MANIFEST};

/// Result of decoding one valid frame.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// The assembled (possibly partial) reading.
    pub reading: Reading,
    /// Frame counter the meter stamped on this frame.
    pub frame_counter: u32,
    /// Frames missed since the previous one, per the sequence tracker.
    pub lost_frames: u32,
    /// Checksum byte as transmitted; verification is left to the caller.
    pub checksum: u8,
}

/// Decodes broadcast frames from a single meter.
#[derive(Debug)]
pub struct MeterDecoder {
    cipher: MeterCipher,
    tracker: SequenceTracker,
    manifest: &'static [ManifestEntry],
}

impl MeterDecoder {
    /// Creates a decoder for the encrypt-only broadcast profile with the
    /// default register manifest.
    pub fn new(key: AesKey) -> Self {
        Self::with_mode(key, SecurityMode::default())
    }

    /// Creates a decoder with an explicit security profile.
    pub fn with_mode(key: AesKey, mode: SecurityMode) -> Self {
        Self {
            cipher: MeterCipher::new(key, mode),
            tracker: SequenceTracker::new(),
            manifest: DEFAULT_MANIFEST,
        }
    }

    /// Replaces the register manifest.
    pub fn set_manifest(&mut self, manifest: &'static [ManifestEntry]) {
        self.manifest = manifest;
    }

    /// Sequence state, e.g. for persisting across restarts.
    pub fn tracker(&self) -> &SequenceTracker {
        &self.tracker
    }

    /// Decodes one raw frame into a reading.
    ///
    /// Frame-level failures (length, markers, authentication) reject this
    /// frame only. Field-level failures surface as absent values inside the
    /// returned reading.
    pub fn decode_frame(&mut self, frame: &[u8]) -> Result<DecodedFrame, MeterError> {
        let wrapper = parse_wrapper(frame)?;

        let lost_frames = self.tracker.observe(wrapper.frame_counter);
        if lost_frames > 0 {
            log_warn(&format!(
                "{lost_frames} lost frames before counter {}",
                wrapper.frame_counter
            ));
        }

        let payload = self.cipher.decrypt(
            &wrapper.system_title,
            wrapper.frame_counter,
            wrapper.ciphertext,
        )?;
        let reading = build_reading(&payload, self.manifest);

        Ok(DecodedFrame {
            reading,
            frame_counter: wrapper.frame_counter,
            lost_frames,
            checksum: wrapper.checksum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> AesKey {
        AesKey::from_hex("0EAF2F77101465606630CE80E1234567").unwrap()
    }

    #[test]
    fn test_rejected_frame_keeps_decoder_usable() {
        let mut decoder = MeterDecoder::new(test_key());
        assert!(decoder.decode_frame(&[0u8; 10]).is_err());
        assert!(decoder.decode_frame(&[0u8; 282]).is_err()); // bad markers
        assert_eq!(decoder.tracker().last_frame_counter(), None);
    }

    #[test]
    fn test_sequence_state_untouched_by_invalid_frames() {
        let mut decoder = MeterDecoder::new(test_key());
        let mut frame = vec![0u8; 282];
        frame[..4].copy_from_slice(&[0x68, 0x01, 0x01, 0x68]);
        // stop byte missing
        let err = decoder.decode_frame(&frame).unwrap_err();
        assert_eq!(err, MeterError::FrameFormat("bad stop"));
        assert_eq!(decoder.tracker().last_frame_counter(), None);
    }
}
