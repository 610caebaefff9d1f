//! # Payload Decryption
//!
//! AES-128 decryption of the wrapper frame's ciphertext per the DLMS/COSEM
//! security suite 0 construction. The 12-byte nonce is the meter's system
//! title followed by the big-endian frame counter, so a key is never paired
//! with a repeated nonce as long as the counter advances.
//!
//! Two profiles exist in the field:
//!
//! - **Authenticated** (`SecurityMode::AuthenticatedGcm`): the ciphertext
//!   carries a trailing 12-byte GCM tag. The tag is split off and verified;
//!   a mismatch rejects the frame.
//! - **Encrypt-only** (`SecurityMode::EncryptOnly`): broadcast meters that
//!   transmit without an authentication tag. Decryption is the raw GCM
//!   counter keystream (AES-CTR starting at counter block J0+1).
//!
//! Encryption is provided symmetrically for tests and tooling.

use crate::error::MeterError;
use crate::util::hex::decode_hex;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the GCM authentication tag in the authenticated profile
/// (DLMS security suite 0 truncates to 12 bytes).
pub const GCM_TAG_LEN: usize = 12;

/// Length of the AEAD nonce: system title (8) + frame counter (4).
pub const NONCE_LEN: usize = 12;

/// AES-128 key for payload decryption. Zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AesKey([u8; 16]);

impl AesKey {
    /// Key size required by the cipher, in bytes.
    pub const LEN: usize = 16;

    /// Creates a key from exactly 16 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MeterError> {
        if bytes.len() != Self::LEN {
            return Err(MeterError::KeyLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut key = [0u8; Self::LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Creates a key from a 32-digit hex string, as handed out by meter
    /// operators.
    pub fn from_hex(hex_str: &str) -> Result<Self, MeterError> {
        let bytes = decode_hex(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AesKey(..)")
    }
}

/// Whether the meter appends a GCM authentication tag to the ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityMode {
    /// Ciphertext ends with a 12-byte GCM tag that must verify.
    AuthenticatedGcm,
    /// No tag transmitted; confidentiality only.
    #[default]
    EncryptOnly,
}

/// Decrypts (and for tooling, encrypts) meter payloads under one key.
#[derive(Debug, Clone)]
pub struct MeterCipher {
    key: AesKey,
    mode: SecurityMode,
}

impl MeterCipher {
    /// Creates a cipher for the given key and security profile.
    pub fn new(key: AesKey, mode: SecurityMode) -> Self {
        Self { key, mode }
    }

    /// The configured security profile.
    pub fn mode(&self) -> SecurityMode {
        self.mode
    }

    /// Decrypts one frame's ciphertext.
    ///
    /// In the authenticated profile the returned plaintext is 12 bytes
    /// shorter than the input; in the encrypt-only profile lengths match.
    pub fn decrypt(
        &self,
        system_title: &[u8; 8],
        frame_counter: u32,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, MeterError> {
        let nonce = build_nonce(system_title, frame_counter);
        match self.mode {
            SecurityMode::AuthenticatedGcm => {
                if ciphertext.len() < GCM_TAG_LEN {
                    return Err(MeterError::Authentication);
                }
                self.gcm_decrypt(&nonce, ciphertext)
            }
            SecurityMode::EncryptOnly => Ok(self.ctr_apply(&nonce, ciphertext)),
        }
    }

    /// Encrypts a plaintext payload for the configured profile.
    ///
    /// In the authenticated profile the 12-byte tag is appended to the
    /// returned ciphertext.
    pub fn encrypt(
        &self,
        system_title: &[u8; 8],
        frame_counter: u32,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, MeterError> {
        let nonce = build_nonce(system_title, frame_counter);
        match self.mode {
            SecurityMode::AuthenticatedGcm => self.gcm_encrypt(&nonce, plaintext),
            SecurityMode::EncryptOnly => Ok(self.ctr_apply(&nonce, plaintext)),
        }
    }

    fn gcm_decrypt(&self, nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>, MeterError> {
        use aes::Aes128;
        use aes_gcm::aead::consts::U12;
        use aes_gcm::aead::{Aead, KeyInit, Payload};
        use aes_gcm::{AesGcm, Nonce};

        // Suite 0 with a truncated 12-byte tag; the tag trails the ciphertext.
        type SuiteZeroGcm = AesGcm<Aes128, U12, U12>;

        let cipher = SuiteZeroGcm::new_from_slice(self.key.as_bytes())
            .map_err(|_| MeterError::KeyLength {
                expected: AesKey::LEN,
                actual: self.key.as_bytes().len(),
            })?;
        cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: b"",
                },
            )
            .map_err(|_| MeterError::Authentication)
    }

    fn gcm_encrypt(&self, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>, MeterError> {
        use aes::Aes128;
        use aes_gcm::aead::consts::U12;
        use aes_gcm::aead::{Aead, KeyInit, Payload};
        use aes_gcm::{AesGcm, Nonce};

        type SuiteZeroGcm = AesGcm<Aes128, U12, U12>;

        let cipher = SuiteZeroGcm::new_from_slice(self.key.as_bytes())
            .map_err(|_| MeterError::KeyLength {
                expected: AesKey::LEN,
                actual: self.key.as_bytes().len(),
            })?;
        cipher
            .encrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: plaintext,
                    aad: b"",
                },
            )
            .map_err(|_| MeterError::Authentication)
    }

    /// Applies the GCM counter keystream without authentication.
    ///
    /// GCM encrypts payload blocks starting at J0 + 1, where J0 is the
    /// 12-byte nonce followed by a 32-bit block counter of 1. Symmetric, so
    /// it serves both directions.
    fn ctr_apply(&self, nonce: &[u8; NONCE_LEN], data: &[u8]) -> Vec<u8> {
        use aes::cipher::{BlockEncrypt, KeyInit};
        use aes::cipher::generic_array::GenericArray;
        use aes::Aes128;

        let cipher = Aes128::new(GenericArray::from_slice(self.key.as_bytes()));

        let mut counter = [0u8; 16];
        counter[..NONCE_LEN].copy_from_slice(nonce);
        counter[15] = 2; // J0 + 1

        let mut out = Vec::with_capacity(data.len());
        for chunk in data.chunks(16) {
            let mut block = GenericArray::clone_from_slice(&counter);
            cipher.encrypt_block(&mut block);
            for (i, byte) in chunk.iter().enumerate() {
                out.push(byte ^ block[i]);
            }
            increment_counter(&mut counter);
        }
        out
    }
}

/// Builds the 12-byte nonce: system title followed by the big-endian frame
/// counter.
pub fn build_nonce(system_title: &[u8; 8], frame_counter: u32) -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    nonce[..8].copy_from_slice(system_title);
    nonce[8..].copy_from_slice(&frame_counter.to_be_bytes());
    nonce
}

/// Increments the 32-bit big-endian block counter in the last four bytes,
/// as GCM does.
fn increment_counter(counter: &mut [u8; 16]) {
    let block = u32::from_be_bytes([counter[12], counter[13], counter[14], counter[15]]);
    counter[12..16].copy_from_slice(&block.wrapping_add(1).to_be_bytes());
}
