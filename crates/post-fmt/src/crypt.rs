//! Tiered-access envelope encryption.
//!
//! The codec's contract is narrow: one key segment in, one derived key out,
//! one decrypt attempt per envelope. Which segment a caller holds for which
//! tier is entirely the business of the wallet/session layer behind the
//! [`KeyHierarchy`] lookup; nothing here can cross tiers.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::level::EncryptionLevel;

/// Nonce length carried in the envelope's `metadata.iv` hex field.
pub const NONCE_LEN: usize = 12;

/// Caller-supplied mapping from audience tier to raw key segment.
///
/// Implemented for closures, so a session layer can pass
/// `|level| self.segments.get(&level).cloned()` directly.
pub trait KeyHierarchy {
    /// Returns the key segment for `level`, or `None` when the caller does
    /// not hold that tier. `None` is an expected access-denial outcome, not
    /// an error.
    fn key_segment(&self, level: EncryptionLevel) -> Option<Vec<u8>>;
}

impl<F> KeyHierarchy for F
where
    F: Fn(EncryptionLevel) -> Option<Vec<u8>>,
{
    fn key_segment(&self, level: EncryptionLevel) -> Option<Vec<u8>> {
        self(level)
    }
}

/// Wire shape of a tier-encrypted inscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    /// Base64 ciphertext.
    pub data: String,

    /// Cipher parameters.
    pub metadata: CipherMetadata,

    /// Declared audience tier.
    #[serde(rename = "encryptionLevel")]
    pub encryption_level: u8,
}

/// Cipher parameters of an encrypted envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherMetadata {
    /// Hex-encoded nonce.
    pub iv: String,
}

/// Why a single decrypt attempt failed.
///
/// Callers treat every variant identically to a missing key: the envelope
/// stays opaque and processing continues.
#[derive(Debug, Error)]
pub enum DecryptError {
    /// Ciphertext field was not valid base64.
    #[error("ciphertext is not valid base64: {0}")]
    Ciphertext(#[from] base64::DecodeError),

    /// IV field was not valid hex.
    #[error("iv is not valid hex: {0}")]
    Iv(#[from] hex::FromHexError),

    /// IV decoded to the wrong length.
    #[error("iv must be {NONCE_LEN} bytes (got {0})")]
    IvLength(usize),

    /// Authenticated decryption failed (wrong key or tampered data).
    #[error("authenticated decryption failed")]
    Decrypt,

    /// Decrypted bytes were not a JSON document.
    #[error("decrypted payload is not valid JSON: {0}")]
    Plaintext(#[from] serde_json::Error),
}

/// Derives the symmetric key for one tier from its raw key segment.
pub fn derive_key(segment: &[u8]) -> [u8; 32] {
    Sha256::digest(segment).into()
}

/// Performs the single decrypt attempt for an encrypted envelope.
///
/// Decodes the ciphertext and IV, decrypts with the key derived from
/// `segment`, and parses the plaintext as JSON. Deterministic and all-or-
/// nothing; a failure leaves no partial state behind.
pub fn decrypt_envelope(
    envelope: &EncryptedEnvelope,
    segment: &[u8],
) -> Result<Value, DecryptError> {
    let ciphertext = BASE64.decode(&envelope.data)?;
    let iv = hex::decode(&envelope.metadata.iv)?;
    if iv.len() != NONCE_LEN {
        return Err(DecryptError::IvLength(iv.len()));
    }

    let key = derive_key(segment);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), ciphertext.as_slice())
        .map_err(|_| DecryptError::Decrypt)?;

    Ok(serde_json::from_slice(&plaintext)?)
}

/// Builds an encrypted envelope from a plaintext JSON value, the encode
/// direction of [`decrypt_envelope`].
pub fn seal_envelope(
    plaintext: &Value,
    segment: &[u8],
    iv: &[u8; NONCE_LEN],
    level: EncryptionLevel,
) -> EncryptedEnvelope {
    let key = derive_key(segment);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(iv), plaintext.to_string().as_bytes())
        .expect("crypt: in-memory encryption");

    EncryptedEnvelope {
        data: BASE64.encode(ciphertext),
        metadata: CipherMetadata { iv: hex::encode(iv) },
        encryption_level: level.into(),
    }
}
