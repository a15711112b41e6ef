//! Single-field AES-256-GCM encryption with an Argon2id-derived key.
//!
//! Each ciphertext is a hex string over a self-describing envelope:
//!
//! ```text
//! version (1) | m_cost (u32 LE) | t_cost (u32 LE) | p_cost (u32 LE)
//!             | salt (16) | nonce (12) | ciphertext || tag (16)
//! ```
//!
//! Salt and nonce are fresh per call, so encrypting the same text twice gives
//! different output. The cost parameters travel with the ciphertext, which
//! lets old values decrypt after the configured cost changes.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::{CipherError, DecryptionFailure, Result};

const ENVELOPE_VERSION: u8 = 1;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;
const HEADER_LEN: usize = 1 + 3 * 4 + SALT_LEN + NONCE_LEN;

/// Upper bound on the memory cost accepted from an envelope (1 GiB).
pub const MAX_MEMORY_KIB: u32 = 1024 * 1024;
/// Upper bound on the number of Argon2 passes.
pub const MAX_ITERATIONS: u32 = 32;
/// Upper bound on the number of Argon2 lanes.
pub const MAX_PARALLELISM: u32 = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for CipherParams {
    /// OWASP baseline for Argon2id: 19 MiB, two passes, one lane.
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl CipherParams {
    /// Whether every cost is within the bounds accepted on decryption.
    pub fn within_limits(&self) -> bool {
        self.memory_kib <= MAX_MEMORY_KIB
            && self.iterations <= MAX_ITERATIONS
            && self.parallelism <= MAX_PARALLELISM
    }

    fn to_argon2(self) -> std::result::Result<Params, argon2::Error> {
        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
    }
}

/// Encrypts and decrypts single string fields.
///
/// Holds only cost parameters; the secret is passed per call and never kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldCipher {
    params: CipherParams,
}

impl FieldCipher {
    pub fn new(params: CipherParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> CipherParams {
        self.params
    }

    /// Encrypt `plaintext` under `secret`.
    ///
    /// # Errors
    ///
    /// [`CipherError::EmptySecret`] for an empty secret, and
    /// [`CipherError::KeyDerivation`] when the configured cost parameters
    /// are rejected by Argon2.
    pub fn encrypt(&self, plaintext: &str, secret: &str) -> Result<String> {
        if secret.is_empty() {
            return Err(CipherError::EmptySecret);
        }
        if !self.params.within_limits() {
            return Err(CipherError::KeyDerivation(format!(
                "cost parameters exceed the limits ({MAX_MEMORY_KIB} KiB, \
                 {MAX_ITERATIONS} passes, {MAX_PARALLELISM} lanes)"
            )));
        }
        let argon_params = self
            .params
            .to_argon2()
            .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce);

        let key = derive_key(secret, &salt, argon_params)?;
        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| CipherError::Encryption(e.to_string()))?;
        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| CipherError::Encryption(e.to_string()))?;

        let mut envelope = Vec::with_capacity(HEADER_LEN + sealed.len());
        envelope.push(ENVELOPE_VERSION);
        envelope.extend_from_slice(&self.params.memory_kib.to_le_bytes());
        envelope.extend_from_slice(&self.params.iterations.to_le_bytes());
        envelope.extend_from_slice(&self.params.parallelism.to_le_bytes());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&sealed);
        Ok(hex::encode(envelope))
    }

    /// Decrypt a value produced by [`FieldCipher::encrypt`].
    ///
    /// The cost parameters are read from the envelope, not from `self`.
    ///
    /// # Errors
    ///
    /// [`CipherError::Decryption`] when the secret is wrong or the value is
    /// malformed or was tampered with.
    pub fn decrypt(&self, ciphertext: &str, secret: &str) -> Result<String> {
        if secret.is_empty() {
            return Err(CipherError::EmptySecret);
        }
        let envelope = Envelope::parse(ciphertext.trim())?;
        let argon_params = envelope.params.to_argon2().map_err(|_| {
            DecryptionFailure::UnsupportedParameters {
                memory_kib: envelope.params.memory_kib,
                iterations: envelope.params.iterations,
                parallelism: envelope.params.parallelism,
            }
        })?;

        let key = derive_key(secret, &envelope.salt, argon_params)?;
        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
        let plaintext = Zeroizing::new(
            cipher
                .decrypt(Nonce::from_slice(&envelope.nonce), envelope.sealed.as_slice())
                .map_err(|_| DecryptionFailure::Authentication)?,
        );
        let text = std::str::from_utf8(&plaintext).map_err(|_| DecryptionFailure::Utf8)?;
        Ok(text.to_string())
    }
}

fn derive_key(secret: &str, salt: &[u8], params: Params) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password_into(secret.as_bytes(), salt, &mut key[..])
        .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

struct Envelope {
    params: CipherParams,
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    sealed: Vec<u8>,
}

impl Envelope {
    fn parse(text: &str) -> std::result::Result<Self, DecryptionFailure> {
        let bytes = hex::decode(text).map_err(|_| DecryptionFailure::Encoding)?;
        let Some((&version, rest)) = bytes.split_first() else {
            return Err(DecryptionFailure::Truncated(0));
        };
        if version != ENVELOPE_VERSION {
            return Err(DecryptionFailure::UnsupportedVersion(version));
        }
        if bytes.len() < HEADER_LEN + TAG_LEN {
            return Err(DecryptionFailure::Truncated(bytes.len()));
        }

        let (costs, rest) = rest.split_at(12);
        let (salt, rest) = rest.split_at(SALT_LEN);
        let (nonce, sealed) = rest.split_at(NONCE_LEN);
        let params = CipherParams {
            memory_kib: read_u32(&costs[0..4]),
            iterations: read_u32(&costs[4..8]),
            parallelism: read_u32(&costs[8..12]),
        };
        if !params.within_limits() {
            return Err(DecryptionFailure::UnsupportedParameters {
                memory_kib: params.memory_kib,
                iterations: params.iterations,
                parallelism: params.parallelism,
            });
        }

        let mut envelope = Self {
            params,
            salt: [0u8; SALT_LEN],
            nonce: [0u8; NONCE_LEN],
            sealed: sealed.to_vec(),
        };
        envelope.salt.copy_from_slice(salt);
        envelope.nonce.copy_from_slice(nonce);
        Ok(envelope)
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

/// Encrypt with default cost parameters.
pub fn encrypt(plaintext: &str, secret: &str) -> Result<String> {
    FieldCipher::default().encrypt(plaintext, secret)
}

/// Decrypt a value produced by [`encrypt`] or [`FieldCipher::encrypt`].
pub fn decrypt(ciphertext: &str, secret: &str) -> Result<String> {
    FieldCipher::default().decrypt(ciphertext, secret)
}
