//! Error types for field encryption.

use thiserror::Error;

/// Why a ciphertext could not be turned back into plaintext.
///
/// Every variant means the caller should ask for the secret again or treat
/// the stored value as damaged. None of them ever comes with partial
/// plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptionFailure {
    /// Wrong secret, or the ciphertext was modified.
    #[error("wrong secret or tampered ciphertext")]
    Authentication,

    #[error("ciphertext is not valid hex")]
    Encoding,

    #[error("ciphertext is truncated ({0} bytes)")]
    Truncated(usize),

    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u8),

    /// Key derivation cost in the envelope is out of the accepted range.
    #[error("unsupported key derivation parameters (m={memory_kib} KiB, t={iterations}, p={parallelism})")]
    UnsupportedParameters {
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },

    #[error("decrypted field is not valid UTF-8")]
    Utf8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("decryption failed: {0}")]
    Decryption(#[from] DecryptionFailure),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("secret must not be empty")]
    EmptySecret,

    /// The record has no string field with this name.
    #[error("unknown field `{0}`")]
    UnknownField(String),

    /// A batch operation failed on one field.
    #[error("field `{field}`: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<CipherError>,
    },
}

impl CipherError {
    /// Whether this error, or the field error it wraps, is a decryption
    /// failure.
    pub fn is_decryption(&self) -> bool {
        match self {
            CipherError::Decryption(_) => true,
            CipherError::Field { source, .. } => source.is_decryption(),
            _ => false,
        }
    }
}

/// Result type alias for cipher operations.
pub type Result<T> = std::result::Result<T, CipherError>;
