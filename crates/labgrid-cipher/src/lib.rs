//! Reversible encryption of personal fields.
//!
//! Applicant names, personal numbers, sample codes and senders are stored
//! only as ciphertext. The secret comes from the caller on every call; this
//! crate never stores or generates one.
//!
//! Encryption is authenticated (AES-256-GCM), so a wrong secret fails with
//! [`CipherError::Decryption`] instead of producing garbage text.

pub mod cipher;
pub mod error;
pub mod fields;

pub use cipher::{
    CipherParams, FieldCipher, MAX_ITERATIONS, MAX_MEMORY_KIB, MAX_PARALLELISM, decrypt, encrypt,
};
pub use error::{CipherError, DecryptionFailure, Result};
pub use fields::{FieldRecord, decrypt_fields, encrypt_fields};
