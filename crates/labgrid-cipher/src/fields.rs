//! Batch encryption of named record fields.
//!
//! Each field is encrypted on its own scoped thread. Results are gathered by
//! field name, so the outcome does not depend on which thread finishes first.

use std::collections::BTreeMap;
use std::thread;

use labgrid_model::Applicant;

use crate::cipher::FieldCipher;
use crate::error::{CipherError, Result};

/// A record whose string fields can be read and replaced by name.
pub trait FieldRecord {
    fn field(&self, name: &str) -> Option<&str>;

    /// Replace a field. Returns `false` if the record has no such field.
    fn set_field(&mut self, name: &str, value: String) -> bool;
}

impl FieldRecord for Applicant {
    fn field(&self, name: &str) -> Option<&str> {
        self.text_field(name)
    }

    fn set_field(&mut self, name: &str, value: String) -> bool {
        match self.text_field_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl FieldRecord for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }

    fn set_field(&mut self, name: &str, value: String) -> bool {
        match self.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// Run `op` over the named fields concurrently and write the results into a
/// copy of `record`.
///
/// Every name is checked before any work starts. On failure the error of the
/// alphabetically first failing field is returned.
fn map_fields<R, F>(record: &R, names: &[&str], op: F) -> Result<R>
where
    R: FieldRecord + Clone,
    F: Fn(&str) -> Result<String> + Sync,
{
    let mut inputs: BTreeMap<&str, &str> = BTreeMap::new();
    for &name in names {
        let value = record
            .field(name)
            .ok_or_else(|| CipherError::UnknownField(name.to_string()))?;
        inputs.insert(name, value);
    }

    let op = &op;
    let results: BTreeMap<&str, Result<String>> = thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|(&name, &value)| (name, scope.spawn(move || op(value))))
            .collect();
        handles
            .into_iter()
            .map(|(name, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(CipherError::Encryption("field worker panicked".to_string()))
                });
                (name, result)
            })
            .collect()
    });

    let mut output = record.clone();
    for (name, result) in results {
        let value = result.map_err(|source| CipherError::Field {
            field: name.to_string(),
            source: Box::new(source),
        })?;
        if !output.set_field(name, value) {
            return Err(CipherError::UnknownField(name.to_string()));
        }
    }
    Ok(output)
}

impl FieldCipher {
    /// Copy of `record` with the named fields encrypted. Other fields are
    /// left untouched.
    pub fn encrypt_fields<R>(&self, record: &R, names: &[&str], secret: &str) -> Result<R>
    where
        R: FieldRecord + Clone,
    {
        map_fields(record, names, |value| self.encrypt(value, secret))
    }

    /// Copy of `record` with the named fields decrypted.
    pub fn decrypt_fields<R>(&self, record: &R, names: &[&str], secret: &str) -> Result<R>
    where
        R: FieldRecord + Clone,
    {
        map_fields(record, names, |value| self.decrypt(value, secret))
    }

    /// Encrypt the personal fields of an applicant.
    pub fn encrypt_applicant(&self, applicant: &Applicant, secret: &str) -> Result<Applicant> {
        self.encrypt_fields(applicant, &Applicant::ENCRYPTED_FIELDS, secret)
    }

    /// Decrypt the personal fields of an applicant.
    pub fn decrypt_applicant(&self, applicant: &Applicant, secret: &str) -> Result<Applicant> {
        self.decrypt_fields(applicant, &Applicant::ENCRYPTED_FIELDS, secret)
    }
}

/// [`FieldCipher::encrypt_fields`] with default cost parameters.
pub fn encrypt_fields<R>(record: &R, names: &[&str], secret: &str) -> Result<R>
where
    R: FieldRecord + Clone,
{
    FieldCipher::default().encrypt_fields(record, names, secret)
}

/// [`FieldCipher::decrypt_fields`] with default cost parameters.
pub fn decrypt_fields<R>(record: &R, names: &[&str], secret: &str) -> Result<R>
where
    R: FieldRecord + Clone,
{
    FieldCipher::default().decrypt_fields(record, names, secret)
}
