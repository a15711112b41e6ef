//! Applicant (sample submitter) records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ApplicantId;

/// A person whose sample sits on a plate.
///
/// `pacient_name`, `personal_number`, `sample_code` and `sender` are personal
/// data and are only ever persisted encrypted. The id and the dates are
/// stored in clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub pacient_name: String,
    pub personal_number: String,
    pub sample_code: String,
    pub sender: String,
    #[serde(default)]
    pub sample_collection_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sample_receive_date: Option<DateTime<Utc>>,
}

impl Applicant {
    /// Fields that must be encrypted at rest.
    pub const ENCRYPTED_FIELDS: [&'static str; 4] =
        ["pacient_name", "personal_number", "sample_code", "sender"];

    /// Read one of the string fields by its stored name.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "pacient_name" => Some(&self.pacient_name),
            "personal_number" => Some(&self.personal_number),
            "sample_code" => Some(&self.sample_code),
            "sender" => Some(&self.sender),
            _ => None,
        }
    }

    /// Mutable access to one of the string fields by its stored name.
    pub fn text_field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "pacient_name" => Some(&mut self.pacient_name),
            "personal_number" => Some(&mut self.personal_number),
            "sample_code" => Some(&mut self.sample_code),
            "sender" => Some(&mut self.sender),
            _ => None,
        }
    }
}
