//! Patient models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, timestamp_now};

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Opaque unique ID, generated locally and never changed
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Full name; also the join key for appointments booked by name only
    #[serde(default)]
    pub full_name: String,
    /// Date of birth (`YYYY-MM-DD`)
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    /// Free-text notes
    #[serde(default)]
    pub notes: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: String,
}

impl Patient {
    /// Build a fresh record from user input. Missing fields become empty strings.
    pub fn new(input: NewPatient) -> Self {
        let now = timestamp_now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: input.full_name,
            dob: input.dob.unwrap_or_default(),
            gender: input.gender.unwrap_or_default(),
            phone: input.phone.unwrap_or_default(),
            email: input.email.unwrap_or_default(),
            address: input.address.unwrap_or_default(),
            notes: input.notes.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Merge the set fields of `update` over this record and touch `updated_at`.
    pub fn apply(&mut self, update: PatientUpdate) {
        let PatientUpdate {
            full_name,
            dob,
            gender,
            phone,
            email,
            address,
            notes,
        } = update;

        let fields = [
            (&mut self.full_name, full_name),
            (&mut self.dob, dob),
            (&mut self.gender, gender),
            (&mut self.phone, phone),
            (&mut self.email, email),
            (&mut self.address, address),
            (&mut self.notes, notes),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        self.touch();
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = timestamp_now();
    }

    /// Trimmed display name.
    pub fn display_name(&self) -> &str {
        self.full_name.trim()
    }

    /// Age in whole years on `today`, or `None` if `dob` is missing or unparsable.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let dob = NaiveDate::parse_from_str(self.dob.trim(), "%Y-%m-%d").ok()?;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }
}

/// Input for registering a patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub full_name: String,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl NewPatient {
    pub fn named(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }
}

/// Partial update; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    pub full_name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}
