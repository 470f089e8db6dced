//! Patient list search and sorting.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::timestamp_millis;
use crate::models::Patient;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Name,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Search term plus sort order for the patient registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatientQuery {
    pub term: String,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl PatientQuery {
    pub fn with_term(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    /// Selecting the active key again flips the direction; a new key starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort = key;
            self.direction = SortDirection::Asc;
        }
    }

    /// Case-insensitive substring match on name, email or phone.
    pub fn matches(&self, patient: &Patient) -> bool {
        let term = self.term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [&patient.full_name, &patient.email, &patient.phone]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    fn compare(&self, a: &Patient, b: &Patient) -> Ordering {
        let ordering = match self.sort {
            SortKey::Name => a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()),
            // Missing or unparsable timestamps sort as the epoch
            SortKey::CreatedAt => {
                let a = timestamp_millis(&a.created_at).unwrap_or(0);
                let b = timestamp_millis(&b.created_at).unwrap_or(0);
                a.cmp(&b)
            }
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Filter and sort `patients`. Ties keep their input order.
pub fn search_patients(patients: &[Patient], query: &PatientQuery) -> Vec<Patient> {
    let mut results: Vec<Patient> = patients
        .iter()
        .filter(|p| query.matches(p))
        .cloned()
        .collect();
    results.sort_by(|a, b| query.compare(a, b));
    results
}

/// Distinct non-empty trimmed names, in first-seen order.
pub fn patient_name_options(patients: &[Patient]) -> Vec<String> {
    let mut seen = HashSet::new();
    patients
        .iter()
        .map(Patient::display_name)
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPatient;

    fn patient(name: &str, email: &str, phone: &str, created_at: &str) -> Patient {
        let mut p = Patient::new(NewPatient {
            full_name: name.into(),
            email: Some(email.into()),
            phone: Some(phone.into()),
            ..Default::default()
        });
        p.created_at = created_at.into();
        p
    }

    fn registry() -> Vec<Patient> {
        vec![
            patient("charlie Brown", "cb@example.com", "555-0003", "2025-01-03T00:00:00.000Z"),
            patient("Alice Smith", "alice@example.com", "555-0001", "2025-01-01T00:00:00.000Z"),
            patient("bob Jones", "bjones@clinic.org", "555-0002", "2025-01-02T00:00:00.000Z"),
        ]
    }

    fn names(patients: &[Patient]) -> Vec<&str> {
        patients.iter().map(|p| p.full_name.as_str()).collect()
    }

    #[test]
    fn test_search_fields() {
        let patients = registry();

        let by_name = search_patients(&patients, &PatientQuery::with_term("ALICE"));
        assert_eq!(names(&by_name), vec!["Alice Smith"]);

        let by_email = search_patients(&patients, &PatientQuery::with_term("clinic.org"));
        assert_eq!(names(&by_email), vec!["bob Jones"]);

        let by_phone = search_patients(&patients, &PatientQuery::with_term(" 0003 "));
        assert_eq!(names(&by_phone), vec!["charlie Brown"]);

        assert!(search_patients(&patients, &PatientQuery::with_term("zed")).is_empty());
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let patients = registry();
        let mut query = PatientQuery::default();

        let sorted = search_patients(&patients, &query);
        assert_eq!(names(&sorted), vec!["Alice Smith", "bob Jones", "charlie Brown"]);

        query.toggle_sort(SortKey::Name);
        assert_eq!(query.direction, SortDirection::Desc);
        let sorted = search_patients(&patients, &query);
        assert_eq!(names(&sorted), vec!["charlie Brown", "bob Jones", "Alice Smith"]);
    }

    #[test]
    fn test_sort_by_created_at() {
        let mut patients = registry();
        patients.push(patient("Dora Lee", "", "", "not a timestamp"));

        let mut query = PatientQuery::default();
        query.toggle_sort(SortKey::CreatedAt);
        assert_eq!(query.direction, SortDirection::Asc);

        let sorted = search_patients(&patients, &query);
        assert_eq!(
            names(&sorted),
            vec!["Dora Lee", "Alice Smith", "bob Jones", "charlie Brown"]
        );

        query.toggle_sort(SortKey::CreatedAt);
        let sorted = search_patients(&patients, &query);
        assert_eq!(sorted[0].full_name, "charlie Brown");
    }

    #[test]
    fn test_stable_ties() {
        let first = patient("Same Name", "first@example.com", "", "");
        let second = patient("same name", "second@example.com", "", "");
        let patients = vec![first.clone(), second.clone()];

        let mut query = PatientQuery::default();
        assert_eq!(search_patients(&patients, &query), vec![first.clone(), second.clone()]);

        query.toggle_sort(SortKey::Name);
        assert_eq!(search_patients(&patients, &query), vec![first, second]);
    }

    #[test]
    fn test_name_options() {
        let patients = vec![
            Patient::new(NewPatient::named("Jane Doe")),
            Patient::new(NewPatient::named("John Roe ")),
            Patient::new(NewPatient::named(" Jane Doe")),
            Patient::new(NewPatient::named("")),
        ];
        assert_eq!(patient_name_options(&patients), vec!["Jane Doe", "John Roe"]);
    }
}
