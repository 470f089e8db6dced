//! Repositories: the sole owners of each persisted collection.
//!
//! Every mutation reads the whole collection, rewrites it and persists it
//! before returning. Validation failures are reported as errors and leave
//! storage untouched; unknown IDs are a no-op that returns the collection as is.

mod activity;
mod appointments;
mod lab_results;
mod patients;

pub use activity::*;
pub use appointments::*;
pub use lab_results::*;
pub use patients::*;

use thiserror::Error;

use crate::config::StorageKeys;
use crate::store::{KeyValueStore, StoreError};

/// Repository errors.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Reject blank required text fields.
pub(crate) fn require(field: &str, value: &str) -> RepoResult<()> {
    if value.trim().is_empty() {
        return Err(RepoError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// All four repositories over one store.
pub struct Repositories<'a> {
    pub patients: PatientRepository<'a>,
    pub appointments: AppointmentRepository<'a>,
    pub activity: ActivityRepository<'a>,
    pub lab_results: LabResultRepository<'a>,
}

impl<'a> Repositories<'a> {
    pub fn new(store: &'a dyn KeyValueStore, keys: &'a StorageKeys) -> Self {
        Self {
            patients: PatientRepository::new(store, &keys.patients),
            appointments: AppointmentRepository::new(store, &keys.appointments),
            activity: ActivityRepository::new(store, &keys.activity),
            lab_results: LabResultRepository::new(store, &keys.lab_results),
        }
    }
}
