//! Patient repository.

use tracing::debug;

use super::{require, RepoResult};
use crate::models::{NewPatient, Patient, PatientUpdate};
use crate::store::{read_collection, Collection, KeyValueStore};

pub struct PatientRepository<'a> {
    store: &'a dyn KeyValueStore,
    key: &'a str,
}

impl<'a> PatientRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore, key: &'a str) -> Self {
        Self { store, key }
    }

    /// All patients, newest first.
    pub fn list(&self) -> Vec<Patient> {
        read_collection(self.store, self.key)
    }

    /// Get a patient by ID.
    pub fn get(&self, id: &str) -> Option<Patient> {
        self.list().into_iter().find(|p| p.id == id)
    }

    /// First patient whose trimmed name equals `name`.
    pub fn find_by_name(&self, name: &str) -> Option<Patient> {
        let name = name.trim();
        self.list().into_iter().find(|p| p.display_name() == name)
    }

    /// Register a patient and return the new record.
    pub fn create(&self, input: NewPatient) -> RepoResult<Patient> {
        require("fullName", &input.full_name)?;

        let patient = Patient::new(input);
        let mut patients: Collection<Patient> = Collection::load(self.store, self.key);
        patients.items.insert(0, patient.clone());
        patients.save(self.store, self.key)?;

        debug!(id = %patient.id, "created patient");
        Ok(patient)
    }

    /// Merge `update` into the patient with `id` and return the whole collection.
    pub fn update(&self, id: &str, update: PatientUpdate) -> RepoResult<Vec<Patient>> {
        if let Some(name) = &update.full_name {
            require("fullName", name)?;
        }

        let mut patients: Collection<Patient> = Collection::load(self.store, self.key);
        let Some(index) = patients.items.iter().position(|p| p.id == id) else {
            debug!(id, "update skipped, no such patient");
            return Ok(patients.into_items());
        };
        patients.items[index].apply(update);

        patients.save(self.store, self.key)?;
        debug!(id, "updated patient");
        Ok(patients.into_items())
    }
}
