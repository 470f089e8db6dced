//! Lab result repository.

use tracing::debug;

use super::{require, RepoError, RepoResult};
use crate::models::{LabResult, LabResultUpdate, NewLabResult};
use crate::store::{read_collection, Collection, KeyValueStore};

pub struct LabResultRepository<'a> {
    store: &'a dyn KeyValueStore,
    key: &'a str,
}

impl<'a> LabResultRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore, key: &'a str) -> Self {
        Self { store, key }
    }

    /// All lab results, oldest first.
    pub fn list(&self) -> Vec<LabResult> {
        read_collection(self.store, self.key)
    }

    pub fn list_for_patient(&self, patient_id: &str) -> Vec<LabResult> {
        self.list()
            .into_iter()
            .filter(|lab| lab.patient_id == patient_id)
            .collect()
    }

    /// Record a lab result. Patient ID, test name and value are required.
    pub fn create(&self, input: NewLabResult) -> RepoResult<LabResult> {
        require("patientId", &input.patient_id)?;
        require("testName", &input.test_name)?;
        if input.result_value.is_blank() {
            return Err(RepoError::Validation("resultValue is required".into()));
        }

        let lab = LabResult::new(input);
        let mut labs: Collection<LabResult> = Collection::load(self.store, self.key);
        labs.items.push(lab.clone());
        labs.save(self.store, self.key)?;

        debug!(id = %lab.id, patient_id = %lab.patient_id, "created lab result");
        Ok(lab)
    }

    /// Merge `update` into the lab result with `id` and return the whole collection.
    pub fn update(&self, id: &str, update: LabResultUpdate) -> RepoResult<Vec<LabResult>> {
        if let Some(test_name) = &update.test_name {
            require("testName", test_name)?;
        }
        if update.result_value.as_ref().is_some_and(|v| v.is_blank()) {
            return Err(RepoError::Validation("resultValue is required".into()));
        }

        let mut labs: Collection<LabResult> = Collection::load(self.store, self.key);
        let Some(index) = labs.items.iter().position(|lab| lab.id == id) else {
            debug!(id, "update skipped, no such lab result");
            return Ok(labs.into_items());
        };
        labs.items[index].apply(update);

        labs.save(self.store, self.key)?;
        debug!(id, "updated lab result");
        Ok(labs.into_items())
    }

    /// Soft-delete: flag the result as archived.
    pub fn archive(&self, id: &str) -> RepoResult<Vec<LabResult>> {
        self.update(
            id,
            LabResultUpdate {
                is_archived: Some(true),
                ..Default::default()
            },
        )
    }

    /// Hard delete.
    pub fn delete(&self, id: &str) -> RepoResult<Vec<LabResult>> {
        let mut labs: Collection<LabResult> = Collection::load(self.store, self.key);
        let before = labs.items.len();
        labs.items.retain(|lab| lab.id != id);

        if labs.items.len() == before {
            debug!(id, "delete skipped, no such lab result");
            return Ok(labs.into_items());
        }

        labs.save(self.store, self.key)?;
        debug!(id, "deleted lab result");
        Ok(labs.into_items())
    }
}
