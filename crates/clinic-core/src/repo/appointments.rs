//! Appointment repository.

use tracing::{debug, warn};

use super::{require, RepoError, RepoResult};
use crate::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::store::{read_collection, Collection, KeyValueStore};

pub struct AppointmentRepository<'a> {
    store: &'a dyn KeyValueStore,
    key: &'a str,
}

impl<'a> AppointmentRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore, key: &'a str) -> Self {
        Self { store, key }
    }

    /// All appointments, newest booking first.
    pub fn list(&self) -> Vec<Appointment> {
        read_collection(self.store, self.key)
    }

    pub fn get(&self, id: &str) -> Option<Appointment> {
        self.list().into_iter().find(|a| a.id == id)
    }

    /// Appointments linked to a registry ID (name-only bookings are not included).
    pub fn list_for_patient(&self, patient_id: &str) -> Vec<Appointment> {
        self.list()
            .into_iter()
            .filter(|a| a.patient_id.as_deref() == Some(patient_id))
            .collect()
    }

    /// Book an appointment. Requires a patient name and a date-time.
    pub fn create(&self, input: NewAppointment) -> RepoResult<Appointment> {
        require("patientName", &input.patient_name)?;
        require("dateTime", &input.date_time)?;

        let appointment = Appointment::new(input);
        let mut appointments: Collection<Appointment> = Collection::load(self.store, self.key);
        appointments.items.insert(0, appointment.clone());
        appointments.save(self.store, self.key)?;

        debug!(id = %appointment.id, "created appointment");
        Ok(appointment)
    }

    /// Remove an appointment and return the remaining collection.
    pub fn delete(&self, id: &str) -> RepoResult<Vec<Appointment>> {
        let mut appointments: Collection<Appointment> = Collection::load(self.store, self.key);
        let before = appointments.items.len();
        appointments.items.retain(|a| a.id != id);

        if appointments.items.len() == before {
            debug!(id, "delete skipped, no such appointment");
            return Ok(appointments.into_items());
        }

        appointments.save(self.store, self.key)?;
        debug!(id, "deleted appointment");
        Ok(appointments.into_items())
    }

    /// Set the status of an appointment and return the whole collection.
    ///
    /// `status` is matched case-insensitively against `upcoming`, `completed`
    /// and `cancelled`; anything else is rejected without touching storage.
    /// Terminal appointments may still be moved to another status.
    pub fn update_status(&self, id: &str, status: &str) -> RepoResult<Vec<Appointment>> {
        let status: AppointmentStatus = status.parse().map_err(|_| {
            warn!(id, status, "rejected invalid appointment status");
            RepoError::InvalidStatus(status.to_string())
        })?;

        let mut appointments: Collection<Appointment> = Collection::load(self.store, self.key);
        let Some(index) = appointments.items.iter().position(|a| a.id == id) else {
            debug!(id, "status update skipped, no such appointment");
            return Ok(appointments.into_items());
        };

        let appointment = &mut appointments.items[index];
        if appointment.status.is_terminal() && appointment.status != status {
            debug!(id, from = %appointment.status, to = %status, "re-transitioning terminal appointment");
        }
        appointment.set_status(status);

        appointments.save(self.store, self.key)?;
        debug!(id, %status, "updated appointment status");
        Ok(appointments.into_items())
    }
}
