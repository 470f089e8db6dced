//! Front-desk workflows.
//!
//! Each user action goes through the owning repository first and then leaves
//! a line in the activity log. The log write is best-effort: the action has
//! already been persisted, so a failed log write is reported but not raised.

use chrono::NaiveDate;
use tracing::warn;

use crate::config::StorageKeys;
use crate::models::{
    activity_kind, ActivityEntry, ActivityMetadata, Appointment, AppointmentStatus, LabResult,
    NewAppointment, NewLabResult, Patient,
};
use crate::repo::{RepoError, RepoResult, Repositories};
use crate::store::KeyValueStore;
use crate::views::{build_timeline, parse_local_datetime, DashboardKpis, TimelineEvent};

const DATE_LABEL_FORMAT: &str = "%d %b %Y, %H:%M";

pub struct Clinic<'a> {
    repos: Repositories<'a>,
}

impl<'a> Clinic<'a> {
    pub fn new(store: &'a dyn KeyValueStore, keys: &'a StorageKeys) -> Self {
        Self {
            repos: Repositories::new(store, keys),
        }
    }

    pub fn repositories(&self) -> &Repositories<'a> {
        &self.repos
    }

    /// Dashboard KPIs for `today`.
    pub fn kpis(&self, today: NaiveDate) -> DashboardKpis {
        DashboardKpis::compute(
            &self.repos.patients.list(),
            &self.repos.appointments.list(),
            &self.repos.activity.list(),
            today,
        )
    }

    /// Timeline for a registered patient, `None` if the patient is unknown.
    pub fn timeline(&self, patient_id: &str) -> Option<Vec<TimelineEvent>> {
        let patient = self.repos.patients.get(patient_id)?;
        Some(build_timeline(
            &patient,
            &self.repos.appointments.list(),
            &self.repos.activity.list(),
        ))
    }

    /// Book an appointment and log it.
    ///
    /// A booking made by name only is linked to the registered patient with
    /// exactly that (trimmed) name, if there is one.
    pub fn schedule_appointment(&self, mut input: NewAppointment) -> RepoResult<Appointment> {
        if input.patient_id.is_none() {
            input.patient_id = self
                .repos
                .patients
                .find_by_name(&input.patient_name)
                .map(|p| p.id);
        }

        let appointment = self.repos.appointments.create(input)?;

        let message = format!(
            "Appointment created with {} on {}",
            appointment.patient_name.trim(),
            pretty_date(&appointment.date_time)
        );
        self.log(
            &message,
            ActivityMetadata::of_kind(activity_kind::APPOINTMENT_CREATED)
                .entity("appointment", appointment.id.clone()),
        );
        Ok(appointment)
    }

    /// Delete an appointment and log it.
    pub fn delete_appointment(&self, id: &str) -> RepoResult<Vec<Appointment>> {
        let existing = self.repos.appointments.get(id);
        let remaining = self.repos.appointments.delete(id)?;

        let message = match &existing {
            Some(appt) => {
                let name = display_or(&appt.patient_name, "Unknown patient");
                match parse_local_datetime(&appt.date_time) {
                    Some(dt) => format!(
                        "Appointment deleted for {} on {}",
                        name,
                        dt.format(DATE_LABEL_FORMAT)
                    ),
                    None => format!("Appointment deleted for {}", name),
                }
            }
            None => format!("Appointment deleted (#{})", id),
        };
        self.log(
            &message,
            ActivityMetadata::of_kind(activity_kind::APPOINTMENT_DELETED).entity("appointment", id),
        );
        Ok(remaining)
    }

    /// Change an appointment's status and log it.
    pub fn set_appointment_status(&self, id: &str, status: &str) -> RepoResult<Vec<Appointment>> {
        let appointments = self.repos.appointments.update_status(id, status)?;

        let Some(appt) = appointments.iter().find(|a| a.id == id) else {
            return Ok(appointments);
        };

        let action = match appt.status {
            AppointmentStatus::Completed => "marked as completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Upcoming => "marked as upcoming",
        };
        let name = display_or(&appt.patient_name, "Unknown patient");
        let message = match parse_local_datetime(&appt.date_time) {
            Some(dt) => format!(
                "Appointment for {} on {} {}.",
                name,
                dt.format(DATE_LABEL_FORMAT),
                action
            ),
            None => format!("Appointment for {} {}.", name, action),
        };
        self.log(
            &message,
            ActivityMetadata::of_kind(activity_kind::APPOINTMENT_STATUS).entity("appointment", id),
        );
        Ok(appointments)
    }

    /// Log a lab upload for a registered patient.
    ///
    /// The entry counts toward Pending Labs and shows on the patient's timeline.
    pub fn record_lab_result(&self, patient_id: &str) -> RepoResult<Vec<ActivityEntry>> {
        let patient = self.require_patient(patient_id)?;
        self.repos.activity.add(
            &lab_message(&patient),
            ActivityMetadata::of_kind(activity_kind::LAB)
                .patient(patient.id.clone(), patient.full_name.clone()),
        )
    }

    /// Store a full lab result for a registered patient and log the upload.
    pub fn record_lab_result_detail(&self, mut input: NewLabResult) -> RepoResult<LabResult> {
        let patient = self.require_patient(&input.patient_id)?;
        if input.patient_name.is_none() {
            input.patient_name = Some(patient.full_name.clone());
        }

        let lab = self.repos.lab_results.create(input)?;
        self.log(
            &lab_message(&patient),
            ActivityMetadata::of_kind(activity_kind::LAB)
                .entity("labResult", lab.id.clone())
                .patient(patient.id.clone(), patient.full_name.clone()),
        );
        Ok(lab)
    }

    fn require_patient(&self, patient_id: &str) -> RepoResult<Patient> {
        self.repos
            .patients
            .get(patient_id)
            .ok_or_else(|| RepoError::Validation(format!("unknown patient {}", patient_id)))
    }

    fn log(&self, message: &str, metadata: ActivityMetadata) {
        if let Err(e) = self.repos.activity.add(message, metadata) {
            warn!(error = %e, message, "failed to write activity entry");
        }
    }
}

fn lab_message(patient: &Patient) -> String {
    format!(
        "New lab result uploaded for {}",
        display_or(&patient.full_name, "Unnamed patient")
    )
}

fn pretty_date(raw: &str) -> String {
    parse_local_datetime(raw)
        .map(|dt| dt.format(DATE_LABEL_FORMAT).to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

fn display_or<'s>(value: &'s str, fallback: &'s str) -> &'s str {
    let value = value.trim();
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPatient;
    use crate::store::MemoryStore;

    fn booking(name: &str) -> NewAppointment {
        NewAppointment {
            patient_id: None,
            patient_name: name.into(),
            date_time: "2025-11-20T10:00".into(),
            reason: "Annual physical".into(),
        }
    }

    #[test]
    fn test_schedule_links_patient_and_logs() {
        let store = MemoryStore::new();
        let keys = StorageKeys::default();
        let clinic = Clinic::new(&store, &keys);
        let jane = clinic
            .repositories()
            .patients
            .create(NewPatient::named("Jane Doe"))
            .unwrap();

        let appt = clinic.schedule_appointment(booking(" Jane Doe ")).unwrap();
        assert_eq!(appt.patient_id.as_deref(), Some(jane.id.as_str()));

        let log = clinic.repositories().activity.list();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].message, "Appointment created with Jane Doe on 20 Nov 2025, 10:00");
        assert!(log[0].is_kind(activity_kind::APPOINTMENT_CREATED));
        assert_eq!(log[0].entity_id.as_deref(), Some(appt.id.as_str()));
    }

    #[test]
    fn test_schedule_unregistered_name() {
        let store = MemoryStore::new();
        let keys = StorageKeys::default();
        let clinic = Clinic::new(&store, &keys);

        let appt = clinic.schedule_appointment(booking("Walk In")).unwrap();
        assert!(appt.patient_id.is_none());
    }

    #[test]
    fn test_status_and_delete_messages() {
        let store = MemoryStore::new();
        let keys = StorageKeys::default();
        let clinic = Clinic::new(&store, &keys);
        let appt = clinic.schedule_appointment(booking("Jane Doe")).unwrap();

        clinic.set_appointment_status(&appt.id, "cancelled").unwrap();
        clinic.delete_appointment(&appt.id).unwrap();
        clinic.delete_appointment("ghost").unwrap();

        let messages: Vec<String> = clinic
            .repositories()
            .activity
            .list()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "Appointment deleted (#ghost)".to_string(),
                "Appointment deleted for Jane Doe on 20 Nov 2025, 10:00".to_string(),
                "Appointment for Jane Doe on 20 Nov 2025, 10:00 cancelled.".to_string(),
                "Appointment created with Jane Doe on 20 Nov 2025, 10:00".to_string(),
            ]
        );
    }

    #[test]
    fn test_invalid_status_not_logged() {
        let store = MemoryStore::new();
        let keys = StorageKeys::default();
        let clinic = Clinic::new(&store, &keys);
        let appt = clinic.schedule_appointment(booking("Jane Doe")).unwrap();

        let result = clinic.set_appointment_status(&appt.id, "postponed");
        assert!(matches!(result, Err(RepoError::InvalidStatus(_))));
        assert_eq!(clinic.repositories().activity.list().len(), 1);
    }

    #[test]
    fn test_record_lab_result() {
        let store = MemoryStore::new();
        let keys = StorageKeys::default();
        let clinic = Clinic::new(&store, &keys);
        let jane = clinic
            .repositories()
            .patients
            .create(NewPatient::named("Jane Doe"))
            .unwrap();

        let log = clinic.record_lab_result(&jane.id).unwrap();
        assert_eq!(log[0].message, "New lab result uploaded for Jane Doe");
        assert_eq!(log[0].patient_id.as_deref(), Some(jane.id.as_str()));

        let lab = clinic
            .record_lab_result_detail(NewLabResult::new(jane.id.clone(), "HbA1c", 6.1))
            .unwrap();
        assert_eq!(lab.patient_name, "Jane Doe");

        let today = chrono::Local::now().date_naive();
        assert_eq!(clinic.kpis(today).pending_labs, 2);
        assert_eq!(clinic.timeline(&jane.id).map(|t| t.len()), Some(2));

        assert!(matches!(
            clinic.record_lab_result("nobody"),
            Err(RepoError::Validation(_))
        ));
        assert!(clinic.timeline("nobody").is_none());
    }
}
