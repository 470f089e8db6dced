//! Dashboard KPIs.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::parse_local_datetime;
use crate::models::{ActivityEntry, Appointment, Patient};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    /// Distinct non-empty trimmed patient names
    pub patients: usize,
    /// Appointments scheduled on `today`
    pub todays_appointments: usize,
    /// Lab-tagged activity entries
    pub pending_labs: usize,
}

impl DashboardKpis {
    pub fn compute(
        patients: &[Patient],
        appointments: &[Appointment],
        activity: &[ActivityEntry],
        today: NaiveDate,
    ) -> Self {
        Self {
            patients: unique_patient_count(patients),
            todays_appointments: appointments_on(appointments, today),
            pending_labs: pending_lab_count(activity),
        }
    }
}

pub fn unique_patient_count(patients: &[Patient]) -> usize {
    patients
        .iter()
        .map(Patient::display_name)
        .filter(|name| !name.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Appointments whose date-time falls on `day`. Unparsable dates never count.
pub fn appointments_on(appointments: &[Appointment], day: NaiveDate) -> usize {
    appointments
        .iter()
        .filter_map(|a| parse_local_datetime(&a.date_time))
        .filter(|dt| dt.date() == day)
        .count()
}

pub fn pending_lab_count(activity: &[ActivityEntry]) -> usize {
    activity.iter().filter(|entry| entry.is_lab()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{activity_kind, ActivityMetadata, NewAppointment, NewPatient};

    fn appt(date_time: &str) -> Appointment {
        Appointment::new(NewAppointment {
            patient_name: "Jane Doe".into(),
            date_time: date_time.into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_unique_patients() {
        let patients = vec![
            Patient::new(NewPatient::named("Jane Doe")),
            Patient::new(NewPatient::named(" Jane Doe ")),
            Patient::new(NewPatient::named("John Roe")),
            Patient::new(NewPatient::named("   ")),
        ];
        assert_eq!(unique_patient_count(&patients), 2);
    }

    #[test]
    fn test_todays_appointments() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        let appointments = vec![
            appt("2025-11-20 09:30"),
            appt("2025-11-20T16:00"),
            appt("2025-11-21T09:00"),
            appt("not a date"),
            appt(""),
        ];
        assert_eq!(appointments_on(&appointments, today), 2);
    }

    #[test]
    fn test_compute() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        let patients = vec![Patient::new(NewPatient::named("Jane Doe"))];
        let appointments = vec![appt("2025-11-20T10:00")];
        let activity = vec![
            ActivityEntry::new("lab in".into(), ActivityMetadata::of_kind(activity_kind::LAB)),
            ActivityEntry::new(
                "booked".into(),
                ActivityMetadata::of_kind(activity_kind::APPOINTMENT_CREATED),
            ),
            ActivityEntry::new("lab in again".into(), ActivityMetadata::of_kind(activity_kind::LAB)),
        ];

        let kpis = DashboardKpis::compute(&patients, &appointments, &activity, today);
        assert_eq!(
            kpis,
            DashboardKpis {
                patients: 1,
                todays_appointments: 1,
                pending_labs: 2,
            }
        );
    }
}
