//! Per-patient timeline: appointments and lab activity merged in date order.
//!
//! Records are joined to the patient by registry ID whenever they carry one.
//! Records without an ID fall back to name matching, and lab entries finally
//! to a substring search of the message. Those fallbacks can produce false
//! positives; every event reports which rule matched it.

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::{local_datetime_from_millis, parse_local_datetime};
use crate::models::{ActivityEntry, Appointment, Patient};

const EVENT_LABEL_FORMAT: &str = "%d %b %Y, %H:%M";
const DAY_LABEL_FORMAT: &str = "%d %b %Y";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimelineEventKind {
    Appointment,
    Lab,
}

/// How a record was attributed to the patient.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PatientMatch {
    /// Record references the patient's registry ID
    ById,
    /// Denormalized patient name equals the patient's name
    ByName,
    /// Patient's name appears in the activity message
    ByMessage,
}

impl PatientMatch {
    /// True for the best-effort fallbacks.
    pub fn is_heuristic(&self) -> bool {
        !matches!(self, PatientMatch::ById)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// `appt-<id>` or `lab-<id>`
    pub id: String,
    pub kind: TimelineEventKind,
    pub date: NaiveDateTime,
    /// Display date, e.g. "20 Nov 2025, 10:00"
    pub label: String,
    pub title: String,
    pub description: String,
    pub matched_by: PatientMatch,
}

/// Timeline events sharing one calendar day.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDay {
    pub date: NaiveDate,
    /// e.g. "20 Nov 2025"
    pub label: String,
    pub events: Vec<TimelineEvent>,
}

/// Decide whether an appointment belongs to `patient`.
pub fn match_appointment(patient: &Patient, appointment: &Appointment) -> Option<PatientMatch> {
    if let Some(patient_id) = non_empty(appointment.patient_id.as_deref()) {
        return (patient_id == patient.id).then_some(PatientMatch::ById);
    }

    let name = patient.display_name();
    (!name.is_empty() && appointment.patient_name.trim() == name).then_some(PatientMatch::ByName)
}

/// Decide whether a lab-tagged activity entry belongs to `patient`.
pub fn match_lab_activity(patient: &Patient, entry: &ActivityEntry) -> Option<PatientMatch> {
    if !entry.is_lab() {
        return None;
    }

    if let Some(patient_id) = non_empty(entry.patient_id.as_deref()) {
        return (patient_id == patient.id).then_some(PatientMatch::ById);
    }

    let name = patient.display_name().to_lowercase();
    if name.is_empty() {
        return None;
    }

    let stored_name = entry
        .patient_name
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if stored_name == name {
        return Some(PatientMatch::ByName);
    }

    entry
        .message
        .to_lowercase()
        .contains(&name)
        .then_some(PatientMatch::ByMessage)
}

/// Build the patient's timeline, oldest event first.
pub fn build_timeline(
    patient: &Patient,
    appointments: &[Appointment],
    activity: &[ActivityEntry],
) -> Vec<TimelineEvent> {
    let appointment_events = appointments.iter().filter_map(|appt| {
        let matched_by = match_appointment(patient, appt)?;
        let date = parse_local_datetime(&appt.date_time)?;
        Some(TimelineEvent {
            id: format!("appt-{}", appt.id),
            kind: TimelineEventKind::Appointment,
            date,
            label: date.format(EVENT_LABEL_FORMAT).to_string(),
            title: "Appointment".into(),
            description: appointment_description(appt),
            matched_by,
        })
    });

    let lab_events = activity.iter().filter_map(|entry| {
        let matched_by = match_lab_activity(patient, entry)?;
        // Undated entries have no place on the timeline
        if entry.created_at <= 0 {
            return None;
        }
        let date = local_datetime_from_millis(entry.created_at)?;
        let description = if entry.message.trim().is_empty() {
            "Lab update".to_string()
        } else {
            entry.message.clone()
        };
        Some(TimelineEvent {
            id: format!("lab-{}", entry.id),
            kind: TimelineEventKind::Lab,
            date,
            label: date.format(EVENT_LABEL_FORMAT).to_string(),
            title: "Lab result".into(),
            description,
            matched_by,
        })
    });

    let mut seen = HashSet::new();
    let mut events: Vec<TimelineEvent> = appointment_events
        .chain(lab_events)
        .filter(|event| seen.insert(event.id.clone()))
        .collect();

    events.sort_by_key(|event| event.date);
    events
}

/// Group events by calendar day, days in ascending order.
///
/// Events keep their relative order within a day.
pub fn group_by_day(events: &[TimelineEvent]) -> Vec<TimelineDay> {
    let mut days: BTreeMap<NaiveDate, Vec<TimelineEvent>> = BTreeMap::new();
    for event in events {
        days.entry(event.date.date()).or_default().push(event.clone());
    }

    days.into_iter()
        .map(|(date, events)| TimelineDay {
            date,
            label: date.format(DAY_LABEL_FORMAT).to_string(),
            events,
        })
        .collect()
}

fn appointment_description(appt: &Appointment) -> String {
    let reason = appt.reason.trim();
    if reason.is_empty() {
        let status = appt.status.as_str();
        let mut chars = status.chars();
        match chars.next() {
            Some(first) => format!("{}{} appointment", first.to_uppercase(), chars.as_str()),
            None => "Appointment".into(),
        }
    } else {
        format!("{} ({})", reason, appt.status)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{activity_kind, ActivityMetadata, NewAppointment, NewPatient};

    fn patient(name: &str) -> Patient {
        Patient::new(NewPatient::named(name))
    }

    fn appt(patient_id: Option<&str>, name: &str, date_time: &str) -> Appointment {
        Appointment::new(NewAppointment {
            patient_id: patient_id.map(Into::into),
            patient_name: name.into(),
            date_time: date_time.into(),
            reason: "Check-up".into(),
        })
    }

    fn lab(message: &str, meta: ActivityMetadata) -> ActivityEntry {
        ActivityEntry::new(message.into(), meta)
    }

    #[test]
    fn test_appointment_matching() {
        let jane = patient("Jane Doe");

        let by_id = appt(Some(jane.id.as_str()), "J. Doe", "2025-01-01T09:00");
        let by_name = appt(None, " Jane Doe", "2025-01-01T09:00");
        let other_id = appt(Some("someone-else"), "Jane Doe", "2025-01-01T09:00");

        assert_eq!(match_appointment(&jane, &by_id), Some(PatientMatch::ById));
        assert_eq!(match_appointment(&jane, &by_name), Some(PatientMatch::ByName));
        assert_eq!(match_appointment(&jane, &other_id), None);
    }

    #[test]
    fn test_lab_matching_rules() {
        let jane = patient("Jane Doe");
        let lab_kind = || ActivityMetadata::of_kind(activity_kind::LAB);

        let by_id = lab("Result in", lab_kind().patient(jane.id.clone(), "Someone"));
        let by_name = lab("Result in", ActivityMetadata {
            patient_name: Some("jane doe".into()),
            ..lab_kind()
        });
        let by_message = lab("New lab result uploaded for JANE DOE", lab_kind());
        let not_lab = lab(
            "Appointment created with Jane Doe",
            ActivityMetadata::of_kind(activity_kind::APPOINTMENT_CREATED),
        );
        let other_patient = lab(
            "New lab result uploaded for Jane Doe",
            lab_kind().patient("someone-else", "Jane Doe"),
        );

        assert_eq!(match_lab_activity(&jane, &by_id), Some(PatientMatch::ById));
        assert_eq!(match_lab_activity(&jane, &by_name), Some(PatientMatch::ByName));
        assert_eq!(match_lab_activity(&jane, &by_message), Some(PatientMatch::ByMessage));
        assert_eq!(match_lab_activity(&jane, &not_lab), None);
        assert_eq!(match_lab_activity(&jane, &other_patient), None);

        assert!(PatientMatch::ByMessage.is_heuristic());
        assert!(!PatientMatch::ById.is_heuristic());
    }

    #[test]
    fn test_timeline_sorted_and_filtered() {
        let jane = patient("Jane Doe");
        let appointments = vec![
            appt(Some(jane.id.as_str()), "Jane Doe", "2030-05-01 09:00"),
            appt(Some(jane.id.as_str()), "Jane Doe", "2020-05-01T09:00"),
            appt(Some(jane.id.as_str()), "Jane Doe", "whenever"),
            appt(None, "John Roe", "2021-01-01T09:00"),
        ];
        let activity = vec![lab(
            "Result in",
            ActivityMetadata::of_kind(activity_kind::LAB).patient(jane.id.clone(), "Jane Doe"),
        )];

        let events = build_timeline(&jane, &appointments, &activity);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].label, "01 May 2020, 09:00");
        assert_eq!(events[1].kind, TimelineEventKind::Lab);
        assert_eq!(events[2].id, format!("appt-{}", appointments[0].id));
        assert_eq!(events[0].description, "Check-up (upcoming)");
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_description_without_reason() {
        let mut a = appt(None, "Jane Doe", "2025-01-01T09:00");
        a.reason = String::new();
        assert_eq!(appointment_description(&a), "Upcoming appointment");
    }

    #[test]
    fn test_group_by_day() {
        let jane = patient("Jane Doe");
        let appointments = vec![
            appt(None, "Jane Doe", "2025-03-02T15:00"),
            appt(None, "Jane Doe", "2025-03-01T10:00"),
            appt(None, "Jane Doe", "2025-03-02T08:30"),
        ];

        let events = build_timeline(&jane, &appointments, &[]);
        let days = group_by_day(&events);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].label, "01 Mar 2025");
        assert_eq!(days[1].events.len(), 2);
        assert_eq!(days[1].events[0].label, "02 Mar 2025, 08:30");
    }

    #[test]
    fn test_empty_inputs() {
        let jane = patient("Jane Doe");
        assert!(build_timeline(&jane, &[], &[]).is_empty());
        assert!(group_by_day(&[]).is_empty());
    }
}
