//! Appointment models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{deserialize_id, timestamp_now};

/// Appointment lifecycle status.
///
/// `Upcoming` is the initial state; the front desk moves it to `Completed`
/// or `Cancelled`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    #[serde(alias = "Upcoming", alias = "Scheduled", alias = "scheduled")]
    Upcoming,
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "Cancelled")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Upcoming => "upcoming",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled appointments are final for the front desk.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Upcoming)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status string is not one of the three known values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(AppointmentStatus::Upcoming),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// A scheduled visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Registry ID; `None` when booked against a free-text name
    #[serde(default)]
    pub patient_id: Option<String>,
    /// Patient name as entered at booking time
    #[serde(default, alias = "patient")]
    pub patient_name: String,
    /// Naive local timestamp, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD HH:MM`
    #[serde(default, alias = "date")]
    pub date_time: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Appointment {
    /// Create an upcoming appointment from booking input.
    pub fn new(input: NewAppointment) -> Self {
        let now = timestamp_now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: input.patient_id,
            patient_name: input.patient_name,
            date_time: input.date_time,
            reason: input.reason,
            status: AppointmentStatus::Upcoming,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: AppointmentStatus) {
        self.status = status;
        self.updated_at = timestamp_now();
    }
}

/// Booking input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_id: Option<String>,
    pub patient_name: String,
    pub date_time: String,
    #[serde(default)]
    pub reason: String,
}
