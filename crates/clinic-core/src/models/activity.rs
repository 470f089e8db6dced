//! Activity (audit log) models.

use serde::{Deserialize, Serialize};

use super::{deserialize_id, epoch_millis_now};

/// Category tags written by the front desk workflows.
pub mod activity_kind {
    pub const APPOINTMENT_CREATED: &str = "APPOINTMENT_CREATED";
    pub const APPOINTMENT_DELETED: &str = "APPOINTMENT_DELETED";
    pub const APPOINTMENT_STATUS: &str = "APPOINTMENT_STATUS";
    /// Lab upload; counted as a pending lab on the dashboard
    pub const LAB: &str = "lab";
}

/// One line of the rolling activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Human-readable description
    #[serde(default, alias = "text")]
    pub message: String,
    /// Category tag, see [`activity_kind`]
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Type of the related entity (e.g. "appointment", "labResult")
    #[serde(default)]
    pub entity_type: Option<String>,
    /// ID of the related entity
    #[serde(default)]
    pub entity_id: Option<String>,
    /// Patient the entry is about, when known
    #[serde(default)]
    pub patient_id: Option<String>,
    /// Patient name at the time of logging
    #[serde(default)]
    pub patient_name: Option<String>,
    /// Milliseconds since the Unix epoch; 0 when the entry was logged undated
    #[serde(default)]
    pub created_at: i64,
}

impl ActivityEntry {
    pub fn new(message: String, metadata: ActivityMetadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message,
            kind: metadata.kind,
            entity_type: metadata.entity_type,
            entity_id: metadata.entity_id,
            patient_id: metadata.patient_id,
            patient_name: metadata.patient_name,
            created_at: epoch_millis_now(),
        }
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }

    pub fn is_lab(&self) -> bool {
        self.is_kind(activity_kind::LAB)
    }
}

/// Optional tags attached to a new activity entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityMetadata {
    pub kind: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
}

impl ActivityMetadata {
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    /// Reference the entity this entry is about.
    pub fn entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Reference the patient this entry is about.
    pub fn patient(mut self, patient_id: impl Into<String>, patient_name: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self.patient_name = Some(patient_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry() {
        let meta = ActivityMetadata::of_kind(activity_kind::LAB).patient("p1", "Jane Doe");
        let entry = ActivityEntry::new("New lab result uploaded for Jane Doe".into(), meta);

        assert!(entry.is_lab());
        assert_eq!(entry.patient_id.as_deref(), Some("p1"));
        assert!(entry.created_at > 0);
    }

    #[test]
    fn test_type_field_name() {
        let entry = ActivityEntry::new(
            "Appointment created".into(),
            ActivityMetadata::of_kind(activity_kind::APPOINTMENT_CREATED).entity("appointment", "a1"),
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "APPOINTMENT_CREATED");
        assert_eq!(value["entityType"], "appointment");
        assert!(value["createdAt"].is_i64());
    }

    #[test]
    fn test_deserialize_untagged_entry() {
        let entry: ActivityEntry =
            serde_json::from_str(r#"{"id":"x","message":"hello","createdAt":1700000000000}"#).unwrap();
        assert!(entry.kind.is_none());
        assert!(!entry.is_lab());
    }
}
