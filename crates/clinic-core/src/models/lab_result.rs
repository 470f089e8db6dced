//! Lab result models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{deserialize_id, epoch_millis_now, UnknownStatus};

/// Lab result workflow status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LabStatus {
    Pending,
    #[default]
    Final,
    Corrected,
}

impl LabStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabStatus::Pending => "pending",
            LabStatus::Final => "final",
            LabStatus::Corrected => "corrected",
        }
    }
}

impl fmt::Display for LabStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabStatus {
    type Err = UnknownStatus;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(LabStatus::Pending),
            "final" => Ok(LabStatus::Final),
            "corrected" => Ok(LabStatus::Corrected),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// A measured value: numeric readings stay numbers on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Text(String),
}

impl ResultValue {
    /// Empty text counts as missing.
    pub fn is_blank(&self) -> bool {
        matches!(self, ResultValue::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Number(n) => write!(f, "{}", n),
            ResultValue::Text(t) => f.write_str(t),
        }
    }
}

impl From<f64> for ResultValue {
    fn from(value: f64) -> Self {
        ResultValue::Number(value)
    }
}

impl From<&str> for ResultValue {
    fn from(value: &str) -> Self {
        ResultValue::Text(value.to_string())
    }
}

/// A lab test result attached to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub appointment_id: Option<String>,
    /// e.g. "Blood Sugar (Fasting)"
    pub test_name: String,
    pub result_value: ResultValue,
    /// e.g. "mg/dL"
    #[serde(default)]
    pub unit: String,
    /// e.g. "70-110 mg/dL"
    #[serde(default)]
    pub reference_range: String,
    #[serde(default)]
    pub status: LabStatus,
    #[serde(default)]
    pub is_archived: bool,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub updated_at: i64,
}

impl LabResult {
    pub fn new(input: NewLabResult) -> Self {
        let now = epoch_millis_now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: input.patient_id,
            patient_name: input.patient_name.unwrap_or_default(),
            appointment_id: input.appointment_id,
            test_name: input.test_name,
            result_value: input.result_value,
            unit: input.unit.unwrap_or_default(),
            reference_range: input.reference_range.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the set fields of `update` and touch `updated_at`.
    pub fn apply(&mut self, update: LabResultUpdate) {
        if let Some(test_name) = update.test_name {
            self.test_name = test_name;
        }
        if let Some(value) = update.result_value {
            self.result_value = value;
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(range) = update.reference_range {
            self.reference_range = range;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(archived) = update.is_archived {
            self.is_archived = archived;
        }
        if let Some(appointment_id) = update.appointment_id {
            self.appointment_id = Some(appointment_id);
        }
        self.updated_at = epoch_millis_now();
    }
}

/// Input for recording a lab result.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLabResult {
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub appointment_id: Option<String>,
    pub test_name: String,
    pub result_value: ResultValue,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
    pub status: Option<LabStatus>,
}

impl NewLabResult {
    pub fn new(
        patient_id: impl Into<String>,
        test_name: impl Into<String>,
        result_value: impl Into<ResultValue>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            patient_name: None,
            appointment_id: None,
            test_name: test_name.into(),
            result_value: result_value.into(),
            unit: None,
            reference_range: None,
            status: None,
        }
    }
}

/// Partial update; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabResultUpdate {
    pub appointment_id: Option<String>,
    pub test_name: Option<String>,
    pub result_value: Option<ResultValue>,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
    pub status: Option<LabStatus>,
    pub is_archived: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!("Pending".parse::<LabStatus>(), Ok(LabStatus::Pending));
        assert_eq!("FINAL".parse::<LabStatus>(), Ok(LabStatus::Final));
        assert_eq!("corrected".parse::<LabStatus>(), Ok(LabStatus::Corrected));
        assert_eq!(
            "lost".parse::<LabStatus>(),
            Err(UnknownStatus("lost".into()))
        );
    }

    #[test]
    fn test_status_as_str_matches_wire_form() {
        for status in [LabStatus::Pending, LabStatus::Final, LabStatus::Corrected] {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<LabStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_new_lab_defaults() {
        let lab = LabResult::new(NewLabResult::new("p1", "Blood Sugar (Fasting)", 92.0));
        assert_eq!(lab.status, LabStatus::Final);
        assert!(!lab.is_archived);
        assert_eq!(lab.unit, "");
        assert_eq!(lab.created_at, lab.updated_at);
    }

    #[test]
    fn test_result_value_wire_format() {
        let number: ResultValue = serde_json::from_str("5.4").unwrap();
        let text: ResultValue = serde_json::from_str(r#""negative""#).unwrap();
        assert_eq!(number, ResultValue::Number(5.4));
        assert_eq!(text.to_string(), "negative");
        assert!(ResultValue::from("  ").is_blank());
    }

    #[test]
    fn test_apply_update() {
        let mut lab = LabResult::new(NewLabResult::new("p1", "HbA1c", 6.1));
        lab.apply(LabResultUpdate {
            status: Some(LabStatus::Corrected),
            result_value: Some(5.9.into()),
            ..Default::default()
        });
        assert_eq!(lab.status, LabStatus::Corrected);
        assert_eq!(lab.result_value, ResultValue::Number(5.9));
        assert_eq!(lab.patient_id, "p1");
    }
}
