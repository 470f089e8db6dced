//! Domain models for the clinic front desk.

mod activity;
mod appointment;
mod lab_result;
mod patient;

pub use activity::*;
pub use appointment::*;
pub use lab_result::*;
pub use patient::*;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};

/// Current instant as an ISO-8601 UTC string with millisecond precision.
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Record IDs written by older front-desk builds are numbers; read them as text.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Integer(id) => id.to_string(),
        RawId::Float(id) => id.to_string(),
    })
}

/// Current instant in milliseconds since the Unix epoch.
pub(crate) fn epoch_millis_now() -> i64 {
    Utc::now().timestamp_millis()
}
