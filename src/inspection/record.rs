//! Stored inspection records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{FimsError, Result};
use crate::location::GpsFix;
use crate::store::Row;

/// Lifecycle state of an inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspectionStatus {
    Draft,
    Submitted,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Draft => "draft",
            InspectionStatus::Submitted => "submitted",
        }
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InspectionStatus {
    type Err = FimsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(InspectionStatus::Draft),
            "submitted" => Ok(InspectionStatus::Submitted),
            other => Err(FimsError::InvalidField {
                key: "status".to_string(),
                message: format!("unknown status '{}'", other),
            }),
        }
    }
}

/// A row of the inspections table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Human-readable number, `<PREFIX>-<millis>`.
    pub inspection_number: String,

    #[serde(deserialize_with = "string_or_number")]
    pub category_id: String,

    #[serde(default)]
    pub location_name: String,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Accuracy radius in meters.
    #[serde(default)]
    pub location_accuracy: Option<f64>,

    #[serde(default)]
    pub planned_date: Option<NaiveDate>,

    /// Set when the inspection is submitted.
    #[serde(default)]
    pub inspection_date: Option<DateTime<Utc>>,

    pub status: InspectionStatus,

    /// Form-specific answers, keyed by field.
    #[serde(default)]
    pub form_data: Map<String, Value>,

    #[serde(default)]
    pub inspector: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InspectionRecord {
    /// Decode a backend row.
    pub fn from_row(row: Row) -> Result<Self> {
        serde_json::from_value(Value::Object(row)).map_err(|e| FimsError::backend("decode", e))
    }

    /// The stored position, if both coordinates were captured.
    pub fn fix(&self) -> Option<GpsFix> {
        let (latitude, longitude) = (self.latitude?, self.longitude?);
        Some(GpsFix {
            latitude,
            longitude,
            accuracy_m: self.location_accuracy,
            captured_at: self.updated_at.unwrap_or(self.created_at),
        })
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn decodes_numeric_ids() {
        let record = InspectionRecord::from_row(row(json!({
            "id": 42,
            "inspection_number": "OFF-1700000000000",
            "category_id": 7,
            "location_name": "Taluka Office",
            "status": "draft",
            "created_at": "2026-01-05T10:00:00Z"
        })))
        .unwrap();

        assert_eq!(record.id, "42");
        assert_eq!(record.category_id, "7");
        assert_eq!(record.status, InspectionStatus::Draft);
        assert!(record.form_data.is_empty());
        assert!(record.fix().is_none());
    }

    #[test]
    fn null_planned_date_decodes_to_none() {
        let record = InspectionRecord::from_row(row(json!({
            "id": "1",
            "inspection_number": "GP-1",
            "category_id": "cat-grampanchayat",
            "planned_date": null,
            "latitude": 18.5,
            "longitude": 73.8,
            "status": "submitted",
            "created_at": "2026-01-05T10:00:00Z"
        })))
        .unwrap();

        assert!(record.planned_date.is_none());
        let fix = record.fix().unwrap();
        assert_eq!(fix.latitude, 18.5);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Submitted".parse::<InspectionStatus>().unwrap(),
            InspectionStatus::Submitted
        );
        assert!("archived".parse::<InspectionStatus>().is_err());
    }
}
