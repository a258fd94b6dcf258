//! Answers collected for one form.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::definition::{common_metadata_fields, FormDefinition, LOCATION_NAME, PLANNED_DATE};
use super::field::DATE_FORMAT;

/// Field values keyed by field key: the shared metadata fields plus the
/// form's own blob fields, and the derived score when the form has one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: Map<String, Value>,
}

impl FormState {
    /// Initial values for a new inspection.
    pub fn new(definition: &FormDefinition) -> Self {
        let mut values = Map::new();
        for field in common_metadata_fields().iter().chain(definition.blob_fields()) {
            values.insert(field.key.clone(), field.initial_value());
        }
        let mut state = Self { values };
        state.refresh_score(definition);
        state
    }

    /// Rebuild the state of a stored inspection.
    ///
    /// Unknown blob keys are dropped; missing ones keep their initial value.
    pub fn from_parts(
        definition: &FormDefinition,
        location_name: &str,
        planned_date: Option<NaiveDate>,
        form_data: &Map<String, Value>,
    ) -> Self {
        let mut state = Self::new(definition);
        state
            .values
            .insert(LOCATION_NAME.to_string(), Value::from(location_name));
        state.values.insert(
            PLANNED_DATE.to_string(),
            planned_date
                .map(|d| Value::String(d.format(DATE_FORMAT).to_string()))
                .unwrap_or(Value::Null),
        );
        for field in definition.blob_fields() {
            if let Some(value) = form_data.get(&field.key) {
                state.values.insert(field.key.clone(), value.clone());
            }
        }
        state.refresh_score(definition);
        state
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store a value. Callers validate against the field first.
    pub fn set(&mut self, definition: &FormDefinition, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
        self.refresh_score(definition);
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// A trimmed, non-empty string value.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Number of true checklist booleans, for forms that keep a score.
    pub fn score(&self, definition: &FormDefinition) -> Option<u64> {
        definition.score_field.as_ref()?;
        let count = definition
            .scored_fields()
            .filter(|f| matches!(self.values.get(&f.key), Some(Value::Bool(true))))
            .count();
        Some(count as u64)
    }

    /// The stored answer blob: every form field plus the score.
    pub fn blob(&self, definition: &FormDefinition) -> Map<String, Value> {
        let mut blob = Map::new();
        for field in definition.blob_fields() {
            let value = self
                .values
                .get(&field.key)
                .cloned()
                .unwrap_or_else(|| field.initial_value());
            blob.insert(field.key.clone(), value);
        }
        if let (Some(key), Some(score)) = (&definition.score_field, self.score(definition)) {
            blob.insert(key.clone(), Value::from(score));
        }
        blob
    }

    fn refresh_score(&mut self, definition: &FormDefinition) {
        if let (Some(key), Some(score)) = (&definition.score_field, self.score(definition)) {
            self.values.insert(key.clone(), Value::from(score));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormCatalog;
    use serde_json::json;

    #[test]
    fn new_state_starts_unchecked() {
        let forms = FormCatalog::builtin().unwrap();
        let office = forms.get("office").unwrap();
        let state = FormState::new(office);

        assert_eq!(state.get(LOCATION_NAME), Some(&Value::Null));
        assert_eq!(state.get("attendance_register"), Some(&json!(false)));
        assert_eq!(state.score(office), Some(0));
        assert_eq!(state.get("evaluation_score"), Some(&json!(0)));
    }

    #[test]
    fn score_follows_checked_booleans() {
        let forms = FormCatalog::builtin().unwrap();
        let office = forms.get("office").unwrap();
        let mut state = FormState::new(office);

        state.set(office, "attendance_register", json!(true));
        state.set(office, "toilet_facility", json!(true));

        assert_eq!(state.score(office), Some(2));
        assert_eq!(state.blob(office)["evaluation_score"], json!(2));
    }

    #[test]
    fn forms_without_score_have_none() {
        let forms = FormCatalog::builtin().unwrap();
        let zp = forms.get("zp_monthly_report").unwrap();
        let state = FormState::new(zp);
        assert_eq!(state.score(zp), None);
        assert!(!state.blob(zp).contains_key("score"));
    }

    #[test]
    fn from_parts_restores_answers() {
        let forms = FormCatalog::builtin().unwrap();
        let office = forms.get("office").unwrap();
        let blob = json!({"attendance_register": true, "department_name": "Revenue", "stale": 1});

        let state = FormState::from_parts(
            office,
            "Haveli",
            NaiveDate::from_ymd_opt(2026, 1, 5),
            blob.as_object().unwrap(),
        );

        assert_eq!(state.text(LOCATION_NAME).as_deref(), Some("Haveli"));
        assert_eq!(state.get(PLANNED_DATE), Some(&json!("2026-01-05")));
        assert_eq!(state.text("department_name").as_deref(), Some("Revenue"));
        assert!(state.get("stale").is_none());
        assert_eq!(state.score(office), Some(1));
    }

    #[test]
    fn blob_excludes_common_fields() {
        let forms = FormCatalog::builtin().unwrap();
        let office = forms.get("office").unwrap();
        let blob = FormState::new(office).blob(office);
        assert!(!blob.contains_key(LOCATION_NAME));
        assert!(!blob.contains_key(PLANNED_DATE));
        assert!(blob.contains_key("remarks"));
    }
}
