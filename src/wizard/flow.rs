//! The wizard state machine.

use serde_json::Value;

use crate::error::{FimsError, Result};
use crate::forms::{FieldKind, FieldSpec, FormDefinition, FormState, ADDRESS, LOCATION_NAME, PLANNED_DATE};
use crate::inspection::{
    InspectionStatus, LoadedInspection, PendingPhoto, Submission, MAX_PHOTOS,
};
use crate::location::GpsFix;

use super::mode::FormMode;
use super::step::WizardStep;

/// Position and address captured on the location step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationState {
    pub fix: Option<GpsFix>,
    pub address: String,
}

/// How the wizard is finished on its last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishAction {
    Submit,
    SaveDraft,
}

impl FinishAction {
    pub fn status(self) -> InspectionStatus {
        match self {
            FinishAction::Submit => InspectionStatus::Submitted,
            FinishAction::SaveDraft => InspectionStatus::Draft,
        }
    }
}

/// One inspection form being filled, edited or viewed.
#[derive(Debug, Clone)]
pub struct Wizard {
    definition: FormDefinition,
    mode: FormMode,
    step: WizardStep,
    state: FormState,
    location: LocationState,
    pending_photos: Vec<PendingPhoto>,
    existing_photos: usize,
    existing_id: Option<String>,
    category_id: Option<String>,
}

impl Wizard {
    /// Start a new inspection.
    pub fn create(definition: FormDefinition) -> Self {
        let state = FormState::new(&definition);
        Self {
            definition,
            mode: FormMode::Create,
            step: WizardStep::Metadata,
            state,
            location: LocationState::default(),
            pending_photos: Vec::new(),
            existing_photos: 0,
            existing_id: None,
            category_id: None,
        }
    }

    /// Reopen a stored inspection for editing or viewing.
    pub fn open(loaded: &LoadedInspection, mode: FormMode) -> Self {
        let record = &loaded.record;
        Self {
            definition: loaded.definition.clone(),
            mode,
            step: WizardStep::Metadata,
            state: loaded.state.clone(),
            location: LocationState {
                fix: record.fix(),
                address: record.address.clone().unwrap_or_default(),
            },
            pending_photos: Vec::new(),
            existing_photos: loaded.photos.len(),
            existing_id: Some(record.id.clone()),
            category_id: Some(record.category_id.clone()),
        }
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn location(&self) -> &LocationState {
        &self.location
    }

    pub fn pending_photos(&self) -> &[PendingPhoto] {
        &self.pending_photos
    }

    pub fn existing_photo_count(&self) -> usize {
        self.existing_photos
    }

    /// Stored plus pending photos.
    pub fn photo_count(&self) -> usize {
        self.existing_photos + self.pending_photos.len()
    }

    pub fn existing_id(&self) -> Option<&str> {
        self.existing_id.as_deref()
    }

    pub fn is_read_only(&self) -> bool {
        self.mode.is_read_only()
    }

    /// Fields rendered on a step.
    pub fn step_fields(&self, step: WizardStep) -> Vec<FieldSpec> {
        match step {
            WizardStep::Metadata => self.definition.metadata_fields(),
            WizardStep::Location => self.definition.location_fields(),
            WizardStep::Checklist => self.definition.checklist.clone(),
            WizardStep::Photos => Vec::new(),
        }
    }

    /// Current value of a field.
    pub fn value(&self, key: &str) -> Option<Value> {
        if key == ADDRESS {
            return match self.location.address.as_str() {
                "" => Some(Value::Null),
                address => Some(Value::from(address)),
            };
        }
        self.state.get(key).cloned()
    }

    /// Keys of required fields on `step` that are still empty.
    pub fn missing_fields(&self, step: WizardStep) -> Vec<String> {
        self.step_fields(step)
            .into_iter()
            .filter(|f| f.required && !f.is_filled(self.value(&f.key).as_ref()))
            .map(|f| f.key)
            .collect()
    }

    /// Derived score, for forms that keep one.
    pub fn score(&self) -> Option<u64> {
        self.state.score(&self.definition)
    }

    /// Advance one step. Outside view mode the current step's required
    /// fields must be filled first.
    pub fn next(&mut self) -> Result<WizardStep> {
        let target = self.step.next().ok_or_else(|| FimsError::InvalidTransition {
            step: self.step.to_string(),
            direction: "forward".to_string(),
        })?;
        if !self.is_read_only() {
            let missing = self.missing_fields(self.step);
            if !missing.is_empty() {
                return Err(FimsError::StepIncomplete {
                    step: self.step.to_string(),
                    missing,
                });
            }
        }
        self.step = target;
        Ok(target)
    }

    /// Go back one step. Never guarded.
    pub fn previous(&mut self) -> Result<WizardStep> {
        let target = self
            .step
            .previous()
            .ok_or_else(|| FimsError::InvalidTransition {
                step: self.step.to_string(),
                direction: "back".to_string(),
            })?;
        self.step = target;
        Ok(target)
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.is_read_only() {
            Err(FimsError::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn field(&self, key: &str) -> Result<FieldSpec> {
        self.definition
            .field(key)
            .ok_or_else(|| FimsError::InvalidField {
                key: key.to_string(),
                message: format!("not a field of the {} form", self.definition.form_type),
            })
    }

    /// Set a field to an already-typed value.
    pub fn set_field(&mut self, key: &str, value: Value) -> Result<()> {
        self.ensure_writable()?;
        let field = self.field(key)?;
        field.validate(&value)?;

        if key == ADDRESS {
            self.location.address = value.as_str().unwrap_or_default().trim().to_string();
        } else {
            self.state.set(&self.definition, key, value);
        }
        Ok(())
    }

    /// Parse raw text input for a field and set it.
    pub fn set_input(&mut self, key: &str, input: &str) -> Result<()> {
        self.ensure_writable()?;
        let value = self.field(key)?.parse_input(input)?;
        self.set_field(key, value)
    }

    /// Flip a boolean field, returning its new value.
    pub fn toggle(&mut self, key: &str) -> Result<bool> {
        self.ensure_writable()?;
        let field = self.field(key)?;
        if !field.is_bool() {
            return Err(FimsError::InvalidField {
                key: key.to_string(),
                message: "only yes/no fields can be toggled".to_string(),
            });
        }
        let flipped = !matches!(self.state.get(key), Some(Value::Bool(true)));
        self.state.set(&self.definition, key, Value::Bool(flipped));
        Ok(flipped)
    }

    /// Replace the rows of a table field.
    pub fn set_table_rows(&mut self, key: &str, rows: Vec<Value>) -> Result<()> {
        let field = self.field(key)?;
        if !matches!(field.kind, FieldKind::Table { .. }) {
            return Err(FimsError::InvalidField {
                key: key.to_string(),
                message: "not a table field".to_string(),
            });
        }
        self.set_field(key, Value::Array(rows))
    }

    pub fn set_location(&mut self, fix: GpsFix) -> Result<()> {
        self.ensure_writable()?;
        self.location.fix = Some(fix);
        Ok(())
    }

    pub fn set_address(&mut self, address: &str) -> Result<()> {
        self.set_field(ADDRESS, Value::from(address))
    }

    /// Queue a photo for upload.
    pub fn add_photo(&mut self, photo: PendingPhoto) -> Result<()> {
        self.ensure_writable()?;
        if self.photo_count() >= MAX_PHOTOS {
            return Err(FimsError::PhotoLimitExceeded { max: MAX_PHOTOS });
        }
        self.pending_photos.push(photo);
        Ok(())
    }

    /// Drop a queued photo by position.
    pub fn remove_photo(&mut self, index: usize) -> Result<PendingPhoto> {
        self.ensure_writable()?;
        if index >= self.pending_photos.len() {
            return Err(FimsError::InvalidField {
                key: "photo".to_string(),
                message: format!("no pending photo #{}", index + 1),
            });
        }
        Ok(self.pending_photos.remove(index))
    }

    /// Finish the wizard from its last step.
    ///
    /// Submitting requires every step's required fields; saving a draft
    /// does not.
    pub fn finish(&self, action: FinishAction) -> Result<Submission> {
        self.ensure_writable()?;
        if !self.step.is_last() {
            return Err(FimsError::InvalidTransition {
                step: self.step.to_string(),
                direction: "finish".to_string(),
            });
        }
        if action == FinishAction::Submit {
            for step in WizardStep::ALL {
                let missing = self.missing_fields(step);
                if !missing.is_empty() {
                    return Err(FimsError::StepIncomplete {
                        step: step.to_string(),
                        missing,
                    });
                }
            }
        }

        let address = Some(self.location.address.clone()).filter(|a| !a.is_empty());
        Ok(Submission {
            form_type: self.definition.form_type.clone(),
            existing_id: self.existing_id.clone(),
            category_id: self.category_id.clone(),
            status: action.status(),
            location_name: self.state.text(LOCATION_NAME).unwrap_or_default(),
            address,
            fix: self.location.fix,
            planned_date: self.state.text(PLANNED_DATE),
            form_data: self.state.blob(&self.definition),
            photos: self.pending_photos.clone(),
            existing_photo_count: self.existing_photos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormCatalog;
    use serde_json::json;

    fn office() -> Wizard {
        let forms = FormCatalog::builtin().unwrap();
        Wizard::create(forms.get("office").unwrap().clone())
    }

    fn fill_metadata(wizard: &mut Wizard) {
        wizard.set_input(LOCATION_NAME, "Haveli Taluka Office").unwrap();
        wizard.set_input("department_name", "Revenue").unwrap();
        wizard.set_input("employee_name", "S. Jadhav").unwrap();
    }

    #[test]
    fn next_is_guarded_by_required_fields() {
        let mut wizard = office();
        let err = wizard.next().unwrap_err();
        match err {
            FimsError::StepIncomplete { missing, .. } => {
                assert!(missing.contains(&LOCATION_NAME.to_string()));
                assert!(missing.contains(&"department_name".to_string()));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(wizard.step(), WizardStep::Metadata);

        fill_metadata(&mut wizard);
        assert_eq!(wizard.next().unwrap(), WizardStep::Location);
    }

    #[test]
    fn previous_is_never_guarded() {
        let mut wizard = office();
        fill_metadata(&mut wizard);
        wizard.next().unwrap();
        wizard.set_input(LOCATION_NAME, "").unwrap();
        assert_eq!(wizard.previous().unwrap(), WizardStep::Metadata);
        assert!(wizard.previous().is_err());
    }

    #[test]
    fn toggle_twice_restores_value() {
        let mut wizard = office();
        let before = wizard.value("attendance_register");
        assert!(wizard.toggle("attendance_register").unwrap());
        assert_eq!(wizard.score(), Some(1));
        assert!(!wizard.toggle("attendance_register").unwrap());
        assert_eq!(wizard.value("attendance_register"), before);
        assert_eq!(wizard.score(), Some(0));
    }

    #[test]
    fn toggle_rejects_text_fields() {
        let mut wizard = office();
        assert!(wizard.toggle("remarks").is_err());
    }

    #[test]
    fn unknown_and_derived_fields_are_rejected() {
        let mut wizard = office();
        assert!(wizard.set_field("nonsense", json!(1)).is_err());
        assert!(wizard.set_field("evaluation_score", json!(19)).is_err());
    }

    #[test]
    fn address_lives_in_location_state() {
        let mut wizard = office();
        wizard.set_address("  Shivajinagar, Pune ").unwrap();
        assert_eq!(wizard.location().address, "Shivajinagar, Pune");
        assert_eq!(wizard.value(ADDRESS), Some(json!("Shivajinagar, Pune")));
        assert!(!wizard.state().values().contains_key(ADDRESS));
    }

    #[test]
    fn finish_only_from_last_step() {
        let mut wizard = office();
        fill_metadata(&mut wizard);
        assert!(matches!(
            wizard.finish(FinishAction::SaveDraft),
            Err(FimsError::InvalidTransition { .. })
        ));
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        let submission = wizard.finish(FinishAction::Submit).unwrap();
        assert_eq!(submission.status, InspectionStatus::Submitted);
        assert_eq!(submission.location_name, "Haveli Taluka Office");
        assert!(submission.planned_date.is_none());
        assert_eq!(submission.form_data["evaluation_score"], json!(0));
    }

    #[test]
    fn draft_skips_required_checks() {
        let forms = FormCatalog::builtin().unwrap();
        let zp = forms.get("zp_monthly_report").unwrap().clone();
        let mut wizard = Wizard::create(zp);
        fill_zp_metadata(&mut wizard);
        wizard.next().unwrap();
        wizard.next().unwrap();
        // The report table is required on the checklist step.
        assert!(wizard.next().is_err());

        wizard
            .set_table_rows("report_rows", vec![json!({"scheme_name": "Jal Jeevan"})])
            .unwrap();
        wizard.next().unwrap();
        wizard
            .set_table_rows("report_rows", vec![])
            .unwrap();

        assert!(wizard.finish(FinishAction::Submit).is_err());
        let draft = wizard.finish(FinishAction::SaveDraft).unwrap();
        assert_eq!(draft.status, InspectionStatus::Draft);
    }

    fn fill_zp_metadata(wizard: &mut Wizard) {
        wizard.set_input(LOCATION_NAME, "ZP Pune").unwrap();
        wizard.set_input("report_month", "2026-01").unwrap();
        wizard.set_input("department_name", "Health").unwrap();
    }

    #[test]
    fn table_rows_are_capped() {
        let forms = FormCatalog::builtin().unwrap();
        let mut wizard = Wizard::create(forms.get("zp_monthly_report").unwrap().clone());
        let rows = vec![json!({"scheme_name": "A"}); 4];
        assert!(wizard.set_table_rows("report_rows", rows).is_err());
    }
}
