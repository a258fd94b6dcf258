//! Drives a [`Wizard`] through a [`UserInterface`].
//!
//! Prompt keys double as `FIMS_PROMPT_<KEY>` overrides in non-interactive
//! runs:
//!
//! | Key | Asked for |
//! |-----|-----------|
//! | `<field key>` | each metadata, location and checklist field |
//! | `<table>_count`, `<table>_<row>_<column>` | table rows and cells |
//! | `latitude`, `longitude` | coordinates when no position source is set |
//! | `relocate` | re-capturing an existing position |
//! | `photo_action`, `photo_path`, `photo_description`, `photo_remove` | photos |
//! | `nav` | moving between steps |
//! | `final_action` | `submit`, `draft`, `previous` or `cancel` on the last step |

use serde_json::Value;

use crate::error::{FimsError, Result};
use crate::forms::{FieldKind, FieldSpec};
use crate::inspection::{PendingPhoto, Submission, MAX_PHOTOS};
use crate::location::{GpsFix, PositionOptions, PositionSource, ReverseGeocoder};
use crate::ui::{Prompt, PromptOption, PromptResult, UserInterface};

use super::flow::{FinishAction, Wizard};
use super::step::WizardStep;

/// How a wizard run ended.
#[derive(Debug)]
pub enum WizardOutcome {
    /// Finished with a submission ready to be written.
    Finished(Submission),
    /// Abandoned by the inspector; nothing is written.
    Cancelled,
    /// A view-mode run was closed.
    Closed,
}

enum Nav {
    Next,
    Previous,
    Finish(FinishAction),
    Cancel,
    Close,
}

/// Renders steps, asks for field values and handles navigation.
pub struct WizardRunner<'a> {
    ui: &'a mut dyn UserInterface,
    position: Option<Box<dyn PositionSource>>,
    options: PositionOptions,
    geocoder: Option<&'a dyn ReverseGeocoder>,
}

impl<'a> WizardRunner<'a> {
    pub fn new(ui: &'a mut dyn UserInterface) -> Self {
        Self {
            ui,
            position: None,
            options: PositionOptions::default(),
            geocoder: None,
        }
    }

    /// Use `source` for the location step instead of asking for coordinates.
    pub fn with_position(
        mut self,
        source: Option<Box<dyn PositionSource>>,
        options: PositionOptions,
    ) -> Self {
        self.position = source;
        self.options = options;
        self
    }

    pub fn with_geocoder(mut self, geocoder: Option<&'a dyn ReverseGeocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    /// Walk the wizard until it is finished, cancelled or closed.
    pub fn run(&mut self, wizard: &mut Wizard) -> Result<WizardOutcome> {
        self.ui.show_header(&wizard.definition().display_title());

        loop {
            let step = wizard.step();
            self.ui.show_progress(step.number(), WizardStep::TOTAL);
            self.ui.show_header(step.title());

            if wizard.is_read_only() {
                self.render_step(wizard, step);
            } else {
                match step {
                    WizardStep::Metadata | WizardStep::Checklist => {
                        self.fill_fields(wizard, step)?
                    }
                    WizardStep::Location => self.fill_location(wizard)?,
                    WizardStep::Photos => self.fill_photos(wizard)?,
                }
            }

            match self.navigate(wizard)? {
                Nav::Next => {
                    if let Err(e) = wizard.next() {
                        self.recoverable(e)?;
                    }
                }
                Nav::Previous => {
                    wizard.previous()?;
                }
                Nav::Finish(action) => match wizard.finish(action) {
                    Ok(submission) => return Ok(WizardOutcome::Finished(submission)),
                    Err(e) => self.recoverable(e)?,
                },
                Nav::Cancel => return Ok(WizardOutcome::Cancelled),
                Nav::Close => return Ok(WizardOutcome::Closed),
            }
        }
    }

    /// Warn and carry on when a person can fix the problem; fail otherwise.
    fn recoverable(&mut self, error: FimsError) -> Result<()> {
        let fixable = matches!(
            error,
            FimsError::StepIncomplete { .. } | FimsError::InvalidField { .. }
        );
        if fixable && self.ui.is_interactive() {
            self.ui.warning(&error.to_string());
            Ok(())
        } else {
            Err(error)
        }
    }

    fn navigate(&mut self, wizard: &Wizard) -> Result<Nav> {
        let step = wizard.step();
        let back = PromptOption::new("previous", "Back / मागे");

        let (key, options, default) = if wizard.is_read_only() {
            let mut options = Vec::new();
            if !step.is_last() {
                options.push(PromptOption::new("next", "Next / पुढे"));
            }
            if step.previous().is_some() {
                options.push(back);
            }
            options.push(PromptOption::new("close", "Close / बंद करा"));
            let default = if step.is_last() { "close" } else { "next" };
            ("nav", options, default)
        } else if step.is_last() {
            let options = vec![
                PromptOption::new("submit", "Submit inspection / तपासणी सादर करा"),
                PromptOption::new("draft", "Save as draft / मसुदा जतन करा"),
                back,
                PromptOption::new("cancel", "Cancel / रद्द करा"),
            ];
            ("final_action", options, "submit")
        } else {
            let mut options = vec![PromptOption::new("next", "Next / पुढे")];
            if step.previous().is_some() {
                options.push(back);
            }
            options.push(PromptOption::new("cancel", "Cancel / रद्द करा"));
            ("nav", options, "next")
        };

        let choice = self
            .ui
            .prompt(&Prompt::select(key, "What next?", options, default))?
            .as_string();
        Ok(match choice.as_str() {
            "next" => Nav::Next,
            "previous" => Nav::Previous,
            "submit" => Nav::Finish(FinishAction::Submit),
            "draft" => Nav::Finish(FinishAction::SaveDraft),
            "close" => Nav::Close,
            _ => Nav::Cancel,
        })
    }

    fn fill_fields(&mut self, wizard: &mut Wizard, step: WizardStep) -> Result<()> {
        for field in wizard.step_fields(step) {
            if matches!(field.kind, FieldKind::Table { .. }) {
                self.fill_table(wizard, &field)?;
            } else {
                self.fill_scalar(wizard, &field)?;
            }
        }
        if step == WizardStep::Checklist {
            if let Some(score) = wizard.score() {
                let out_of = wizard.definition().scored_fields().count();
                self.ui
                    .message(&format!("Score / गुण: {} of {}", score, out_of));
            }
        }
        Ok(())
    }

    fn fill_scalar(&mut self, wizard: &mut Wizard, field: &FieldSpec) -> Result<()> {
        loop {
            let current = wizard.value(&field.key);
            let prompt = field_prompt(field, current.as_ref(), &field.key, "");
            let result = match self.ui.prompt(&prompt)? {
                PromptResult::Bool(b) => wizard.set_field(&field.key, Value::Bool(b)),
                PromptResult::String(s) => wizard.set_input(&field.key, &s),
            };
            match result {
                Ok(()) => return Ok(()),
                Err(e) => self.recoverable(e)?,
            }
        }
    }

    fn fill_table(&mut self, wizard: &mut Wizard, field: &FieldSpec) -> Result<()> {
        let FieldKind::Table { columns, max_rows } = &field.kind else {
            return Ok(());
        };
        let existing = wizard
            .value(&field.key)
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default();

        let count = loop {
            let default = existing.len().max(usize::from(field.required)).to_string();
            let answer = self
                .ui
                .prompt(&Prompt::input(
                    &format!("{}_count", field.key),
                    &format!("{}: number of rows (0-{})", field.display_label(), max_rows),
                    Some(&default),
                ))?
                .as_string();
            match answer.trim().parse::<usize>() {
                Ok(n) if n <= *max_rows => break n,
                _ => self.recoverable(FimsError::InvalidField {
                    key: field.key.clone(),
                    message: format!("enter a number from 0 to {}", max_rows),
                })?,
            }
        };

        let mut rows = Vec::with_capacity(count);
        for index in 0..count {
            let mut row = existing
                .get(index)
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_else(|| field.empty_row());

            for column in columns {
                let key = format!("{}_{}_{}", field.key, index + 1, column.key);
                let prefix = format!("Row {}: ", index + 1);
                loop {
                    let prompt = field_prompt(column, row.get(&column.key), &key, &prefix);
                    let parsed = match self.ui.prompt(&prompt)? {
                        PromptResult::Bool(b) => Ok(Value::Bool(b)),
                        PromptResult::String(s) => column.parse_input(&s),
                    };
                    match parsed {
                        Ok(value) => {
                            row.insert(column.key.clone(), value);
                            break;
                        }
                        Err(e) => self.recoverable(e)?,
                    }
                }
            }
            rows.push(Value::Object(row));
        }

        wizard.set_table_rows(&field.key, rows)
    }

    fn fill_location(&mut self, wizard: &mut Wizard) -> Result<()> {
        let capture = match wizard.location().fix {
            Some(fix) => {
                self.ui.message(&format!("Current location: {}", describe_fix(&fix)));
                self.ui
                    .prompt(&Prompt::confirm(
                        "relocate",
                        "Capture the location again? / स्थान पुन्हा घ्यायचे?",
                        false,
                    ))?
                    .as_bool()
                    .unwrap_or(false)
            }
            None => true,
        };

        if capture {
            let looked_up = match self.position.as_mut() {
                Some(source) => {
                    let mut spinner = self.ui.start_spinner("Locating... / स्थान शोधत आहे...");
                    let result = source.current_position(&self.options);
                    match &result {
                        Ok(fix) => spinner.finish_success(&describe_fix(fix)),
                        Err(_) => spinner.finish_error("Location unavailable"),
                    }
                    Some(result)
                }
                None => None,
            };

            match looked_up {
                Some(Ok(fix)) => {
                    wizard.set_location(fix)?;
                    self.lookup_address(wizard)?;
                }
                Some(Err(e)) => self.ui.error(&e.to_string()),
                None => self.prompt_coordinates(wizard)?,
            }
        }

        for field in wizard.step_fields(WizardStep::Location) {
            self.fill_scalar(wizard, &field)?;
        }
        Ok(())
    }

    fn prompt_coordinates(&mut self, wizard: &mut Wizard) -> Result<()> {
        loop {
            let latitude = self
                .ui
                .prompt(&Prompt::input(
                    "latitude",
                    "Latitude / अक्षांश (blank to skip)",
                    None,
                ))?
                .as_string();
            if latitude.trim().is_empty() {
                self.ui.warning("No location recorded for this inspection");
                return Ok(());
            }
            let longitude = self
                .ui
                .prompt(&Prompt::input("longitude", "Longitude / रेखांश", None))?
                .as_string();

            match parse_coordinates(&latitude, &longitude) {
                Ok(fix) => {
                    wizard.set_location(fix)?;
                    return self.lookup_address(wizard);
                }
                Err(e) if self.ui.is_interactive() => self.ui.warning(&e.to_string()),
                Err(e) => return Err(e),
            }
        }
    }

    fn lookup_address(&mut self, wizard: &mut Wizard) -> Result<()> {
        let (Some(geocoder), Some(fix)) = (self.geocoder, wizard.location().fix) else {
            return Ok(());
        };
        match geocoder.reverse(fix.latitude, fix.longitude) {
            Ok(address) => wizard.set_address(&address),
            Err(e) => {
                tracing::warn!("Reverse geocoding failed: {}", e);
                Ok(())
            }
        }
    }

    fn fill_photos(&mut self, wizard: &mut Wizard) -> Result<()> {
        loop {
            self.list_photos(wizard);
            // Scripted runs attach photos up front; there is nobody to ask.
            if !self.ui.is_interactive() {
                return Ok(());
            }

            let mut options = Vec::new();
            if wizard.photo_count() < MAX_PHOTOS {
                options.push(PromptOption::new("add", "Add a photo / छायाचित्र जोडा"));
            }
            if !wizard.pending_photos().is_empty() {
                options.push(PromptOption::new("remove", "Remove a photo / छायाचित्र काढा"));
            }
            options.push(PromptOption::new("done", "Done / पूर्ण"));

            let action = self
                .ui
                .prompt(&Prompt::select("photo_action", "Photos", options, "done"))?
                .as_string();
            match action.as_str() {
                "add" => self.add_photo(wizard)?,
                "remove" => self.remove_photo(wizard)?,
                _ => return Ok(()),
            }
        }
    }

    fn list_photos(&mut self, wizard: &Wizard) {
        self.ui.message(&format!(
            "Photos / छायाचित्रे: {} of {}",
            wizard.photo_count(),
            MAX_PHOTOS
        ));
        if wizard.existing_photo_count() > 0 {
            self.ui.message(&format!(
                "  {} already attached",
                wizard.existing_photo_count()
            ));
        }
        for (index, photo) in wizard.pending_photos().iter().enumerate() {
            let description = if photo.description.is_empty() {
                String::new()
            } else {
                format!(" ({})", photo.description)
            };
            self.ui.message(&format!(
                "  {}. {}{}",
                index + 1,
                photo.file_name(),
                description
            ));
        }
    }

    fn add_photo(&mut self, wizard: &mut Wizard) -> Result<()> {
        if wizard.photo_count() >= MAX_PHOTOS {
            self.ui
                .warning(&FimsError::PhotoLimitExceeded { max: MAX_PHOTOS }.to_string());
            return Ok(());
        }
        let path = self
            .ui
            .prompt(&Prompt::input("photo_path", "Photo file / छायाचित्र फाइल", None))?
            .as_string();
        if path.trim().is_empty() {
            return Ok(());
        }
        let description = self
            .ui
            .prompt(&Prompt::input("photo_description", "Description / वर्णन", None))?
            .as_string();

        match PendingPhoto::new(path.trim(), &description).and_then(|p| wizard.add_photo(p)) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.ui.warning(&e.to_string());
                Ok(())
            }
        }
    }

    fn remove_photo(&mut self, wizard: &mut Wizard) -> Result<()> {
        let options = wizard
            .pending_photos()
            .iter()
            .enumerate()
            .map(|(i, p)| PromptOption::new(&(i + 1).to_string(), &p.file_name()))
            .collect();
        let choice = self
            .ui
            .prompt(&Prompt::select("photo_remove", "Remove which photo?", options, "1"))?
            .as_string();
        let index = choice.parse::<usize>().unwrap_or(0);
        match index.checked_sub(1).map(|i| wizard.remove_photo(i)) {
            Some(Ok(_)) => Ok(()),
            Some(Err(e)) => {
                self.ui.warning(&e.to_string());
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn render_step(&mut self, wizard: &Wizard, step: WizardStep) {
        match step {
            WizardStep::Metadata | WizardStep::Checklist => {
                for field in wizard.step_fields(step) {
                    self.render_field(wizard, &field);
                }
                if step == WizardStep::Checklist {
                    if let Some(score) = wizard.score() {
                        let out_of = wizard.definition().scored_fields().count();
                        self.ui
                            .message(&format!("  Score / गुण: {} of {}", score, out_of));
                    }
                }
            }
            WizardStep::Location => {
                let coordinates = wizard
                    .location()
                    .fix
                    .map(|fix| describe_fix(&fix))
                    .unwrap_or_else(|| "-".to_string());
                self.ui
                    .message(&format!("  Coordinates / निर्देशांक: {}", coordinates));
                for field in wizard.step_fields(step) {
                    self.render_field(wizard, &field);
                }
            }
            WizardStep::Photos => {
                self.ui.message(&format!(
                    "  Photos / छायाचित्रे: {} attached",
                    wizard.existing_photo_count()
                ));
            }
        }
    }

    fn render_field(&mut self, wizard: &Wizard, field: &FieldSpec) {
        let value = wizard.value(&field.key);
        if let FieldKind::Table { columns, .. } = &field.kind {
            self.ui.message(&format!("  {}:", field.display_label()));
            let rows = value.as_ref().and_then(Value::as_array).cloned().unwrap_or_default();
            for (index, row) in rows.iter().enumerate() {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{}={}", c.label, c.display_value(row.get(&c.key))))
                    .collect();
                self.ui
                    .message(&format!("    {}. {}", index + 1, cells.join(", ")));
            }
            return;
        }
        let shown = field.display_value(value.as_ref());
        let shown = if shown.is_empty() { "-".to_string() } else { shown };
        self.ui
            .message(&format!("  {}: {}", field.display_label(), shown));
    }
}

/// Build the prompt for one field, showing its current value as default.
fn field_prompt(field: &FieldSpec, current: Option<&Value>, key: &str, prefix: &str) -> Prompt {
    let marker = if field.required { " *" } else { "" };
    let question = format!("{}{}{}", prefix, field.display_label(), marker);

    match &field.kind {
        FieldKind::Bool => {
            Prompt::confirm(key, &question, matches!(current, Some(Value::Bool(true))))
        }
        FieldKind::Select { options } => {
            let mut choices: Vec<PromptOption> = Vec::new();
            if !field.required {
                choices.push(PromptOption::new("", "(none)"));
            }
            choices.extend(options.iter().map(|o| PromptOption::new(o, o)));
            let default = match current {
                Some(Value::String(s)) => s.clone(),
                _ => choices.first().map(|c| c.value.clone()).unwrap_or_default(),
            };
            Prompt::select(key, &question, choices, &default)
        }
        FieldKind::Date => {
            let shown = field.display_value(current);
            let question = format!("{} (YYYY-MM-DD)", question);
            Prompt::input(key, &question, Some(shown.as_str()).filter(|s| !s.is_empty()))
        }
        _ => {
            let shown = field.display_value(current);
            Prompt::input(key, &question, Some(shown.as_str()).filter(|s| !s.is_empty()))
        }
    }
}

fn parse_coordinates(latitude: &str, longitude: &str) -> Result<GpsFix> {
    let parse = |raw: &str, name: &str| {
        raw.trim().parse::<f64>().map_err(|_| FimsError::Geolocation {
            message: format!("{} '{}' is not a number", name, raw.trim()),
        })
    };
    GpsFix::new(parse(latitude, "latitude")?, parse(longitude, "longitude")?, None)
}

/// `18.520430, 73.856743 (±12 m)`
pub fn describe_fix(fix: &GpsFix) -> String {
    match fix.accuracy_m {
        Some(accuracy) => format!(
            "{:.6}, {:.6} (±{:.0} m)",
            fix.latitude, fix.longitude, accuracy
        ),
        None => format!("{:.6}, {:.6}", fix.latitude, fix.longitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormCatalog;
    use crate::inspection::InspectionStatus;
    use crate::location::FixedPosition;
    use crate::ui::MockUI;

    struct StaticGeocoder;

    impl ReverseGeocoder for StaticGeocoder {
        fn reverse(&self, _latitude: f64, _longitude: f64) -> Result<String> {
            Ok("Shivajinagar, Pune".to_string())
        }
    }

    struct FailingSource;

    impl PositionSource for FailingSource {
        fn current_position(&mut self, _options: &PositionOptions) -> Result<GpsFix> {
            Err(FimsError::Geolocation {
                message: "timed out".to_string(),
            })
        }
    }

    fn office() -> Wizard {
        let forms = FormCatalog::builtin().unwrap();
        Wizard::create(forms.get("office").unwrap().clone())
    }

    fn answer_office_metadata(ui: &mut MockUI) {
        ui.set_prompt_response("location_name", "Haveli Taluka Office");
        ui.set_prompt_response("department_name", "Revenue");
        ui.set_prompt_response("employee_name", "S. Jadhav");
    }

    #[test]
    fn scripted_run_submits() {
        let mut ui = MockUI::new();
        answer_office_metadata(&mut ui);
        ui.set_prompt_response("attendance_register", "yes");
        let fix = GpsFix::new(18.5204, 73.8567, Some(12.0)).unwrap();
        let geocoder = StaticGeocoder;

        let mut wizard = office();
        let outcome = WizardRunner::new(&mut ui)
            .with_position(
                Some(Box::new(FixedPosition::new(fix))),
                PositionOptions::default(),
            )
            .with_geocoder(Some(&geocoder))
            .run(&mut wizard)
            .unwrap();

        let WizardOutcome::Finished(submission) = outcome else {
            panic!("expected a submission");
        };
        assert_eq!(submission.status, InspectionStatus::Submitted);
        assert_eq!(submission.address.as_deref(), Some("Shivajinagar, Pune"));
        assert_eq!(submission.fix.unwrap().latitude, 18.5204);
        assert_eq!(submission.form_data["evaluation_score"], serde_json::json!(1));
        assert_eq!(ui.progress().last(), Some(&(4, 4)));
        assert!(ui.has_message("Score / गुण: 1 of 19"));
    }

    #[test]
    fn missing_required_field_fails_when_scripted() {
        let mut ui = MockUI::new();
        let mut wizard = office();
        let err = WizardRunner::new(&mut ui).run(&mut wizard).unwrap_err();
        assert!(matches!(err, FimsError::StepIncomplete { .. }));
    }

    #[test]
    fn missing_required_field_reprompts_when_interactive() {
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.queue_prompt_responses("location_name", vec!["", "Haveli"]);
        ui.set_prompt_response("department_name", "Revenue");
        ui.set_prompt_response("employee_name", "S. Jadhav");
        ui.queue_prompt_responses("nav", vec!["next", "cancel"]);

        let mut wizard = office();
        let outcome = WizardRunner::new(&mut ui).run(&mut wizard).unwrap();

        assert!(matches!(outcome, WizardOutcome::Cancelled));
        assert!(ui.has_warning("missing"));
        assert_eq!(wizard.step(), WizardStep::Metadata);
    }

    #[test]
    fn failed_lookup_alerts_and_leaves_coordinates_unset() {
        let mut ui = MockUI::new();
        answer_office_metadata(&mut ui);
        ui.set_prompt_response("final_action", "draft");

        let mut wizard = office();
        let outcome = WizardRunner::new(&mut ui)
            .with_position(Some(Box::new(FailingSource)), PositionOptions::default())
            .run(&mut wizard)
            .unwrap();

        assert!(ui.has_error("timed out"));
        let WizardOutcome::Finished(submission) = outcome else {
            panic!("expected a draft");
        };
        assert_eq!(submission.status, InspectionStatus::Draft);
        assert!(submission.fix.is_none());
    }

    #[test]
    fn manual_coordinates_are_validated() {
        let mut ui = MockUI::new();
        answer_office_metadata(&mut ui);
        ui.set_prompt_response("latitude", "123.0");
        ui.set_prompt_response("longitude", "73.0");

        let mut wizard = office();
        let err = WizardRunner::new(&mut ui).run(&mut wizard).unwrap_err();
        assert!(matches!(err, FimsError::Geolocation { .. }));
    }

    #[test]
    fn table_rows_are_prompted_per_cell() {
        let forms = FormCatalog::builtin().unwrap();
        let mut wizard = Wizard::create(forms.get("zp_monthly_report").unwrap().clone());
        let mut ui = MockUI::new();
        ui.set_prompt_response("location_name", "ZP Pune");
        ui.set_prompt_response("report_month", "2026-01");
        ui.set_prompt_response("department_name", "Health");
        ui.set_prompt_response("report_rows_count", "2");
        ui.set_prompt_response("report_rows_1_scheme_name", "Jal Jeevan");
        ui.set_prompt_response("report_rows_1_target", "10");
        ui.set_prompt_response("report_rows_2_scheme_name", "Poshan");

        let outcome = WizardRunner::new(&mut ui).run(&mut wizard).unwrap();

        let WizardOutcome::Finished(submission) = outcome else {
            panic!("expected a submission");
        };
        let rows = submission.form_data["report_rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["target"], serde_json::json!(10));
        assert_eq!(rows[1]["scheme_name"], serde_json::json!("Poshan"));
    }

    #[test]
    fn view_mode_only_renders() {
        let mut ui = MockUI::new();
        answer_office_metadata(&mut ui);
        let mut wizard = office();
        WizardRunner::new(&mut ui).run(&mut wizard).unwrap();

        let mut viewer = MockUI::new();
        let mut view = reopen_as_view(&wizard);
        let outcome = WizardRunner::new(&mut viewer).run(&mut view).unwrap();

        assert!(matches!(outcome, WizardOutcome::Closed));
        assert!(viewer.prompts_shown().iter().all(|k| k == "nav"));
        assert!(viewer.has_message("Haveli Taluka Office"));
    }

    fn reopen_as_view(wizard: &Wizard) -> Wizard {
        use crate::inspection::{InspectionRecord, LoadedInspection};
        let submission = wizard.finish(FinishAction::SaveDraft).unwrap();
        let record = InspectionRecord {
            id: "1".to_string(),
            inspection_number: "OFF-1".to_string(),
            category_id: "cat-office".to_string(),
            location_name: submission.location_name.clone(),
            address: None,
            latitude: None,
            longitude: None,
            location_accuracy: None,
            planned_date: None,
            inspection_date: None,
            status: InspectionStatus::Draft,
            form_data: submission.form_data.clone(),
            inspector: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        };
        let definition = wizard.definition().clone();
        let loaded = LoadedInspection {
            state: crate::forms::FormState::from_parts(
                &definition,
                &record.location_name,
                None,
                &record.form_data,
            ),
            record,
            definition,
            photos: Vec::new(),
        };
        Wizard::open(&loaded, crate::wizard::FormMode::View)
    }
}
