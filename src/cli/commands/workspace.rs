//! Everything a command needs to touch stored inspections.

use std::path::{Path, PathBuf};

use crate::config::{load_config, state_dir, FimsConfig};
use crate::error::{FimsError, Result};
use crate::forms::FormCatalog;
use crate::inspection::{
    CategoryCatalog, InspectionRepository, InspectionStatus, PendingPhoto, SubmitOutcome,
    Submission, Submitter,
};
use crate::location::{
    options_from_config, source_from_config, GoogleGeocoder, GpsFix, ReverseGeocoder,
};
use crate::store::{open_backend, Backend};
use crate::ui::UserInterface;
use crate::wizard::{Wizard, WizardOutcome, WizardRunner};
use crate::cli::args::EntryArgs;

use super::dispatcher::CommandResult;

/// Loaded configuration, backend and catalogs for one project.
pub struct Workspace {
    pub root: PathBuf,
    pub config: FimsConfig,
    pub backend: Box<dyn Backend>,
    pub forms: FormCatalog,
    pub categories: CategoryCatalog,
}

impl Workspace {
    /// Load configuration and open the configured backend.
    pub fn open(project_root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(project_root, config_path)?;
        let backend = open_backend(&config.backend, project_root)?;
        let forms = FormCatalog::builtin()?;
        let categories = CategoryCatalog::load(backend.as_ref(), &forms);
        Ok(Self {
            root: project_root.to_path_buf(),
            config,
            backend,
            forms,
            categories,
        })
    }

    pub fn repository(&self) -> InspectionRepository<'_> {
        InspectionRepository::new(self.backend.as_ref())
    }

    /// Attach `--photo` files, position flags and the configured lookups,
    /// run the wizard and write the result.
    pub fn fill(
        &mut self,
        ui: &mut dyn UserInterface,
        wizard: &mut Wizard,
        entry: &EntryArgs,
    ) -> Result<CommandResult> {
        for path in &entry.photos {
            if let Err(e) = PendingPhoto::new(path, "").and_then(|p| wizard.add_photo(p)) {
                ui.warning(&e.to_string());
                if matches!(e, FimsError::PhotoLimitExceeded { .. }) {
                    break;
                }
            }
        }

        let fixed = match (entry.lat, entry.lon) {
            (Some(lat), Some(lon)) => Some(GpsFix::new(lat, lon, entry.accuracy)?),
            _ => None,
        };
        let source = source_from_config(&self.config.geolocation, fixed, &state_dir(&self.root));
        let options = options_from_config(&self.config.geolocation);
        let geocoder = GoogleGeocoder::from_config(&self.config.geocoding);

        let outcome = WizardRunner::new(ui)
            .with_position(source, options)
            .with_geocoder(geocoder.as_ref().map(|g| g as &dyn ReverseGeocoder))
            .run(wizard)?;

        match outcome {
            WizardOutcome::Finished(submission) => {
                let saved = self.submit(ui, &submission)?;
                let verb = match saved.record.status {
                    InspectionStatus::Submitted => "submitted",
                    InspectionStatus::Draft => "saved as draft",
                };
                ui.success(&format!(
                    "Inspection {} {} (id {})",
                    saved.record.inspection_number, verb, saved.record.id
                ));
                Ok(CommandResult::success())
            }
            WizardOutcome::Cancelled => {
                ui.warning("Inspection discarded, nothing was saved");
                Ok(CommandResult::success())
            }
            WizardOutcome::Closed => Ok(CommandResult::success()),
        }
    }

    /// Write a finished wizard through the submission saga.
    pub fn submit(
        &mut self,
        ui: &mut dyn UserInterface,
        submission: &Submission,
    ) -> Result<SubmitOutcome> {
        let definition = self.forms.get(&submission.form_type)?;
        let category_id = match &submission.category_id {
            Some(id) => id.clone(),
            None => self.categories.category_for(&submission.form_type)?.id.clone(),
        };

        let mut spinner = ui.start_spinner("Saving inspection... / जतन करत आहे...");
        let result = Submitter::new(self.backend.as_mut(), &self.config.backend.bucket)
            .with_inspector(self.config.inspector.clone())
            .submit(definition, &category_id, submission);

        match &result {
            Ok(outcome) => spinner.finish_success(&format!(
                "Saved {} with {} detail row(s) and {} photo(s)",
                outcome.record.inspection_number,
                outcome.detail_rows,
                outcome.photos.len()
            )),
            Err(_) => spinner.finish_error("Saving failed"),
        }
        result
    }
}

/// Report missing configuration or inspections with exit code 2.
pub fn missing_or_err(ui: &mut dyn UserInterface, error: FimsError) -> Result<CommandResult> {
    match error {
        FimsError::ConfigNotFound { .. } | FimsError::InspectionNotFound { .. } => {
            ui.error(&error.to_string());
            Ok(CommandResult::failure(2))
        }
        other => Err(other),
    }
}
