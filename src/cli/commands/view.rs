//! View command implementation.
//!
//! The `fims view <ID>` command renders a stored inspection read-only.

use std::path::{Path, PathBuf};

use crate::cli::args::ViewArgs;
use crate::error::Result;
use crate::ui::{FimsTheme, UserInterface};
use crate::wizard::{FormMode, Wizard, WizardRunner};

use super::dispatcher::{Command, CommandResult};
use super::workspace::{missing_or_err, Workspace};

/// The view command implementation.
pub struct ViewCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ViewArgs,
}

impl ViewCommand {
    /// Create a new view command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: ViewArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for ViewCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ws = match Workspace::open(&self.project_root, self.config_path.as_deref()) {
            Ok(ws) => ws,
            Err(e) => return missing_or_err(ui, e),
        };
        let loaded = match ws
            .repository()
            .load_for_edit(&self.args.id, &ws.forms, &ws.categories)
        {
            Ok(loaded) => loaded,
            Err(e) => return missing_or_err(ui, e),
        };

        let theme = FimsTheme::plain();
        let record = &loaded.record;
        ui.message(&theme.format_field("Inspection", &record.inspection_number));
        ui.message(&theme.format_field("Status", record.status.as_str()));
        ui.message(&theme.format_field(
            "Inspector",
            record.inspector.as_deref().unwrap_or_default(),
        ));
        ui.message(&theme.format_field(
            "Inspected",
            &record
                .inspection_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        ));

        let mut wizard = Wizard::open(&loaded, FormMode::View);
        WizardRunner::new(ui).run(&mut wizard)?;

        for photo in &loaded.photos {
            let description = photo
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(|d| format!(" ({})", d))
                .unwrap_or_default();
            ui.message(&format!(
                "  {}. {}{} {}",
                photo.photo_order, photo.photo_name, description, photo.photo_url
            ));
        }

        Ok(CommandResult::success())
    }
}
