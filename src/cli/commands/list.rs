//! List command implementation.
//!
//! The `fims list` command lists stored inspections, newest first.

use std::path::{Path, PathBuf};

use crate::cli::args::ListArgs;
use crate::error::{FimsError, Result};
use crate::inspection::InspectionStatus;
use crate::ui::{FimsTheme, Table, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::workspace::{missing_or_err, Workspace};

/// The list command implementation.
pub struct ListCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: ListArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ws = match Workspace::open(&self.project_root, self.config_path.as_deref()) {
            Ok(ws) => ws,
            Err(e) => return missing_or_err(ui, e),
        };

        let status = self
            .args
            .status
            .as_deref()
            .map(str::parse::<InspectionStatus>)
            .transpose()?;
        let category_id = match &self.args.form_type {
            Some(tag) => Some(ws.categories.category_for(tag)?.id.clone()),
            None => None,
        };

        let records = ws.repository().list(status, category_id.as_deref())?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&records).map_err(|e| FimsError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        if records.is_empty() {
            ui.message("No inspections found.");
            return Ok(CommandResult::success());
        }

        let theme = FimsTheme::new();
        let mut table = Table::new(vec!["ID", "NUMBER", "TYPE", "LOCATION", "STATUS", "CREATED"]);
        for record in &records {
            let form_type = ws
                .categories
                .form_type_for(&record.category_id)
                .unwrap_or("?")
                .to_string();
            table.add_row(vec![
                record.id.clone(),
                record.inspection_number.clone(),
                form_type,
                record.location_name.clone(),
                theme.format_status(record.status.as_str()),
                record.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]);
        }
        ui.message(&table.render());

        Ok(CommandResult::success())
    }
}
