//! Categories command implementation.
//!
//! The `fims categories` command lists the inspection types a new
//! inspection can be started with.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::workspace::{missing_or_err, Workspace};

/// The categories command implementation.
pub struct CategoriesCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl CategoriesCommand {
    /// Create a new categories command.
    pub fn new(project_root: &Path, config_path: Option<&Path>) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
        }
    }
}

impl Command for CategoriesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ws = match Workspace::open(&self.project_root, self.config_path.as_deref()) {
            Ok(ws) => ws,
            Err(e) => return missing_or_err(ui, e),
        };

        let mut table = Table::new(vec!["TYPE", "CATEGORY", "NAME", "PREFIX"]);
        for category in ws.categories.all() {
            let prefix = ws
                .forms
                .get(&category.form_type)
                .map(|f| f.number_prefix.clone())
                .unwrap_or_default();
            let name = match &category.name_local {
                Some(local) => format!("{} / {}", category.name, local),
                None => category.name.clone(),
            };
            table.add_row(vec![
                category.form_type.clone(),
                category.id.clone(),
                name,
                prefix,
            ]);
        }
        ui.message(&table.render());

        Ok(CommandResult::success())
    }
}
