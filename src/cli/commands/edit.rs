//! Edit command implementation.
//!
//! The `fims edit <ID>` command reopens a stored inspection with the form
//! of its category and resubmits it as an update.

use std::path::{Path, PathBuf};

use crate::cli::args::EditArgs;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::wizard::{FormMode, Wizard};

use super::dispatcher::{Command, CommandResult};
use super::workspace::{missing_or_err, Workspace};

/// The edit command implementation.
pub struct EditCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: EditArgs,
}

impl EditCommand {
    /// Create a new edit command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: EditArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for EditCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut ws = match Workspace::open(&self.project_root, self.config_path.as_deref()) {
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
        ui.message(&format!(
            "Editing {} ({})",
            loaded.record.inspection_number, loaded.record.status
        ));

        let mut wizard = Wizard::open(&loaded, FormMode::Edit);
        ws.fill(ui, &mut wizard, &self.args.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{EntryArgs, NewArgs};
    use crate::cli::commands::new::NewCommand;
    use crate::inspection::InspectionStatus;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn seed_draft(root: &Path) -> String {
        let args = NewArgs {
            form_type: Some("office".to_string()),
            entry: EntryArgs::default(),
        };
        let mut ui = MockUI::new();
        ui.set_prompt_response("location_name", "Haveli Taluka Office");
        ui.set_prompt_response("department_name", "Revenue");
        ui.set_prompt_response("employee_name", "S. Jadhav");
        ui.set_prompt_response("final_action", "draft");
        NewCommand::new(root, None, args).execute(&mut ui).unwrap();

        let ws = Workspace::open(root, None).unwrap();
        let stored = ws.repository().list(None, None).unwrap();
        stored[0].id.clone()
    }

    #[test]
    fn edit_updates_in_place() {
        let temp = TempDir::new().unwrap();
        let id = seed_draft(temp.path());

        let args = EditArgs {
            id: id.clone(),
            entry: EntryArgs::default(),
        };
        let mut ui = MockUI::new();
        ui.set_prompt_response("cash_book", "yes");
        let result = EditCommand::new(temp.path(), None, args)
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        let ws = Workspace::open(temp.path(), None).unwrap();
        let stored = ws.repository().list(None, None).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].status, InspectionStatus::Submitted);
        assert_eq!(stored[0].form_data["department_name"], "Revenue");
        assert_eq!(stored[0].form_data["evaluation_score"], 1);
    }

    #[test]
    fn missing_inspection_exits_with_two() {
        let temp = TempDir::new().unwrap();
        let args = EditArgs {
            id: "404".to_string(),
            entry: EntryArgs::default(),
        };
        let mut ui = MockUI::new();
        let result = EditCommand::new(temp.path(), None, args)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("404"));
    }
}
