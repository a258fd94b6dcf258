//! New command implementation.
//!
//! The `fims new` command picks an inspection type (unless `--type` is
//! given) and runs the wizard in create mode.

use std::path::{Path, PathBuf};

use crate::cli::args::NewArgs;
use crate::error::Result;
use crate::inspection::CategoryCatalog;
use crate::ui::{Prompt, PromptOption, UserInterface};
use crate::wizard::Wizard;

use super::dispatcher::{Command, CommandResult};
use super::workspace::{missing_or_err, Workspace};

/// The new command implementation.
pub struct NewCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: NewArgs,
}

impl NewCommand {
    /// Create a new `new` command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: NewArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &NewArgs {
        &self.args
    }
}

/// Ask which inspection type to start.
pub fn select_form_type(
    ui: &mut dyn UserInterface,
    categories: &CategoryCatalog,
) -> Result<String> {
    let options: Vec<PromptOption> = categories
        .all()
        .iter()
        .map(|c| {
            let label = match &c.name_local {
                Some(local) => format!("{} / {}", c.name, local),
                None => c.name.clone(),
            };
            PromptOption::new(&c.form_type, &label)
        })
        .collect();
    let default = options.first().map(|o| o.value.clone()).unwrap_or_default();
    let answer = ui.prompt(&Prompt::select(
        "form_type",
        "Inspection type / तपासणी प्रकार",
        options,
        &default,
    ))?;
    Ok(answer.as_string())
}

impl Command for NewCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut ws = match Workspace::open(&self.project_root, self.config_path.as_deref()) {
            Ok(ws) => ws,
            Err(e) => return missing_or_err(ui, e),
        };

        let form_type = match &self.args.form_type {
            Some(tag) => tag.clone(),
            None => select_form_type(ui, &ws.categories)?,
        };
        let definition = ws.forms.get(&form_type)?.clone();
        tracing::debug!("Starting a new {} inspection", form_type);

        let mut wizard = Wizard::create(definition);
        ws.fill(ui, &mut wizard, &self.args.entry)
    }
}
