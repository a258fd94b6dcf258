//! Config command implementation.
//!
//! The `fims config` command shows resolved configuration.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{load_config, ConfigPaths};
use crate::error::{FimsError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::workspace::missing_or_err;

/// The config command implementation.
pub struct ConfigCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: ConfigArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match load_config(&self.project_root, self.config_path.as_deref()) {
            Ok(c) => c,
            Err(e) => return missing_or_err(ui, e),
        };

        // Show config file path(s)
        let sources: Vec<PathBuf> = match &self.config_path {
            Some(path) => vec![path.clone()],
            None => ConfigPaths::discover(&self.project_root)
                .all_existing()
                .into_iter()
                .cloned()
                .collect(),
        };
        for path in &sources {
            ui.message(&format!("# {}", path.display()));
        }
        if !sources.is_empty() {
            ui.message("");
        }

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| FimsError::Other(e.into()))?;
            ui.message(&json);
        } else {
            let yaml = serde_yaml::to_string(&config).map_err(|e| FimsError::Other(e.into()))?;
            ui.message(&yaml);
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let fims_dir = temp.path().join(".fims");
        fs::create_dir_all(&fims_dir).unwrap();
        fs::write(fims_dir.join("config.yml"), config).unwrap();
        temp
    }

    #[test]
    fn defaults_without_files() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let result = ConfigCommand::new(temp.path(), None, ConfigArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_message("kind: local"));
    }

    #[test]
    fn shows_config_path_and_values() {
        let temp = setup_project("inspector: A. Patil\n");
        let mut ui = MockUI::new();
        ConfigCommand::new(temp.path(), None, ConfigArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_message("config.yml"));
        assert!(ui.has_message("A. Patil"));
    }

    #[test]
    fn json_output() {
        let temp = setup_project("backend:\n  bucket: site-photos\n");
        let args = ConfigArgs {
            json: true,
            yaml: false,
        };
        let mut ui = MockUI::new();
        ConfigCommand::new(temp.path(), None, args)
            .execute(&mut ui)
            .unwrap();

        let json = ui.messages().last().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(parsed["backend"]["bucket"], "site-photos");
    }

    #[test]
    fn missing_explicit_file_exits_with_two() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("other.yml");
        let mut ui = MockUI::new();
        let result = ConfigCommand::new(temp.path(), Some(&missing), ConfigArgs::default())
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, 2);
    }
}
