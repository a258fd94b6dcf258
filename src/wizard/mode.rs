//! Wizard modes.

use std::fmt;
use std::str::FromStr;

/// How a wizard was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// A new inspection.
    #[default]
    Create,
    /// An existing inspection, editable.
    Edit,
    /// An existing inspection, read-only.
    View,
}

impl FormMode {
    pub fn is_read_only(self) -> bool {
        self == FormMode::View
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Edit => "edit",
            FormMode::View => "view",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(FormMode::Create),
            "edit" => Ok(FormMode::Edit),
            "view" => Ok(FormMode::View),
            other => Err(format!("unknown form mode: {}", other)),
        }
    }
}
