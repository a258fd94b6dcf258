//! Built-in form definitions embedded at compile time.

use include_dir::{include_dir, Dir};
use std::collections::BTreeMap;

use crate::error::{FimsError, Result};

use super::definition::FormDefinition;

/// Embedded form definitions directory.
static CATALOG_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/catalog");

/// All known inspection forms, keyed by type tag.
#[derive(Debug, Clone)]
pub struct FormCatalog {
    forms: BTreeMap<String, FormDefinition>,
}

impl FormCatalog {
    /// Load the forms shipped with the binary.
    pub fn builtin() -> Result<Self> {
        let mut forms = BTreeMap::new();

        for file in CATALOG_DIR.files() {
            let is_yaml = file
                .path()
                .extension()
                .map(|ext| ext == "yml" || ext == "yaml")
                .unwrap_or(false);
            if !is_yaml {
                continue;
            }

            let content = file
                .contents_utf8()
                .ok_or_else(|| FimsError::ConfigParseError {
                    path: file.path().to_path_buf(),
                    message: "Invalid UTF-8".to_string(),
                })?;

            let definition: FormDefinition =
                serde_yaml::from_str(content).map_err(|e| FimsError::ConfigParseError {
                    path: file.path().to_path_buf(),
                    message: e.to_string(),
                })?;

            tracing::debug!("Loaded form '{}'", definition.form_type);
            forms.insert(definition.form_type.clone(), definition);
        }

        Ok(Self { forms })
    }

    /// Look up a form by type tag.
    pub fn get(&self, form_type: &str) -> Result<&FormDefinition> {
        self.forms
            .get(form_type)
            .ok_or_else(|| FimsError::UnknownFormType {
                form_type: form_type.to_string(),
            })
    }

    /// All forms, ordered by type tag.
    pub fn all(&self) -> impl Iterator<Item = &FormDefinition> {
        self.forms.values()
    }

    /// Number of forms.
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}
