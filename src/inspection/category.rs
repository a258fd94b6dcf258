//! Inspection categories.
//!
//! Every inspection references a category, and the category decides which
//! form edits it. A backend may carry its own category table; otherwise the
//! identifiers baked into the form catalog are used.

use serde::{Deserialize, Serialize};

use crate::error::{FimsError, Result};
use crate::forms::FormCatalog;
use crate::inspection::record::string_or_number;
use crate::store::{Backend, Filter, CATEGORIES_TABLE};

/// One category row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub form_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_local: Option<String>,
}

/// Lookup between categories and form types.
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Categories implied by the form catalog.
    pub fn from_forms(forms: &FormCatalog) -> Self {
        let categories = forms
            .all()
            .map(|def| Category {
                id: def.category_id.clone(),
                form_type: def.form_type.clone(),
                name: def.title.clone(),
                name_local: def.title_local.clone(),
            })
            .collect();
        Self { categories }
    }

    /// Read the backend's category table, falling back to the built-in
    /// categories when it is empty or unreadable.
    ///
    /// Rows naming a form type the catalog does not know are skipped.
    pub fn load(backend: &dyn Backend, forms: &FormCatalog) -> Self {
        let rows = match backend.select(CATEGORIES_TABLE, &Filter::new()) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Could not read categories, using built-in ones: {}", e);
                return Self::from_forms(forms);
            }
        };

        let mut categories = Vec::new();
        for row in rows {
            match serde_json::from_value::<Category>(serde_json::Value::Object(row)) {
                Ok(category) if forms.get(&category.form_type).is_ok() => {
                    categories.push(category)
                }
                Ok(category) => tracing::debug!(
                    "Skipping category {} with unknown form type {}",
                    category.id,
                    category.form_type
                ),
                Err(e) => tracing::debug!("Skipping malformed category row: {}", e),
            }
        }

        if categories.is_empty() {
            Self::from_forms(forms)
        } else {
            Self { categories }
        }
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    /// Category used for new inspections of a form type.
    pub fn category_for(&self, form_type: &str) -> Result<&Category> {
        self.categories
            .iter()
            .find(|c| c.form_type == form_type)
            .ok_or_else(|| FimsError::UnknownFormType {
                form_type: form_type.to_string(),
            })
    }

    /// Form type that edits inspections of a category.
    pub fn form_type_for(&self, category_id: &str) -> Result<&str> {
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.form_type.as_str())
            .ok_or_else(|| FimsError::UnknownCategory {
                category_id: category_id.to_string(),
            })
    }
}
