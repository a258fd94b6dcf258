//! Form definitions.

use serde::{Deserialize, Serialize};

use super::field::{FieldKind, FieldSpec};

/// Key of the location-name field every form starts with.
pub const LOCATION_NAME: &str = "location_name";

/// Key of the planned-date field every form carries.
pub const PLANNED_DATE: &str = "planned_date";

/// Key of the address field on the location step.
pub const ADDRESS: &str = "address";

/// One inspection form: its steps, its number prefix and where its
/// structured detail rows go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    /// Type tag used for routing (`office`, `grampanchayat`, ...).
    pub form_type: String,

    /// English title.
    pub title: String,

    /// Local-language title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_local: Option<String>,

    /// Prefix of generated inspection numbers (`OFF` → `OFF-<millis>`).
    pub number_prefix: String,

    /// Category identifier used when the backend has no category table.
    pub category_id: String,

    /// Table receiving the normalized detail row(s), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_table: Option<String>,

    /// Blob key receiving the count of true checklist booleans, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_field: Option<String>,

    /// Form-specific fields on the metadata step.
    #[serde(default)]
    pub metadata: Vec<FieldSpec>,

    /// Fields on the checklist step.
    #[serde(default)]
    pub checklist: Vec<FieldSpec>,
}

impl FormDefinition {
    /// Bilingual display title.
    pub fn display_title(&self) -> String {
        match &self.title_local {
            Some(local) if !local.is_empty() => format!("{} / {}", self.title, local),
            _ => self.title.clone(),
        }
    }

    /// Fields shown on the metadata step: the shared record fields first,
    /// then the form's own.
    pub fn metadata_fields(&self) -> Vec<FieldSpec> {
        let mut fields = common_metadata_fields();
        fields.extend(self.metadata.iter().cloned());
        fields
    }

    /// Fields shown on the location step.
    pub fn location_fields(&self) -> Vec<FieldSpec> {
        vec![FieldSpec::new(ADDRESS, "Address", "पत्ता", FieldKind::Text)]
    }

    /// Every blob field of the form, in step order.
    ///
    /// The address and the common metadata fields are record columns and
    /// are not part of this list.
    pub fn blob_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.metadata.iter().chain(self.checklist.iter())
    }

    /// Look up a blob or common field by key.
    pub fn field(&self, key: &str) -> Option<FieldSpec> {
        self.metadata_fields()
            .into_iter()
            .chain(self.location_fields())
            .chain(self.checklist.iter().cloned())
            .find(|f| f.key == key)
    }

    /// Checklist booleans counted by the score.
    pub fn scored_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.checklist.iter().filter(|f| f.is_bool())
    }

    /// The table field on the checklist, for tabular forms.
    pub fn table_field(&self) -> Option<&FieldSpec> {
        self.checklist
            .iter()
            .find(|f| matches!(f.kind, FieldKind::Table { .. }))
    }

    /// Whether the form writes one detail row per table row.
    pub fn is_tabular(&self) -> bool {
        self.detail_table.is_some() && self.table_field().is_some()
    }
}

/// Fields every form collects on its metadata step.
pub fn common_metadata_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(LOCATION_NAME, "Location Name", "ठिकाणाचे नाव", FieldKind::Text)
            .required(),
        FieldSpec::new(PLANNED_DATE, "Planned Date", "नियोजित दिनांक", FieldKind::Date),
    ]
}
