//! Reading stored inspections.

use serde_json::Value;

use crate::error::{FimsError, Result};
use crate::forms::{FormCatalog, FormDefinition, FormState};
use crate::inspection::category::CategoryCatalog;
use crate::inspection::detail::INSPECTION_ID;
use crate::inspection::photo::PhotoRecord;
use crate::inspection::record::{InspectionRecord, InspectionStatus};
use crate::store::{Backend, Filter, Row, INSPECTIONS_TABLE, PHOTOS_TABLE};

/// An inspection with everything needed to reopen it in the wizard.
#[derive(Debug, Clone)]
pub struct LoadedInspection {
    pub record: InspectionRecord,
    pub definition: FormDefinition,
    pub state: FormState,
    pub photos: Vec<PhotoRecord>,
}

/// Read access to inspections and their photos.
pub struct InspectionRepository<'a> {
    backend: &'a dyn Backend,
}

impl<'a> InspectionRepository<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// Fetch one inspection by id.
    pub fn find(&self, id: &str) -> Result<InspectionRecord> {
        let row = self
            .backend
            .select(INSPECTIONS_TABLE, &Filter::new().eq("id", id))?
            .into_iter()
            .next()
            .ok_or_else(|| FimsError::InspectionNotFound { id: id.to_string() })?;
        InspectionRecord::from_row(row)
    }

    /// List inspections, newest first.
    pub fn list(
        &self,
        status: Option<InspectionStatus>,
        category_id: Option<&str>,
    ) -> Result<Vec<InspectionRecord>> {
        let mut filter = Filter::new();
        if let Some(status) = status {
            filter = filter.eq("status", status.as_str());
        }
        if let Some(category_id) = category_id {
            filter = filter.eq("category_id", category_id);
        }

        let mut records = Vec::new();
        for row in self.backend.select(INSPECTIONS_TABLE, &filter)? {
            match InspectionRecord::from_row(row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable inspection row: {}", e),
            }
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Stored photos of an inspection, in upload order.
    pub fn photos(&self, inspection_id: &str) -> Result<Vec<PhotoRecord>> {
        let rows = self
            .backend
            .select(PHOTOS_TABLE, &Filter::new().eq(INSPECTION_ID, inspection_id))?;
        let mut photos = rows
            .into_iter()
            .map(PhotoRecord::from_row)
            .collect::<Result<Vec<_>>>()?;
        photos.sort_by_key(|p| p.photo_order);
        Ok(photos)
    }

    /// Detail rows of an inspection, ordered by row number when present.
    pub fn details(&self, definition: &FormDefinition, inspection_id: &str) -> Result<Vec<Row>> {
        let Some(table) = &definition.detail_table else {
            return Ok(Vec::new());
        };
        let mut rows = self
            .backend
            .select(table, &Filter::new().eq(INSPECTION_ID, inspection_id))?;
        rows.sort_by_key(|r| r.get("row_number").and_then(Value::as_u64).unwrap_or(0));
        Ok(rows)
    }

    /// Load an inspection, resolve its form through its category and fetch
    /// its photos.
    pub fn load_for_edit(
        &self,
        id: &str,
        forms: &FormCatalog,
        categories: &CategoryCatalog,
    ) -> Result<LoadedInspection> {
        let record = self.find(id)?;
        let form_type = categories.form_type_for(&record.category_id)?;
        let definition = forms.get(form_type)?.clone();
        let photos = self.photos(&record.id)?;
        let state = FormState::from_parts(
            &definition,
            &record.location_name,
            record.planned_date,
            &record.form_data,
        );
        tracing::debug!(
            "Loaded inspection {} ({}) with {} photo(s)",
            record.inspection_number,
            form_type,
            photos.len()
        );
        Ok(LoadedInspection {
            record,
            definition,
            state,
            photos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalBackend;
    use serde_json::json;
    use tempfile::TempDir;

    fn insert(backend: &mut LocalBackend, table: &str, v: Value) {
        backend
            .insert(table, v.as_object().unwrap().clone())
            .unwrap();
    }

    fn seeded() -> (TempDir, LocalBackend) {
        let temp = TempDir::new().unwrap();
        let mut backend = LocalBackend::open(temp.path()).unwrap();
        insert(
            &mut backend,
            INSPECTIONS_TABLE,
            json!({
                "inspection_number": "OFF-1",
                "category_id": "cat-office",
                "location_name": "Old",
                "status": "draft",
                "created_at": "2026-01-01T00:00:00Z"
            }),
        );
        insert(
            &mut backend,
            INSPECTIONS_TABLE,
            json!({
                "inspection_number": "GP-2",
                "category_id": "cat-grampanchayat",
                "location_name": "New",
                "status": "submitted",
                "created_at": "2026-02-01T00:00:00Z"
            }),
        );
        for order in [2, 1] {
            insert(
                &mut backend,
                PHOTOS_TABLE,
                json!({
                    "inspection_id": "1",
                    "photo_url": format!("file:///p{}.jpg", order),
                    "photo_name": format!("p{}.jpg", order),
                    "photo_order": order
                }),
            );
        }
        (temp, backend)
    }

    #[test]
    fn find_missing_is_not_found() {
        let (_temp, backend) = seeded();
        let repo = InspectionRepository::new(&backend);
        let err = repo.find("99").unwrap_err();
        assert!(matches!(err, FimsError::InspectionNotFound { .. }));
    }

    #[test]
    fn list_is_newest_first_and_filters() {
        let (_temp, backend) = seeded();
        let repo = InspectionRepository::new(&backend);

        let all = repo.list(None, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].inspection_number, "GP-2");

        let drafts = repo.list(Some(InspectionStatus::Draft), None).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].location_name, "Old");

        let office = repo.list(None, Some("cat-office")).unwrap();
        assert_eq!(office.len(), 1);
    }

    #[test]
    fn load_for_edit_resolves_form_and_photos() {
        let (_temp, backend) = seeded();
        let repo = InspectionRepository::new(&backend);
        let forms = FormCatalog::builtin().unwrap();
        let categories = CategoryCatalog::from_forms(&forms);

        let loaded = repo.load_for_edit("1", &forms, &categories).unwrap();

        assert_eq!(loaded.definition.form_type, "office");
        assert_eq!(loaded.photos.len(), 2);
        assert_eq!(loaded.photos[0].photo_order, 1);
        assert_eq!(
            loaded.state.text("location_name").as_deref(),
            Some("Old")
        );
    }
}
