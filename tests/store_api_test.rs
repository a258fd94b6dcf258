//! Integration tests for submitting and reloading inspections.

use fims::forms::{FormCatalog, LOCATION_NAME, PLANNED_DATE};
use fims::inspection::{
    CategoryCatalog, InspectionRepository, InspectionStatus, PendingPhoto, Submission, Submitter,
};
use fims::location::GpsFix;
use fims::store::{Backend, Filter, LocalBackend, Row, INSPECTIONS_TABLE, PHOTOS_TABLE};
use fims::wizard::{FinishAction, FormMode, Wizard};
use fims::{FimsError, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Local backend whose uploads fail after `uploads_left` successes.
struct FlakyStorage {
    inner: LocalBackend,
    uploads_left: usize,
}

impl Backend for FlakyStorage {
    fn insert(&mut self, table: &str, row: Row) -> Result<Row> {
        self.inner.insert(table, row)
    }

    fn update(&mut self, table: &str, id: &str, patch: Row) -> Result<Row> {
        self.inner.update(table, id, patch)
    }

    fn upsert(&mut self, table: &str, row: Row, on_conflict: &str) -> Result<Row> {
        self.inner.upsert(table, row, on_conflict)
    }

    fn delete(&mut self, table: &str, filter: &Filter) -> Result<usize> {
        self.inner.delete(table, filter)
    }

    fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>> {
        self.inner.select(table, filter)
    }

    fn upload(&mut self, bucket: &str, path: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        if self.uploads_left == 0 {
            return Err(FimsError::backend("upload", "connection reset"));
        }
        self.uploads_left -= 1;
        self.inner.upload(bucket, path, bytes, content_type)
    }

    fn remove_object(&mut self, bucket: &str, path: &str) -> Result<()> {
        self.inner.remove_object(bucket, path)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.inner.public_url(bucket, path)
    }
}

fn forms() -> FormCatalog {
    FormCatalog::builtin().unwrap()
}

fn submit(backend: &mut dyn Backend, submission: &Submission) -> Result<String> {
    let forms = forms();
    let definition = forms.get(&submission.form_type)?;
    let categories = CategoryCatalog::from_forms(&forms);
    let category_id = categories.category_for(&submission.form_type)?.id.clone();
    let outcome = Submitter::new(backend, "fims-photos")
        .with_inspector(Some("A. Patil".to_string()))
        .submit(definition, &category_id, submission)?;
    Ok(outcome.record.id)
}

fn finished(mut wizard: Wizard, action: FinishAction) -> Submission {
    while !wizard.step().is_last() {
        wizard.next().unwrap();
    }
    wizard.finish(action).unwrap()
}

fn school_wizard() -> Wizard {
    let mut wizard = Wizard::create(forms().get("mumbai_high_court_school").unwrap().clone());
    wizard.set_input(LOCATION_NAME, "Dadar").unwrap();
    wizard.set_input(PLANNED_DATE, "2026-02-10").unwrap();
    wizard.set_input("school_name", "Municipal School No. 4").unwrap();
    wizard.set_input("udise_code", "27230100104").unwrap();
    wizard.set_input("total_students", "412").unwrap();
    wizard.toggle("drinking_water").unwrap();
    wizard.toggle("cctv_installed").unwrap();
    wizard
        .set_location(GpsFix::new(19.0178, 72.8478, Some(9.0)).unwrap())
        .unwrap();
    wizard.set_address("Dadar West, Mumbai").unwrap();
    wizard
}

fn photo(dir: &Path, name: &str) -> PendingPhoto {
    let path = dir.join(name);
    fs::write(&path, b"image bytes").unwrap();
    PendingPhoto::new(path, "front gate").unwrap()
}

#[test]
fn load_for_edit_reproduces_saved_values() {
    let temp = TempDir::new().unwrap();
    let mut backend = LocalBackend::open(&temp.path().join("data")).unwrap();
    let wizard = school_wizard();
    let original = finished(wizard.clone(), FinishAction::Submit);
    let id = submit(&mut backend, &original).unwrap();

    let forms = forms();
    let categories = CategoryCatalog::load(&backend, &forms);
    let loaded = InspectionRepository::new(&backend)
        .load_for_edit(&id, &forms, &categories)
        .unwrap();

    assert_eq!(loaded.definition.form_type, "mumbai_high_court_school");
    assert_eq!(loaded.record.status, InspectionStatus::Submitted);
    assert_eq!(loaded.record.inspector.as_deref(), Some("A. Patil"));
    assert!(loaded.record.inspection_date.is_some());

    let reopened = Wizard::open(&loaded, FormMode::Edit);
    assert_eq!(reopened.state(), wizard.state());
    assert_eq!(reopened.location().address, "Dadar West, Mumbai");
    assert_eq!(reopened.location().fix.unwrap().latitude, 19.0178);
    assert_eq!(reopened.score(), Some(2));
}

#[test]
fn detail_row_agrees_with_blob() {
    let temp = TempDir::new().unwrap();
    let mut backend = LocalBackend::open(&temp.path().join("data")).unwrap();
    let submission = finished(school_wizard(), FinishAction::Submit);
    let id = submit(&mut backend, &submission).unwrap();

    let forms = forms();
    let definition = forms.get("mumbai_high_court_school").unwrap();
    let repo = InspectionRepository::new(&backend);
    let record = repo.find(&id).unwrap();
    let details = repo.details(definition, &id).unwrap();

    assert_eq!(details.len(), 1);
    for field in definition.blob_fields() {
        assert_eq!(
            details[0].get(&field.key),
            record.form_data.get(&field.key),
            "column {} disagrees",
            field.key
        );
    }
    assert_eq!(details[0]["compliance_score"], json!(2));
}

#[test]
fn tabular_form_writes_one_row_per_entry() {
    let temp = TempDir::new().unwrap();
    let mut backend = LocalBackend::open(&temp.path().join("data")).unwrap();
    let mut wizard = Wizard::create(forms().get("zp_monthly_report").unwrap().clone());
    wizard.set_input(LOCATION_NAME, "ZP Pune").unwrap();
    wizard.set_input("report_month", "2026-01").unwrap();
    wizard.set_input("department_name", "Health").unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard
        .set_table_rows(
            "report_rows",
            vec![
                json!({"scheme_name": "Jal Jeevan", "target": 10, "achievement": 7}),
                json!({"scheme_name": "Poshan", "target": 4}),
            ],
        )
        .unwrap();
    let id = submit(&mut backend, &finished(wizard, FinishAction::Submit)).unwrap();

    let forms = forms();
    let rows = InspectionRepository::new(&backend)
        .details(forms.get("zp_monthly_report").unwrap(), &id)
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["row_number"], json!(1));
    assert_eq!(rows[1]["scheme_name"], json!("Poshan"));
    assert_eq!(rows[1]["achievement"], Value::Null);
}

#[test]
fn blank_planned_date_is_stored_as_null() {
    let temp = TempDir::new().unwrap();
    let mut backend = LocalBackend::open(&temp.path().join("data")).unwrap();
    let mut wizard = school_wizard();
    wizard.set_input(PLANNED_DATE, "").unwrap();
    let id = submit(&mut backend, &finished(wizard, FinishAction::SaveDraft)).unwrap();

    let rows = backend.select(INSPECTIONS_TABLE, &Filter::new()).unwrap();
    let row = rows.iter().find(|r| r["id"] == json!(id)).unwrap();
    assert_eq!(row[PLANNED_DATE], Value::Null);
    assert_eq!(row["status"], json!("draft"));
    assert!(row.get("inspection_date").map_or(true, Value::is_null));
}

#[test]
fn failed_upload_rolls_back_every_write() {
    let temp = TempDir::new().unwrap();
    let mut backend = FlakyStorage {
        inner: LocalBackend::open(&temp.path().join("data")).unwrap(),
        uploads_left: 1,
    };
    let mut wizard = school_wizard();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard.add_photo(photo(temp.path(), "gate.jpg")).unwrap();
    wizard.add_photo(photo(temp.path(), "toilet.jpg")).unwrap();
    let submission = wizard.finish(FinishAction::Submit).unwrap();

    let err = submit(&mut backend, &submission).unwrap_err();

    match err {
        FimsError::SubmissionFailed {
            stage, rolled_back, ..
        } => {
            assert_eq!(stage, "uploading photos");
            assert!(rolled_back);
        }
        other => panic!("unexpected error: {}", other),
    }
    let forms = forms();
    let definition = forms.get("mumbai_high_court_school").unwrap();
    let detail_table = definition.detail_table.as_deref().unwrap();
    for table in [INSPECTIONS_TABLE, PHOTOS_TABLE, detail_table] {
        assert!(
            backend.select(table, &Filter::new()).unwrap().is_empty(),
            "{} still has rows",
            table
        );
    }
}

#[test]
fn failed_edit_restores_previous_row() {
    let temp = TempDir::new().unwrap();
    let mut backend = FlakyStorage {
        inner: LocalBackend::open(&temp.path().join("data")).unwrap(),
        uploads_left: 0,
    };
    let forms = forms();
    let definition = forms.get("mumbai_high_court_school").unwrap();
    let categories = CategoryCatalog::from_forms(&forms);
    let category_id = categories
        .category_for("mumbai_high_court_school")
        .unwrap()
        .id
        .clone();
    // Saved without an inspector; the edit below adds one.
    let id = Submitter::new(&mut backend, "fims-photos")
        .submit(
            definition,
            &category_id,
            &finished(school_wizard(), FinishAction::SaveDraft),
        )
        .unwrap()
        .record
        .id;
    let before = InspectionRepository::new(&backend).find(&id).unwrap();
    assert!(before.inspector.is_none());

    let loaded = InspectionRepository::new(&backend)
        .load_for_edit(&id, &forms, &categories)
        .unwrap();
    let mut wizard = Wizard::open(&loaded, FormMode::Edit);
    wizard.set_input("school_name", "Renamed School").unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard.add_photo(photo(temp.path(), "hall.png")).unwrap();
    let edit = wizard.finish(FinishAction::Submit).unwrap();

    match submit(&mut backend, &edit).unwrap_err() {
        FimsError::SubmissionFailed { rolled_back, .. } => assert!(rolled_back),
        other => panic!("unexpected error: {}", other),
    }

    let record = InspectionRepository::new(&backend).find(&id).unwrap();
    assert_eq!(record, before);
    assert_eq!(record.status, InspectionStatus::Draft);
    assert_eq!(record.form_data["school_name"], json!("Municipal School No. 4"));
    let details = InspectionRepository::new(&backend)
        .details(definition, &id)
        .unwrap();
    assert_eq!(details[0]["school_name"], json!("Municipal School No. 4"));
}

#[test]
fn too_many_photos_are_rejected_before_writing() {
    let temp = TempDir::new().unwrap();
    let mut backend = LocalBackend::open(&temp.path().join("data")).unwrap();
    let mut submission = finished(school_wizard(), FinishAction::Submit);
    submission.existing_photo_count = 5;
    submission.photos.push(photo(temp.path(), "extra.jpg"));

    let err = submit(&mut backend, &submission).unwrap_err();

    assert!(matches!(err, FimsError::PhotoLimitExceeded { .. }));
    assert!(backend
        .select(INSPECTIONS_TABLE, &Filter::new())
        .unwrap()
        .is_empty());
}
