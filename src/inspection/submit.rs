//! Writing a finished wizard to the backend.
//!
//! A submission touches up to four places: the inspection row, the detail
//! table, the photo bucket and the photo table. Each successful write pushes
//! a compensating action onto an undo log; if a later write fails the log
//! is replayed in reverse so the backend ends up as it was before the
//! submission started.

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;

use crate::error::{FimsError, Result};
use crate::forms::{FieldKind, FormDefinition, DATE_FORMAT, PLANNED_DATE};
use crate::inspection::detail::{detail_rows, INSPECTION_ID};
use crate::inspection::number::inspection_number;
use crate::inspection::photo::{object_path, PendingPhoto, PhotoRecord, MAX_PHOTOS};
use crate::inspection::record::{InspectionRecord, InspectionStatus};
use crate::location::GpsFix;
use crate::store::{row_id, Backend, Filter, Row, INSPECTIONS_TABLE, PHOTOS_TABLE};

/// Everything the wizard collected, ready to be written.
#[derive(Debug, Clone)]
pub struct Submission {
    pub form_type: String,
    /// Set when an existing inspection is being edited.
    pub existing_id: Option<String>,
    /// Category the edited inspection is filed under.
    pub category_id: Option<String>,
    pub status: InspectionStatus,
    pub location_name: String,
    pub address: Option<String>,
    pub fix: Option<GpsFix>,
    /// Planned date as entered; blank means none.
    pub planned_date: Option<String>,
    pub form_data: Map<String, Value>,
    pub photos: Vec<PendingPhoto>,
    /// Photos already stored for the inspection.
    pub existing_photo_count: usize,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub record: InspectionRecord,
    pub detail_rows: usize,
    pub photos: Vec<PhotoRecord>,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Inspection,
    Details,
    Photos,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Inspection => "saving the inspection",
            Stage::Details => "writing detail rows",
            Stage::Photos => "uploading photos",
        })
    }
}

fn at(stage: Stage) -> impl Fn(FimsError) -> (Stage, FimsError) {
    move |e| (stage, e)
}

/// Compensating actions, replayed newest first.
#[derive(Debug)]
enum Undo {
    DeleteRow {
        table: String,
        id: String,
    },
    RestoreRow {
        table: String,
        id: String,
        previous: Row,
    },
    RestoreDetails {
        table: String,
        inspection_id: String,
        previous: Vec<Row>,
    },
    RemoveObject {
        bucket: String,
        path: String,
    },
}

/// Writes submissions to a backend.
pub struct Submitter<'a> {
    backend: &'a mut dyn Backend,
    bucket: String,
    inspector: Option<String>,
}

impl<'a> Submitter<'a> {
    pub fn new(backend: &'a mut dyn Backend, bucket: &str) -> Self {
        Self {
            backend,
            bucket: bucket.to_string(),
            inspector: None,
        }
    }

    /// Record this inspector on saved inspections.
    pub fn with_inspector(mut self, inspector: Option<String>) -> Self {
        self.inspector = inspector;
        self
    }

    /// Write a submission.
    ///
    /// On failure every write already made is undone and
    /// [`FimsError::SubmissionFailed`] names the stage that failed.
    pub fn submit(
        &mut self,
        definition: &FormDefinition,
        category_id: &str,
        submission: &Submission,
    ) -> Result<SubmitOutcome> {
        let total_photos = submission.existing_photo_count + submission.photos.len();
        if total_photos > MAX_PHOTOS {
            return Err(FimsError::PhotoLimitExceeded { max: MAX_PHOTOS });
        }
        let planned_date = parse_optional_date(submission.planned_date.as_deref())?;
        let mut form_data = submission.form_data.clone();
        sanitize_dates(definition, &mut form_data);

        let mut undo = Vec::new();
        match self.apply(
            definition,
            category_id,
            submission,
            planned_date,
            &form_data,
            &mut undo,
        ) {
            Ok(outcome) => {
                tracing::info!(
                    "Saved inspection {} as {}",
                    outcome.record.inspection_number,
                    outcome.record.status
                );
                Ok(outcome)
            }
            Err((stage, e)) => {
                tracing::error!("Submission failed while {}: {}", stage, e);
                let rolled_back = self.roll_back(undo);
                Err(FimsError::SubmissionFailed {
                    stage: stage.to_string(),
                    message: e.to_string(),
                    rolled_back,
                })
            }
        }
    }

    fn apply(
        &mut self,
        definition: &FormDefinition,
        category_id: &str,
        submission: &Submission,
        planned_date: Option<NaiveDate>,
        form_data: &Map<String, Value>,
        undo: &mut Vec<Undo>,
    ) -> std::result::Result<SubmitOutcome, (Stage, FimsError)> {
        let now = Utc::now();
        let stamp = Value::String(now.to_rfc3339());

        let mut row = Row::new();
        row.insert("category_id".into(), Value::from(category_id));
        row.insert(
            "location_name".into(),
            Value::from(submission.location_name.as_str()),
        );
        row.insert("address".into(), optional_string(submission.address.as_deref()));
        let fix = submission.fix.as_ref();
        row.insert("latitude".into(), optional_number(fix.map(|f| f.latitude)));
        row.insert("longitude".into(), optional_number(fix.map(|f| f.longitude)));
        row.insert(
            "location_accuracy".into(),
            optional_number(fix.and_then(|f| f.accuracy_m)),
        );
        row.insert(
            PLANNED_DATE.into(),
            planned_date
                .map(|d| Value::String(d.format(DATE_FORMAT).to_string()))
                .unwrap_or(Value::Null),
        );
        row.insert("status".into(), Value::from(submission.status.as_str()));
        row.insert("form_data".into(), Value::Object(form_data.clone()));
        row.insert("updated_at".into(), stamp.clone());
        if let Some(inspector) = &self.inspector {
            row.insert("inspector".into(), Value::from(inspector.as_str()));
        }

        let saved = match &submission.existing_id {
            None => {
                row.insert(
                    "inspection_number".into(),
                    Value::String(inspection_number(&definition.number_prefix, now)),
                );
                row.insert("created_at".into(), stamp.clone());
                let inspection_date = match submission.status {
                    InspectionStatus::Submitted => stamp.clone(),
                    InspectionStatus::Draft => Value::Null,
                };
                row.insert("inspection_date".into(), inspection_date);

                let saved = self
                    .backend
                    .insert(INSPECTIONS_TABLE, row)
                    .map_err(at(Stage::Inspection))?;
                let id = row_id(&saved).ok_or_else(|| {
                    (
                        Stage::Inspection,
                        FimsError::backend("insert", "no id returned for the new inspection"),
                    )
                })?;
                undo.push(Undo::DeleteRow {
                    table: INSPECTIONS_TABLE.to_string(),
                    id,
                });
                saved
            }
            Some(id) => {
                let previous = self
                    .backend
                    .select(INSPECTIONS_TABLE, &Filter::new().eq("id", id.as_str()))
                    .map_err(at(Stage::Inspection))?
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        (
                            Stage::Inspection,
                            FimsError::InspectionNotFound { id: id.clone() },
                        )
                    })?;

                let first_submitted = previous
                    .get("inspection_date")
                    .filter(|v| !v.is_null())
                    .cloned();
                let inspection_date = match (first_submitted, submission.status) {
                    (Some(date), _) => date,
                    (None, InspectionStatus::Submitted) => stamp.clone(),
                    (None, InspectionStatus::Draft) => Value::Null,
                };
                row.insert("inspection_date".into(), inspection_date);

                // Columns the old row lacked are cleared again on restore.
                let mut restore = previous;
                for key in row.keys() {
                    if !restore.contains_key(key) {
                        restore.insert(key.clone(), Value::Null);
                    }
                }

                let saved = self
                    .backend
                    .update(INSPECTIONS_TABLE, id, row)
                    .map_err(at(Stage::Inspection))?;
                undo.push(Undo::RestoreRow {
                    table: INSPECTIONS_TABLE.to_string(),
                    id: id.clone(),
                    previous: restore,
                });
                saved
            }
        };
        let record = InspectionRecord::from_row(saved).map_err(at(Stage::Inspection))?;

        let mut detail_count = 0;
        if let Some(table) = &definition.detail_table {
            let linked = Filter::new().eq(INSPECTION_ID, record.id.as_str());
            let previous = self
                .backend
                .select(table, &linked)
                .map_err(at(Stage::Details))?;
            undo.push(Undo::RestoreDetails {
                table: table.clone(),
                inspection_id: record.id.clone(),
                previous,
            });

            let rows = detail_rows(definition, form_data, &record.id);
            if definition.is_tabular() {
                self.backend
                    .delete(table, &linked)
                    .map_err(at(Stage::Details))?;
                for row in rows {
                    self.backend
                        .insert(table, row)
                        .map_err(at(Stage::Details))?;
                    detail_count += 1;
                }
            } else {
                for row in rows {
                    self.backend
                        .upsert(table, row, INSPECTION_ID)
                        .map_err(at(Stage::Details))?;
                    detail_count += 1;
                }
            }
        }

        let mut photos = Vec::new();
        for (offset, photo) in submission.photos.iter().enumerate() {
            let order = (submission.existing_photo_count + offset + 1) as u32;
            let bytes = fs::read(&photo.path).map_err(|e| (Stage::Photos, FimsError::Io(e)))?;
            let file_name = photo.file_name();
            let path = object_path(&record.id, order, &file_name, now.timestamp_millis());

            self.backend
                .upload(&self.bucket, &path, &bytes, photo.content_type())
                .map_err(at(Stage::Photos))?;
            undo.push(Undo::RemoveObject {
                bucket: self.bucket.clone(),
                path: path.clone(),
            });

            let mut row = Row::new();
            row.insert(INSPECTION_ID.into(), Value::from(record.id.as_str()));
            row.insert(
                "photo_url".into(),
                Value::String(self.backend.public_url(&self.bucket, &path)),
            );
            row.insert("photo_name".into(), Value::String(file_name));
            row.insert(
                "description".into(),
                optional_string(Some(photo.description.as_str())),
            );
            row.insert("photo_order".into(), Value::from(order));

            let saved = self
                .backend
                .insert(PHOTOS_TABLE, row)
                .map_err(at(Stage::Photos))?;
            if let Some(id) = row_id(&saved) {
                undo.push(Undo::DeleteRow {
                    table: PHOTOS_TABLE.to_string(),
                    id,
                });
            }
            photos.push(PhotoRecord::from_row(saved).map_err(at(Stage::Photos))?);
            tracing::debug!("Uploaded photo {} as {}", order, path);
        }

        Ok(SubmitOutcome {
            record,
            detail_rows: detail_count,
            photos,
        })
    }

    /// Replay the undo log newest first. Returns whether every step worked.
    fn roll_back(&mut self, log: Vec<Undo>) -> bool {
        let mut clean = true;
        for step in log.into_iter().rev() {
            tracing::debug!("Rolling back: {:?}", step);
            let result = match step {
                Undo::DeleteRow { table, id } => self
                    .backend
                    .delete(&table, &Filter::new().eq("id", id.as_str()))
                    .map(|_| ()),
                Undo::RestoreRow {
                    table,
                    id,
                    mut previous,
                } => {
                    previous.remove("id");
                    self.backend.update(&table, &id, previous).map(|_| ())
                }
                Undo::RestoreDetails {
                    table,
                    inspection_id,
                    previous,
                } => self
                    .backend
                    .delete(&table, &Filter::new().eq(INSPECTION_ID, inspection_id.as_str()))
                    .and_then(|_| {
                        previous
                            .into_iter()
                            .try_for_each(|row| self.backend.insert(&table, row).map(|_| ()))
                    }),
                Undo::RemoveObject { bucket, path } => self.backend.remove_object(&bucket, &path),
            };
            if let Err(e) = result {
                tracing::error!("Rollback step failed: {}", e);
                clean = false;
            }
        }
        clean
    }
}

/// Blank dates become `None`; anything else must be `YYYY-MM-DD`.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|_| FimsError::InvalidField {
                key: PLANNED_DATE.to_string(),
                message: format!("'{}' is not a date (YYYY-MM-DD)", s),
            }),
    }
}

/// Replace blank date answers with `null`, including table cells.
pub fn sanitize_dates(definition: &FormDefinition, form_data: &mut Map<String, Value>) {
    for field in definition.blob_fields() {
        match &field.kind {
            FieldKind::Date => {
                if let Some(value) = form_data.get_mut(&field.key) {
                    blank_to_null(value);
                }
            }
            FieldKind::Table { columns, .. } => {
                let Some(Value::Array(rows)) = form_data.get_mut(&field.key) else {
                    continue;
                };
                for row in rows.iter_mut().filter_map(Value::as_object_mut) {
                    for column in columns.iter().filter(|c| c.is_date()) {
                        if let Some(value) = row.get_mut(&column.key) {
                            blank_to_null(value);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn blank_to_null(value: &mut Value) {
    if matches!(value, Value::String(s) if s.trim().is_empty()) {
        *value = Value::Null;
    }
}

fn optional_string(value: Option<&str>) -> Value {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => Value::String(s.to_string()),
        _ => Value::Null,
    }
}

fn optional_number(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
