//! Normalized detail rows.
//!
//! Some forms mirror their answers into a structured table next to the
//! inspection blob. Single-row forms write one row keyed by
//! `inspection_id`; tabular forms write one row per table row, numbered
//! from 1.

use serde_json::{Map, Value};

use crate::forms::{FieldKind, FormDefinition};
use crate::store::Row;

/// Column linking a detail row to its inspection.
pub const INSPECTION_ID: &str = "inspection_id";

/// Column numbering the rows of a tabular form.
pub const ROW_NUMBER: &str = "row_number";

/// Build the detail rows for an inspection's answers.
///
/// Returns nothing for forms without a detail table.
pub fn detail_rows(
    definition: &FormDefinition,
    form_data: &Map<String, Value>,
    inspection_id: &str,
) -> Vec<Row> {
    if definition.detail_table.is_none() {
        return Vec::new();
    }

    if let Some(table) = definition.table_field() {
        let FieldKind::Table { columns, max_rows } = &table.kind else {
            return Vec::new();
        };
        let rows = form_data
            .get(&table.key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        return rows
            .iter()
            .filter_map(Value::as_object)
            .take(*max_rows)
            .enumerate()
            .map(|(index, cells)| {
                let mut row = Row::new();
                row.insert(INSPECTION_ID.to_string(), Value::from(inspection_id));
                row.insert(ROW_NUMBER.to_string(), Value::from(index as u64 + 1));
                for column in columns {
                    let cell = cells.get(&column.key).cloned().unwrap_or(Value::Null);
                    row.insert(column.key.clone(), cell);
                }
                row
            })
            .collect();
    }

    let mut row = Row::new();
    row.insert(INSPECTION_ID.to_string(), Value::from(inspection_id));
    for field in definition.blob_fields() {
        let value = form_data.get(&field.key).cloned().unwrap_or(Value::Null);
        row.insert(field.key.clone(), value);
    }
    if let Some(score_field) = &definition.score_field {
        let score = form_data.get(score_field).cloned().unwrap_or(Value::Null);
        row.insert(score_field.clone(), score);
    }
    vec![row]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormCatalog;
    use serde_json::json;

    fn blob(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn forms_without_detail_table_write_nothing() {
        let forms = FormCatalog::builtin().unwrap();
        let office = forms.get("office").unwrap();
        assert!(detail_rows(office, &Map::new(), "1").is_empty());
    }

    #[test]
    fn single_row_mirrors_blob() {
        let forms = FormCatalog::builtin().unwrap();
        let school = forms.get("mumbai_high_court_school").unwrap();
        let key = school.scored_fields().next().unwrap().key.clone();
        let mut data = blob(json!({ "compliance_score": 1 }));
        data.insert(key.clone(), json!(true));

        let rows = detail_rows(school, &data, "9");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][INSPECTION_ID], json!("9"));
        assert_eq!(rows[0][&key], json!(true));
        assert_eq!(rows[0]["compliance_score"], json!(1));
        for field in school.blob_fields() {
            assert!(rows[0].contains_key(&field.key));
        }
    }

    #[test]
    fn tabular_rows_are_numbered_and_capped() {
        let forms = FormCatalog::builtin().unwrap();
        let zp = forms.get("zp_monthly_report").unwrap();
        let data = blob(json!({
            "report_rows": [
                {"scheme_name": "A", "target": 10, "achievement": 8},
                {"scheme_name": "B", "target": 5, "achievement": 5},
                {"scheme_name": "C"},
                {"scheme_name": "D"}
            ]
        }));

        let rows = detail_rows(zp, &data, "3");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][ROW_NUMBER], json!(1));
        assert_eq!(rows[2][ROW_NUMBER], json!(3));
        assert_eq!(rows[1]["scheme_name"], json!("B"));
        assert_eq!(rows[2]["target"], Value::Null);
    }
}
