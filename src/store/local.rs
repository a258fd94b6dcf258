//! File-backed backend.
//!
//! Layout under the data directory:
//!
//! ```text
//! tables/<table>.json      rows plus the next id to hand out
//! storage/<bucket>/<path>  uploaded objects
//! ```
//!
//! Every table write goes to a temp file first and is renamed into place,
//! so a table file is never left half-written.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{FimsError, Result};

use super::{row_id, Backend, Filter, Row};

/// On-disk contents of one table.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TableFile {
    next_id: u64,
    rows: Vec<Row>,
}

/// Backend storing tables and objects under a local directory.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Open (and create if needed) a data directory.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root.join("tables"))?;
        fs::create_dir_all(root.join("storage"))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, table: &str) -> Result<PathBuf> {
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FimsError::backend(
                "table lookup",
                format!("invalid table name '{}'", table),
            ));
        }
        Ok(self.root.join("tables").join(format!("{}.json", table)))
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if bucket.is_empty() || bucket.contains(['/', '\\']) || !safe || path.is_empty() {
            return Err(FimsError::backend(
                "storage",
                format!("invalid object path '{}/{}'", bucket, path),
            ));
        }
        Ok(self.root.join("storage").join(bucket).join(relative))
    }

    fn load_table(&self, table: &str) -> Result<TableFile> {
        let path = self.table_path(table)?;
        if !path.exists() {
            return Ok(TableFile {
                next_id: 1,
                rows: Vec::new(),
            });
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| FimsError::ConfigParseError {
            path,
            message: e.to_string(),
        })
    }

    fn save_table(&self, table: &str, file: &TableFile) -> Result<()> {
        let path = self.table_path(table)?;
        let content = serde_json::to_string_pretty(file)
            .map_err(|e| FimsError::backend("serialize", e))?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn assign_id(file: &mut TableFile, row: &mut Row) {
        if row_id(row).is_none() {
            row.insert("id".to_string(), Value::String(file.next_id.to_string()));
            file.next_id += 1;
        }
    }
}

impl Backend for LocalBackend {
    fn insert(&mut self, table: &str, mut row: Row) -> Result<Row> {
        let mut file = self.load_table(table)?;
        Self::assign_id(&mut file, &mut row);

        if let Some(id) = row_id(&row) {
            if file.rows.iter().any(|r| row_id(r).as_deref() == Some(id.as_str())) {
                return Err(FimsError::backend(
                    "insert",
                    format!("duplicate id '{}' in {}", id, table),
                ));
            }
        }

        file.rows.push(row.clone());
        self.save_table(table, &file)?;
        tracing::debug!("Inserted row into {}", table);
        Ok(row)
    }

    fn update(&mut self, table: &str, id: &str, patch: Row) -> Result<Row> {
        let mut file = self.load_table(table)?;
        let existing = file
            .rows
            .iter_mut()
            .find(|r| row_id(r).as_deref() == Some(id))
            .ok_or_else(|| {
                FimsError::backend("update", format!("no row '{}' in {}", id, table))
            })?;

        for (key, value) in patch {
            if key != "id" {
                existing.insert(key, value);
            }
        }
        let updated = existing.clone();
        self.save_table(table, &file)?;
        tracing::debug!("Updated row {} in {}", id, table);
        Ok(updated)
    }

    fn upsert(&mut self, table: &str, mut row: Row, on_conflict: &str) -> Result<Row> {
        let mut file = self.load_table(table)?;
        let key = row.get(on_conflict).cloned().ok_or_else(|| {
            FimsError::backend(
                "upsert",
                format!("row has no '{}' conflict column", on_conflict),
            )
        })?;
        let filter = Filter::new().eq(on_conflict, key);

        let stored = match file.rows.iter().position(|r| filter.matches(r)) {
            Some(index) => {
                let existing = &mut file.rows[index];
                for (k, v) in row {
                    if k != "id" {
                        existing.insert(k, v);
                    }
                }
                existing.clone()
            }
            None => {
                Self::assign_id(&mut file, &mut row);
                file.rows.push(row.clone());
                row
            }
        };

        self.save_table(table, &file)?;
        tracing::debug!("Upserted row into {} on {}", table, on_conflict);
        Ok(stored)
    }

    fn delete(&mut self, table: &str, filter: &Filter) -> Result<usize> {
        let mut file = self.load_table(table)?;
        let before = file.rows.len();
        file.rows.retain(|r| !filter.matches(r));
        let removed = before - file.rows.len();
        if removed > 0 {
            self.save_table(table, &file)?;
        }
        tracing::debug!("Deleted {} row(s) from {}", removed, table);
        Ok(removed)
    }

    fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>> {
        let file = self.load_table(table)?;
        Ok(file.rows.into_iter().filter(|r| filter.matches(r)).collect())
    }

    fn upload(
        &mut self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<()> {
        let target = self.object_path(bucket, path)?;
        if target.exists() {
            return Err(FimsError::backend(
                "upload",
                format!("object '{}/{}' already exists", bucket, path),
            ));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, bytes)?;
        tracing::debug!("Stored object {}/{} ({} bytes)", bucket, path, bytes.len());
        Ok(())
    }

    fn remove_object(&mut self, bucket: &str, path: &str) -> Result<()> {
        let target = self.object_path(bucket, path)?;
        if target.exists() {
            fs::remove_file(&target)?;
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        let absolute = self
            .root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone());
        format!(
            "file://{}/storage/{}/{}",
            absolute.to_string_lossy().trim_end_matches('/'),
            bucket,
            path
        )
    }
}
