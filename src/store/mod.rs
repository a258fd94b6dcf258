//! Table and object storage backends.
//!
//! Inspections, detail rows and photo rows are plain JSON rows in named
//! tables; photos are objects in a single bucket. [`Backend`] is the seam
//! between the submission logic and where the data actually lives:
//!
//! - [`LocalBackend`] keeps tables as JSON files under a data directory
//! - [`RestBackend`] talks to a hosted PostgREST-style table API and its
//!   object storage endpoints
//!
//! # Example
//!
//! ```
//! use fims::store::{Backend, Filter, LocalBackend};
//! use serde_json::json;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let mut backend = LocalBackend::open(temp.path()).unwrap();
//!
//! let row = json!({"location_name": "Pune"}).as_object().unwrap().clone();
//! let saved = backend.insert("fims_inspections", row).unwrap();
//! let id = saved["id"].as_str().unwrap().to_string();
//!
//! let found = backend
//!     .select("fims_inspections", &Filter::new().eq("id", id.as_str()))
//!     .unwrap();
//! assert_eq!(found.len(), 1);
//! ```

pub mod filter;
pub mod local;
pub mod rest;

pub use filter::Filter;
pub use local::LocalBackend;
pub use rest::RestBackend;

use serde_json::{Map, Value};
use std::path::Path;

use crate::config::{BackendConfig, BackendKind};
use crate::error::{FimsError, Result};

/// A table row.
pub type Row = Map<String, Value>;

/// Inspection records.
pub const INSPECTIONS_TABLE: &str = "fims_inspections";

/// Photo attachment rows.
pub const PHOTOS_TABLE: &str = "fims_inspection_photos";

/// Category catalog (read-only).
pub const CATEGORIES_TABLE: &str = "fims_categories";

/// Table and object storage operations.
pub trait Backend {
    /// Insert a row and return it as stored (with its `id`).
    fn insert(&mut self, table: &str, row: Row) -> Result<Row>;

    /// Apply `patch` to the row with the given `id` and return the result.
    fn update(&mut self, table: &str, id: &str, patch: Row) -> Result<Row>;

    /// Insert `row`, or merge it into the existing row whose
    /// `on_conflict` column holds the same value.
    fn upsert(&mut self, table: &str, row: Row, on_conflict: &str) -> Result<Row>;

    /// Delete matching rows, returning how many were removed.
    fn delete(&mut self, table: &str, filter: &Filter) -> Result<usize>;

    /// Select matching rows.
    fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>>;

    /// Store an object in a bucket.
    fn upload(&mut self, bucket: &str, path: &str, bytes: &[u8], content_type: &str)
        -> Result<()>;

    /// Remove an object from a bucket.
    fn remove_object(&mut self, bucket: &str, path: &str) -> Result<()>;

    /// Public URL of an object.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Read a row's `id` as a string, whatever JSON type the backend used.
pub fn row_id(row: &Row) -> Option<String> {
    match row.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Open the backend described by configuration.
///
/// Relative local data directories are resolved against `project_root`.
pub fn open_backend(config: &BackendConfig, project_root: &Path) -> Result<Box<dyn Backend>> {
    match config.kind {
        BackendKind::Local => {
            let dir = if config.data_dir.is_absolute() {
                config.data_dir.clone()
            } else {
                project_root.join(&config.data_dir)
            };
            tracing::debug!("Using local backend at {}", dir.display());
            Ok(Box::new(LocalBackend::open(&dir)?))
        }
        BackendKind::Rest => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| FimsError::ConfigValidationError {
                    message: "backend.url is required for the rest backend".to_string(),
                })?;
            let key = std::env::var(&config.api_key_env).map_err(|_| {
                FimsError::ConfigValidationError {
                    message: format!(
                        "environment variable {} must hold the backend API key",
                        config.api_key_env
                    ),
                }
            })?;
            tracing::debug!("Using REST backend at {}", url);
            Ok(Box::new(RestBackend::new(url, &key)?))
        }
    }
}
