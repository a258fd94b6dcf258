//! Configuration loading for FIMS.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, layering and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use fims::config::{load_merged_config, BackendKind};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::create_dir_all(temp.path().join(".fims")).unwrap();
//! fs::write(temp.path().join(".fims/config.yml"), "inspector: A. Patil").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! assert_eq!(config.inspector.as_deref(), Some("A. Patil"));
//! assert_eq!(config.backend.kind, BackendKind::Local);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    deep_merge, load_config, load_merged_config, state_dir, ConfigPaths, CONFIG_DIR,
};
pub use schema::{
    BackendConfig, BackendKind, FimsConfig, GeocodingConfig, GeolocationConfig,
    PositionProvider,
};
