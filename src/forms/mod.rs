//! Inspection form definitions.
//!
//! Each inspection category is described by a [`FormDefinition`]: the
//! fields of its metadata and checklist steps, the prefix of its inspection
//! numbers, its optional detail table and its optional derived score. The
//! built-in definitions live as YAML under `catalog/` and are embedded in
//! the binary.
//!
//! # Example
//!
//! ```
//! use fims::forms::FormCatalog;
//!
//! let catalog = FormCatalog::builtin().unwrap();
//! let office = catalog.get("office").unwrap();
//! assert_eq!(office.number_prefix, "OFF");
//! ```

pub mod catalog;
pub mod definition;
pub mod field;
pub mod state;

pub use catalog::FormCatalog;
pub use definition::{
    common_metadata_fields, FormDefinition, ADDRESS, LOCATION_NAME, PLANNED_DATE,
};
pub use field::{number_value, FieldKind, FieldSpec, DATE_FORMAT};
pub use state::FormState;
