//! FIMS - Field inspection management for district officers.
//!
//! An inspector picks an inspection category, walks a four-step form
//! (basic information, location, checklist, photos) and submits it to a
//! table-and-storage backend, or saves it as a draft to finish later.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Layered YAML configuration
//! - [`error`] - Error types and result aliases
//! - [`forms`] - Form definitions and field values
//! - [`inspection`] - Records, categories, photos and the submission saga
//! - [`location`] - Position lookup and reverse geocoding
//! - [`store`] - Backend trait with local and REST implementations
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`wizard`] - The step-by-step form state machine and its runner
//!
//! # Example
//!
//! ```
//! use fims::forms::FormCatalog;
//! use fims::wizard::Wizard;
//!
//! let catalog = FormCatalog::builtin().unwrap();
//! let mut wizard = Wizard::create(catalog.get("office").unwrap().clone());
//! wizard.toggle("attendance_register").unwrap();
//! wizard.toggle("cash_book").unwrap();
//! assert_eq!(wizard.score(), Some(2));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod inspection;
pub mod location;
pub mod store;
pub mod ui;
pub mod wizard;

pub use error::{FimsError, Result};
