//! Inspection records and their persistence.
//!
//! - [`InspectionRecord`] and [`PhotoRecord`] mirror stored rows
//! - [`CategoryCatalog`] maps categories to form types
//! - [`InspectionRepository`] reads inspections back for listing and editing
//! - [`Submitter`] writes a finished wizard, undoing partial writes on failure

pub mod category;
pub mod detail;
pub mod number;
pub mod photo;
pub mod record;
pub mod repository;
pub mod submit;

pub use category::{Category, CategoryCatalog};
pub use detail::detail_rows;
pub use number::inspection_number;
pub use photo::{PendingPhoto, PhotoRecord, MAX_PHOTOS};
pub use record::{InspectionRecord, InspectionStatus};
pub use repository::{InspectionRepository, LoadedInspection};
pub use submit::{Submission, SubmitOutcome, Submitter};
