//! Error types for FIMS operations.
//!
//! This module defines [`FimsError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `FimsError` for domain errors the CLI reports distinctly
//! - Use `anyhow::Error` (via `FimsError::Other`) inside HTTP helpers
//! - Messages are shown to the inspector verbatim, so keep them actionable

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for FIMS operations.
#[derive(Debug, Error)]
pub enum FimsError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration or catalog file.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// No form is registered for the given type tag.
    #[error("Unknown inspection type: {form_type}")]
    UnknownFormType { form_type: String },

    /// A record references a category the catalog does not know.
    #[error("Unknown category: {category_id}")]
    UnknownCategory { category_id: String },

    /// No inspection exists with the given identifier.
    #[error("Inspection not found: {id}")]
    InspectionNotFound { id: String },

    /// A wizard step cannot be left until its required fields are filled.
    #[error("Step {step} is incomplete, missing: {}", missing.join(", "))]
    StepIncomplete { step: String, missing: Vec<String> },

    /// Navigation past the first or last step.
    #[error("Cannot move {direction} from step {step}")]
    InvalidTransition { step: String, direction: String },

    /// Mutation attempted on a wizard opened in view mode.
    #[error("Inspection is open read-only")]
    ReadOnly,

    /// The photo set is already full.
    #[error("At most {max} photos can be attached to an inspection")]
    PhotoLimitExceeded { max: usize },

    /// A field value does not match the field definition.
    #[error("Invalid value for '{key}': {message}")]
    InvalidField { key: String, message: String },

    /// The position lookup failed or timed out.
    #[error("Could not determine location: {message}")]
    Geolocation { message: String },

    /// Reverse geocoding failed.
    #[error("Could not resolve address: {message}")]
    Geocoding { message: String },

    /// A backend table or storage call failed.
    #[error("Backend {operation} failed: {message}")]
    Backend { operation: String, message: String },

    /// A submission aborted part-way through its write sequence.
    #[error("Submission failed while {stage}: {message}{}", if *rolled_back { " (changes rolled back)" } else { " (rollback incomplete)" })]
    SubmissionFailed {
        stage: String,
        message: String,
        rolled_back: bool,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FimsError {
    /// Build a backend error from any displayable cause.
    pub fn backend(operation: &str, message: impl std::fmt::Display) -> Self {
        Self::Backend {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for FIMS operations.
pub type Result<T> = std::result::Result<T, FimsError>;
