//! Configuration schema.
//!
//! Maps the YAML layout of `.fims/config.yml`:
//!
//! ```yaml
//! inspector: A. Patil
//! backend:
//!   kind: rest
//!   url: https://project.example.co
//!   api_key_env: FIMS_API_KEY
//!   bucket: fims-photos
//! geolocation:
//!   provider: ip
//!   timeout_secs: 15
//!   maximum_age_secs: 60
//! geocoding:
//!   api_key_env: GOOGLE_MAPS_API_KEY
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FimsConfig {
    /// Name recorded as the inspecting officer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspector: Option<String>,

    /// Where inspections are stored.
    pub backend: BackendConfig,

    /// Position lookup settings.
    pub geolocation: GeolocationConfig,

    /// Reverse geocoding settings.
    pub geocoding: GeocodingConfig,
}

/// Backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// JSON tables under a local directory.
    #[default]
    Local,
    /// Hosted table + storage service.
    Rest,
}

/// Backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,

    /// Data directory for the local backend (relative to the project root).
    pub data_dir: PathBuf,

    /// Service URL for the rest backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Environment variable holding the service API key.
    pub api_key_env: String,

    /// Bucket receiving photo uploads.
    pub bucket: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Local,
            data_dir: PathBuf::from(".fims/data"),
            url: None,
            api_key_env: "FIMS_API_KEY".to_string(),
            bucket: "fims-photos".to_string(),
        }
    }
}

/// Where positions come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionProvider {
    /// The inspector types coordinates (or passes `--lat/--lon`).
    #[default]
    Manual,
    /// Network-address lookup.
    Ip,
}

/// Position lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub provider: PositionProvider,

    /// Lookup endpoint for the `ip` provider.
    pub endpoint: String,

    /// Single-shot lookup timeout.
    pub timeout_secs: u64,

    /// Age up to which a previous fix is reused.
    pub maximum_age_secs: u64,

    pub high_accuracy: bool,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            provider: PositionProvider::Manual,
            endpoint: "http://ip-api.com/json".to_string(),
            timeout_secs: 15,
            maximum_age_secs: 60,
            high_accuracy: true,
        }
    }
}

/// Reverse geocoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub enabled: bool,
    pub endpoint: String,

    /// Environment variable holding the mapping API key.
    pub api_key_env: String,

    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            api_key_env: "GOOGLE_MAPS_API_KEY".to_string(),
            timeout_secs: 10,
        }
    }
}
