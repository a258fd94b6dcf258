//! Reverse geocoding.
//!
//! Turns a latitude/longitude into a human-readable address using a
//! Google-style geocoding endpoint:
//!
//! ```text
//! GET {endpoint}?latlng={lat},{lng}&key={key}
//! {"status": "OK", "results": [{"formatted_address": "..."}]}
//! ```

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

use crate::config::GeocodingConfig;
use crate::error::{FimsError, Result};

/// Resolves coordinates to an address.
pub trait ReverseGeocoder {
    /// Formatted address for a coordinate pair.
    fn reverse(&self, latitude: f64, longitude: f64) -> Result<String>;
}

/// Geocoder backed by the Google Maps geocoding API (or a compatible one).
pub struct GoogleGeocoder {
    endpoint: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
}

impl GoogleGeocoder {
    /// Create a geocoder for `endpoint` using `api_key`.
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FimsError::Geocoding {
                message: e.to_string(),
            })?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Build a geocoder from configuration, reading the key from the
    /// configured environment variable.
    ///
    /// Returns `None` when geocoding is disabled or no key is set.
    pub fn from_config(config: &GeocodingConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let key = match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                tracing::warn!(
                    "{} is not set; addresses will not be looked up",
                    config.api_key_env
                );
                return None;
            }
        };
        match Self::new(
            &config.endpoint,
            &key,
            Duration::from_secs(config.timeout_secs),
        ) {
            Ok(geocoder) => Some(geocoder),
            Err(e) => {
                tracing::warn!("Geocoder unavailable: {}", e);
                None
            }
        }
    }

    fn request_url(&self, latitude: f64, longitude: f64) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| FimsError::Geocoding {
            message: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("latlng", &format!("{},{}", latitude, longitude))
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    fn lookup(&self, latitude: f64, longitude: f64) -> anyhow::Result<String> {
        let url = self.request_url(latitude, longitude)?;
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            anyhow::bail!("HTTP {}", response.status());
        }

        let body: GeocodeResponse = response.json()?;
        if body.status != "OK" {
            anyhow::bail!(
                "{}{}",
                body.status,
                body.error_message
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            );
        }

        body.results
            .into_iter()
            .next()
            .map(|r| r.formatted_address)
            .ok_or_else(|| anyhow::anyhow!("no results"))
    }
}

impl ReverseGeocoder for GoogleGeocoder {
    fn reverse(&self, latitude: f64, longitude: f64) -> Result<String> {
        self.lookup(latitude, longitude)
            .map_err(|e| FimsError::Geocoding {
                message: e.to_string(),
            })
    }
}
