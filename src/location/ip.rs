//! Coarse position lookup from the network address.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{FimsError, Result};

use super::position::{GpsFix, PositionOptions, PositionSource};

/// Accuracy reported for IP-derived positions, in meters.
pub const IP_ACCURACY_M: f64 = 5_000.0;

/// Looks up the position of the current network address over HTTP.
///
/// The endpoint must answer with `{"status": "success", "lat": .., "lon": ..}`.
pub struct IpLocator {
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl IpLocator {
    /// Create a locator for `endpoint`.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }

    /// The lookup endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn lookup(&self, options: &PositionOptions) -> anyhow::Result<GpsFix> {
        if options.high_accuracy {
            tracing::debug!("High accuracy requested; network lookup is coarse");
        }

        let client = Client::builder().timeout(options.timeout).build()?;
        let response = client.get(&self.endpoint).send()?;
        if !response.status().is_success() {
            anyhow::bail!("HTTP {} from {}", response.status(), self.endpoint);
        }

        let body: IpLookupResponse = response.json()?;
        if body.status != "success" {
            anyhow::bail!(
                "lookup failed: {}",
                body.message.unwrap_or_else(|| body.status.clone())
            );
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(GpsFix::new(lat, lon, Some(IP_ACCURACY_M))?),
            _ => anyhow::bail!("response carried no coordinates"),
        }
    }
}

impl PositionSource for IpLocator {
    fn current_position(&mut self, options: &PositionOptions) -> Result<GpsFix> {
        self.lookup(options).map_err(|e| FimsError::Geolocation {
            message: e.to_string(),
        })
    }
}
