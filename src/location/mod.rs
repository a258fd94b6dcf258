//! Geotagging: position lookup and reverse geocoding.
//!
//! - [`PositionSource`] implementations produce a [`GpsFix`] in a single
//!   shot, bounded by [`PositionOptions::timeout`]
//! - [`CachedPosition`] honours [`PositionOptions::maximum_age`]
//! - [`ReverseGeocoder`] turns a fix into a printable address

pub mod geocode;
pub mod ip;
pub mod position;

pub use geocode::{GoogleGeocoder, ReverseGeocoder};
pub use ip::{IpLocator, IP_ACCURACY_M};
pub use position::{CachedPosition, FixedPosition, GpsFix, PositionOptions, PositionSource};

use std::path::Path;

use crate::config::{GeolocationConfig, PositionProvider};

/// Options derived from configuration.
pub fn options_from_config(config: &GeolocationConfig) -> PositionOptions {
    PositionOptions {
        high_accuracy: config.high_accuracy,
        timeout: std::time::Duration::from_secs(config.timeout_secs),
        maximum_age: std::time::Duration::from_secs(config.maximum_age_secs),
    }
}

/// Build the configured position source.
///
/// A fix given on the command line always wins. `manual` yields `None`; the
/// wizard then asks for coordinates.
pub fn source_from_config(
    config: &GeolocationConfig,
    fixed: Option<GpsFix>,
    cache_dir: &Path,
) -> Option<Box<dyn PositionSource>> {
    if let Some(fix) = fixed {
        return Some(Box::new(FixedPosition::new(fix)));
    }
    match config.provider {
        PositionProvider::Manual => None,
        PositionProvider::Ip => Some(Box::new(CachedPosition::new(
            IpLocator::new(&config.endpoint),
            cache_dir,
            &config.endpoint,
        ))),
    }
}
