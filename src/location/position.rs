//! Position lookup.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FimsError, Result};

/// How a position lookup should behave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    /// Prefer the most accurate source available.
    pub high_accuracy: bool,
    /// Give up after this long.
    pub timeout: Duration,
    /// Accept a previously captured fix this old or younger.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
            maximum_age: Duration::from_secs(60),
        }
    }
}

/// A captured position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters.
    pub accuracy_m: Option<f64>,
    pub captured_at: DateTime<Utc>,
}

impl GpsFix {
    /// Create a fix captured now, validating the coordinate ranges.
    pub fn new(latitude: f64, longitude: f64, accuracy_m: Option<f64>) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(FimsError::Geolocation {
                message: format!("coordinates out of range: {}, {}", latitude, longitude),
            });
        }
        if accuracy_m.is_some_and(|a| !a.is_finite() || a < 0.0) {
            return Err(FimsError::Geolocation {
                message: "accuracy must be a non-negative number of meters".to_string(),
            });
        }
        Ok(Self {
            latitude,
            longitude,
            accuracy_m,
            captured_at: Utc::now(),
        })
    }

    /// Age of the fix relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.captured_at).to_std().unwrap_or_default()
    }
}

/// Something that can report the device's current position.
pub trait PositionSource {
    /// Single-shot position lookup.
    fn current_position(&mut self, options: &PositionOptions) -> Result<GpsFix>;
}

/// A position supplied up front (command-line flags).
#[derive(Debug, Clone)]
pub struct FixedPosition {
    fix: GpsFix,
}

impl FixedPosition {
    /// Wrap a known fix.
    pub fn new(fix: GpsFix) -> Self {
        Self { fix }
    }
}

impl PositionSource for FixedPosition {
    fn current_position(&mut self, _options: &PositionOptions) -> Result<GpsFix> {
        Ok(GpsFix {
            captured_at: Utc::now(),
            ..self.fix
        })
    }
}

/// Reuses the last fix while it is younger than `maximum_age`.
///
/// The last fix is persisted in a small state file so that consecutive
/// inspections at the same site do not repeat the lookup.
pub struct CachedPosition<S> {
    inner: S,
    cache_file: PathBuf,
}

impl<S: PositionSource> CachedPosition<S> {
    /// Wrap `inner`, caching under `cache_dir` with a file name derived
    /// from `source_key`.
    pub fn new(inner: S, cache_dir: &Path, source_key: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source_key.as_bytes());
        let name = hex::encode(hasher.finalize());
        Self {
            inner,
            cache_file: cache_dir.join(format!("position-{}.json", &name[..16])),
        }
    }

    /// Path of the cache file.
    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    fn read_cached(&self) -> Option<GpsFix> {
        let content = fs::read_to_string(&self.cache_file).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn write_cached(&self, fix: &GpsFix) -> Result<()> {
        if let Some(parent) = self.cache_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(fix).map_err(|e| FimsError::Geolocation {
            message: e.to_string(),
        })?;
        let temp_path = self.cache_file.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.cache_file)?;
        Ok(())
    }
}

impl<S: PositionSource> PositionSource for CachedPosition<S> {
    fn current_position(&mut self, options: &PositionOptions) -> Result<GpsFix> {
        if let Some(cached) = self.read_cached() {
            let max_age = ChronoDuration::from_std(options.maximum_age).unwrap_or_default();
            if Utc::now() - cached.captured_at <= max_age {
                tracing::debug!("Reusing cached position from {}", cached.captured_at);
                return Ok(cached);
            }
        }

        let fix = self.inner.current_position(options)?;
        if let Err(e) = self.write_cached(&fix) {
            tracing::warn!("Could not cache position: {}", e);
        }
        Ok(fix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct CountingSource {
        calls: usize,
    }

    impl PositionSource for CountingSource {
        fn current_position(&mut self, _options: &PositionOptions) -> Result<GpsFix> {
            self.calls += 1;
            GpsFix::new(18.52, 73.85, Some(12.0))
        }
    }

    #[test]
    fn default_options_match_lookup_budget() {
        let options = PositionOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(15));
        assert_eq!(options.maximum_age, Duration::from_secs(60));
    }

    #[test]
    fn fix_rejects_out_of_range_coordinates() {
        assert!(GpsFix::new(91.0, 0.0, None).is_err());
        assert!(GpsFix::new(0.0, -181.0, None).is_err());
        assert!(GpsFix::new(0.0, 0.0, Some(-1.0)).is_err());
        assert!(GpsFix::new(18.5, 73.8, Some(5.0)).is_ok());
    }

    #[test]
    fn fixed_position_returns_its_fix() {
        let fix = GpsFix::new(19.07, 72.87, None).unwrap();
        let mut source = FixedPosition::new(fix);
        let got = source
            .current_position(&PositionOptions::default())
            .unwrap();
        assert_eq!(got.latitude, 19.07);
        assert_eq!(got.longitude, 72.87);
    }

    #[test]
    fn cached_position_reuses_recent_fix() {
        let temp = TempDir::new().unwrap();
        let mut source = CachedPosition::new(CountingSource { calls: 0 }, temp.path(), "ip");
        let options = PositionOptions::default();

        let first = source.current_position(&options).unwrap();
        let second = source.current_position(&options).unwrap();

        assert_eq!(source.inner.calls, 1);
        assert_eq!(first, second);
        assert!(source.cache_file().exists());
    }

    #[test]
    fn zero_maximum_age_always_refreshes() {
        let temp = TempDir::new().unwrap();
        let mut source = CachedPosition::new(CountingSource { calls: 0 }, temp.path(), "ip");
        let options = PositionOptions {
            maximum_age: Duration::ZERO,
            ..Default::default()
        };

        source.current_position(&options).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        source.current_position(&options).unwrap();

        assert_eq!(source.inner.calls, 2);
    }

    #[test]
    fn fix_age_is_never_negative() {
        let fix = GpsFix::new(0.0, 0.0, None).unwrap();
        let earlier = fix.captured_at - ChronoDuration::seconds(10);
        assert_eq!(fix.age(earlier), Duration::ZERO);
    }
}
