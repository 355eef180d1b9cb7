use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use dotenv::dotenv;
use tracing::{info, warn};

use crate::domain::types::GeoPoint;
use crate::error::{Error, Result};
use crate::evaluation::metrics::MetricsParams;

pub mod constant {
    use crate::domain::types::GeoPoint;

    /// New Delhi, used when a caller gives no start coordinate.
    pub const FALLBACK_START: GeoPoint = GeoPoint::new(28.6139, 77.2090);
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
    pub const AVERAGE_SPEED_KMH: f64 = 20.0;
    pub const SERVICE_MINUTES_PER_STOP: f64 = 5.0;
    pub const MIN_FILL_LEVEL: f64 = 0.0;
    pub const DATABASE_URL: &str = "sqlite:binroute.sqlite";
    pub const OUTPUT_CSV: &str = "routes.csv";
    pub const FIXTURE_BIN_COUNT: usize = 40;
    pub const FIXTURE_COLLECTORS: usize = 3;
    pub const FIXTURE_RADIUS_KM: f64 = 8.0;
    pub const SEED: u64 = 12345;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bins_file: Option<PathBuf>,
    pub output_csv: PathBuf,
    pub start: GeoPoint,
    pub metrics: MetricsParams,
    pub min_fill_level: f64,
    pub fixture_bin_count: usize,
    pub fixture_collectors: usize,
    pub fixture_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: constant::DATABASE_URL.to_string(),
            bins_file: None,
            output_csv: PathBuf::from(constant::OUTPUT_CSV),
            start: constant::FALLBACK_START,
            metrics: MetricsParams::default(),
            min_fill_level: constant::MIN_FILL_LEVEL,
            fixture_bin_count: constant::FIXTURE_BIN_COUNT,
            fixture_collectors: constant::FIXTURE_COLLECTORS,
            fixture_seed: constant::SEED,
        }
    }
}

impl Config {
    /// Reads `.env` and the process environment.
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            warn!("DATABASE_URL not set, using default SQLite file");
            defaults.database_url.clone()
        });

        let start = GeoPoint::new(
            try_load(&lookup, "START_LATITUDE", defaults.start.latitude)?,
            try_load(&lookup, "START_LONGITUDE", defaults.start.longitude)?,
        );
        if !start.is_valid() {
            return Err(Error::invalid_config(format!(
                "start ({}, {}) is not a valid coordinate",
                start.latitude, start.longitude
            )));
        }

        let metrics = MetricsParams::new(
            try_load(&lookup, "AVERAGE_SPEED_KMH", defaults.metrics.average_speed_kmh)?,
            try_load(
                &lookup,
                "SERVICE_MINUTES_PER_STOP",
                defaults.metrics.service_minutes_per_stop,
            )?,
        )?;

        let min_fill_level = try_load(&lookup, "MIN_FILL_LEVEL", defaults.min_fill_level)?;
        if !(0.0..=100.0).contains(&min_fill_level) {
            return Err(Error::invalid_config(format!(
                "MIN_FILL_LEVEL must be within 0..=100, got {min_fill_level}"
            )));
        }

        let fixture_collectors =
            try_load(&lookup, "FIXTURE_COLLECTORS", defaults.fixture_collectors)?;
        if fixture_collectors == 0 {
            return Err(Error::invalid_config("FIXTURE_COLLECTORS must be at least 1"));
        }

        Ok(Self {
            database_url,
            bins_file: lookup("BINS_FILE").map(PathBuf::from),
            output_csv: lookup("OUTPUT_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_csv),
            start,
            metrics,
            min_fill_level,
            fixture_bin_count: try_load(&lookup, "FIXTURE_BIN_COUNT", defaults.fixture_bin_count)?,
            fixture_collectors,
            fixture_seed: try_load(&lookup, "FIXTURE_SEED", defaults.fixture_seed)?,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::invalid_config(format!("invalid {key} value '{raw}': {e}"))),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.start, constant::FALLBACK_START);
        assert_eq!(config.metrics.average_speed_kmh, 20.0);
        assert_eq!(config.metrics.service_minutes_per_stop, 5.0);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BINS_FILE", "bins.csv"),
            ("START_LATITUDE", "19.076"),
            ("START_LONGITUDE", "72.8777"),
            ("AVERAGE_SPEED_KMH", "30"),
            ("MIN_FILL_LEVEL", "60"),
            ("FIXTURE_SEED", "7"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bins_file, Some(PathBuf::from("bins.csv")));
        assert_eq!(config.start, GeoPoint::new(19.076, 72.8777));
        assert_eq!(config.metrics.average_speed_kmh, 30.0);
        assert_eq!(config.min_fill_level, 60.0);
        assert_eq!(config.fixture_seed, 7);
    }

    #[test]
    fn bad_values_are_config_errors() {
        let cases: &[(&str, &str)] = &[
            ("AVERAGE_SPEED_KMH", "fast"),
            ("AVERAGE_SPEED_KMH", "0"),
            ("SERVICE_MINUTES_PER_STOP", "-1"),
            ("START_LATITUDE", "95"),
            ("MIN_FILL_LEVEL", "150"),
            ("FIXTURE_COLLECTORS", "0"),
        ];
        for &(key, value) in cases {
            let err = Config::from_lookup(lookup_from(&[(key, value)])).unwrap_err();
            assert!(
                matches!(err, Error::InvalidConfig(_)),
                "{key}={value} gave {err:?}"
            );
        }
    }
}
