use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components finite and inside the usual degree ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinLocation {
    pub bin_id: String,
    pub location: GeoPoint,
}

impl BinLocation {
    pub fn new(bin_id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            bin_id: bin_id.into(),
            location: GeoPoint::new(latitude, longitude),
        }
    }
}

/// A bin as the data sources store it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinRecord {
    #[serde(flatten)]
    pub bin: BinLocation,
    /// Percent full, 0..=100.
    #[serde(default)]
    pub fill_level: f64,
    #[serde(default)]
    pub collector_id: Option<String>,
}

impl BinRecord {
    pub fn new(bin: BinLocation, fill_level: f64, collector_id: Option<String>) -> Self {
        Self {
            bin,
            fill_level,
            collector_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Supervisor,
    Collector,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Supervisor => "supervisor",
            Role::Collector => "collector",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "supervisor" => Ok(Role::Supervisor),
            "collector" => Ok(Role::Collector),
            other => Err(Error::invalid_input(format!("unknown user type '{other}'"))),
        }
    }
}

/// Whoever is calling into the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn supervisor(id: impl Into<String>) -> Self {
        Self::new(id, Role::Supervisor)
    }

    pub fn collector(id: impl Into<String>) -> Self {
        Self::new(id, Role::Collector)
    }
}
