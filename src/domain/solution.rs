use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::BinLocation;
use crate::error::{Error, Result};

/// An ordered visiting sequence. Always a permutation of the bins it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    pub stops: Vec<BinLocation>,
}

impl Route {
    pub fn new(stops: Vec<BinLocation>) -> Self {
        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BinLocation> {
        self.stops.iter()
    }

    pub fn bin_ids(&self) -> Vec<&str> {
        self.stops.iter().map(|b| b.bin_id.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    pub total_distance_km: f64,
    pub estimated_time_minutes: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    #[default]
    Pending,
    Collected,
    Skipped,
}

impl StopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopStatus::Pending => "pending",
            StopStatus::Collected => "collected",
            StopStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for StopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StopStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(StopStatus::Pending),
            "collected" => Ok(StopStatus::Collected),
            "skipped" => Ok(StopStatus::Skipped),
            other => Err(Error::invalid_input(format!("unknown stop status '{other}'"))),
        }
    }
}

/// One persisted route position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub bin: BinLocation,
    pub order: usize,
    pub status: StopStatus,
}

/// Numbers the stops of a freshly optimized route, all pending.
pub fn stops_from_route(route: &Route) -> Vec<RouteStop> {
    route
        .iter()
        .enumerate()
        .map(|(order, bin)| RouteStop {
            bin: bin.clone(),
            order,
            status: StopStatus::Pending,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRoute {
    pub collector_id: String,
    pub stops: Vec<RouteStop>,
    pub metrics: RouteMetrics,
    pub assigned_at: DateTime<Utc>,
}

impl CurrentRoute {
    pub fn pending(&self) -> usize {
        self.stops
            .iter()
            .filter(|s| s.status == StopStatus::Pending)
            .count()
    }
}
