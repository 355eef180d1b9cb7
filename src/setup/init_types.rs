use serde::{Deserialize, Serialize};

use crate::domain::solution::StopStatus;
use crate::domain::types::{BinLocation, BinRecord};

/// One row of a bins CSV file.
#[derive(Debug, Deserialize)]
pub struct BinCsvRow {
    pub bin_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub fill_level: Option<f64>,
    #[serde(default)]
    pub collector_id: Option<String>,
}

impl From<BinCsvRow> for BinRecord {
    fn from(row: BinCsvRow) -> Self {
        BinRecord::new(
            BinLocation::new(row.bin_id, row.latitude, row.longitude),
            row.fill_level.unwrap_or(0.0),
            row.collector_id.filter(|c| !c.is_empty()),
        )
    }
}

/// One row of the exported routes CSV.
#[derive(Debug, Serialize)]
pub struct RouteCsvRow<'a> {
    pub collector_id: &'a str,
    pub order: usize,
    pub bin_id: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub status: StopStatus,
}
