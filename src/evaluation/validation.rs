use crate::domain::types::{BinLocation, GeoPoint};
use crate::error::{Error, Result};

pub fn validate_point(point: &GeoPoint) -> Result<()> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(Error::InvalidCoordinate {
            bin_id: None,
            latitude: point.latitude,
            longitude: point.longitude,
        })
    }
}

/// Fails on the first bin whose location is not a usable coordinate.
pub fn validate_bins(bins: &[BinLocation]) -> Result<()> {
    match bins.iter().find(|b| !b.location.is_valid()) {
        Some(bad) => Err(Error::InvalidCoordinate {
            bin_id: Some(bad.bin_id.clone()),
            latitude: bad.location.latitude,
            longitude: bad.location.longitude,
        }),
        None => Ok(()),
    }
}
