use std::io::Write;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::domain::solution::CurrentRoute;
use crate::error::Result;
use crate::setup::init_types::RouteCsvRow;

pub fn save_routes_to_csv(routes: &[CurrentRoute], path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;
    write_rows(routes, &mut wtr)?;
    info!("Wrote {} routes to {}", routes.len(), path.display());
    Ok(())
}

pub fn write_routes_csv<W: Write>(routes: &[CurrentRoute], writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    write_rows(routes, &mut wtr)
}

fn write_rows<W: Write>(routes: &[CurrentRoute], wtr: &mut Writer<W>) -> Result<()> {
    // An empty export still gets a header.
    if routes.iter().all(|r| r.stops.is_empty()) {
        wtr.write_record(["collector_id", "order", "bin_id", "latitude", "longitude", "status"])?;
    }
    for route in routes {
        for stop in &route.stops {
            wtr.serialize(RouteCsvRow {
                collector_id: &route.collector_id,
                order: stop.order,
                bin_id: &stop.bin.bin_id,
                latitude: stop.bin.location.latitude,
                longitude: stop.bin.location.longitude,
                status: stop.status,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}
