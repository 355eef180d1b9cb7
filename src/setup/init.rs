use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::domain::types::BinRecord;
use crate::error::{Error, Result};
use crate::setup::init_types::BinCsvRow;

/// Loads bins from a `.csv` or `.json` file.
pub fn load_bins(path: &Path) -> Result<Vec<BinRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let reader = BufReader::new(File::open(path)?);
    let bins = match extension.as_deref() {
        Some("csv") => read_bins_csv(reader)?,
        Some("json") => read_bins_json(reader)?,
        _ => {
            return Err(Error::invalid_input(format!(
                "{} is neither .csv nor .json",
                path.display()
            )))
        }
    };

    info!("Loaded {} bins from {}", bins.len(), path.display());
    Ok(bins)
}

/// Header row required: `bin_id,latitude,longitude[,fill_level][,collector_id]`.
pub fn read_bins_csv<R: Read>(reader: R) -> Result<Vec<BinRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bins = Vec::new();
    for row in reader.deserialize::<BinCsvRow>() {
        bins.push(BinRecord::from(row?));
    }
    ensure_unique_ids(&bins)?;
    Ok(bins)
}

/// A JSON array of bin records.
pub fn read_bins_json<R: Read>(reader: R) -> Result<Vec<BinRecord>> {
    let bins: Vec<BinRecord> = serde_json::from_reader(reader)?;
    ensure_unique_ids(&bins)?;
    Ok(bins)
}

fn ensure_unique_ids(bins: &[BinRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(bins.len());
    for record in bins {
        if !seen.insert(record.bin.bin_id.as_str()) {
            return Err(Error::invalid_input(format!(
                "bin id {} appears more than once",
                record.bin.bin_id
            )));
        }
    }
    debug!("{} unique bin ids", seen.len());
    Ok(())
}
