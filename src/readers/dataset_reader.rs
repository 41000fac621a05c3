use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{info, warn};

use crate::error::Result;
use crate::models::{Dataset, ObservationRecord};

/// Locates and parses the most recent processed observation file.
///
/// Exactly one source file is read per invocation: the `*.csv` file with the
/// latest modification time in the configured directory. Absence of any
/// candidate is a routine condition, not an error.
pub struct DatasetReader {
    data_dir: PathBuf,
}

impl DatasetReader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the most recently modified CSV file, `None` when the
    /// directory is missing or holds no CSV files. Ties on modification
    /// time are broken arbitrarily by directory order.
    pub fn latest_csv(&self) -> Option<PathBuf> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(_) => {
                warn!(dir = %self.data_dir.display(), "processed data directory not readable");
                return None;
            }
        };

        let mut latest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            let Ok(modified) = metadata.modified() else {
                continue;
            };
            if latest.as_ref().map_or(true, |(stamp, _)| modified > *stamp) {
                latest = Some((modified, path));
            }
        }

        if latest.is_none() {
            warn!(dir = %self.data_dir.display(), "no processed data files found");
        }
        latest.map(|(_, path)| path)
    }

    /// Parses one CSV file with a header row into a dataset. Parse failures
    /// propagate to the caller's boundary handler.
    pub fn read_csv(&self, path: &Path) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut records = Vec::new();
        for row in reader.deserialize::<ObservationRecord>() {
            records.push(row?);
        }
        Ok(Dataset::new(records))
    }

    /// Reads the latest CSV file, `Ok(None)` when there is nothing to read.
    pub fn read_latest(&self) -> Result<Option<Dataset>> {
        match self.latest_csv() {
            None => Ok(None),
            Some(path) => {
                info!(path = %path.display(), "loading processed data");
                self.read_csv(&path).map(Some)
            }
        }
    }
}
