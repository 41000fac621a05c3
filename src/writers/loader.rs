use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::Settings;
use crate::error::{Outcome, Result};
use crate::metrics::{MetricsSink, Operation};
use crate::models::Dataset;
use crate::readers::DatasetReader;
use crate::utils::filename;
use crate::writers::{CsvWriter, JsonWriter, SqliteWriter};

/// Paths produced by one CSV load; the summary is only present when it was
/// requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub report: PathBuf,
    pub summary: Option<PathBuf>,
}

/// Re-serializes the latest processed dataset into one of three sink
/// formats.
///
/// Every operation re-reads the input file fresh; no dataset is shared
/// across calls. Absence of input yields `Outcome::Empty`, a processing
/// failure yields `Outcome::Failure`; neither is ever raised.
pub struct MultiFormatLoader {
    reader: DatasetReader,
    output_dir: PathBuf,
    metrics: Arc<dyn MetricsSink>,
    json_writer: JsonWriter,
    sqlite_writer: SqliteWriter,
    csv_writer: CsvWriter,
}

impl MultiFormatLoader {
    pub fn new(settings: &Settings, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            reader: DatasetReader::new(&settings.data.processed_data_path),
            output_dir: settings.data.output_data_path.clone(),
            metrics,
            json_writer: JsonWriter::new(),
            sqlite_writer: SqliteWriter::new(),
            csv_writer: CsvWriter::new(),
        }
    }

    /// Dumps the full ordered record list as indented JSON into
    /// `weather_data_<stamp>.json`.
    pub fn load_to_json(&self) -> Outcome<PathBuf> {
        let started = Instant::now();
        let outcome = self.json_outcome();
        self.metrics
            .observe_duration(Operation::Load, started.elapsed().as_secs_f64());
        outcome
    }

    /// Replaces the `weather_data` table in the SQLite database and
    /// (re-)creates the `idx_city` and `idx_date` indices. Defaults to
    /// `weather_data.db` in the output directory.
    pub fn load_to_sqlite(&self, db_path: Option<&Path>) -> Outcome<PathBuf> {
        let started = Instant::now();
        let outcome = self.sqlite_outcome(db_path);
        self.metrics
            .observe_duration(Operation::Load, started.elapsed().as_secs_f64());
        outcome
    }

    /// Writes the full table to `weather_report_<stamp>.csv`, preceded by a
    /// per-city `weather_summary_<stamp>.csv` when `include_summary` is set.
    pub fn load_to_csv(&self, include_summary: bool) -> Outcome<CsvExport> {
        let started = Instant::now();
        let outcome = self.csv_outcome(include_summary);
        self.metrics
            .observe_duration(Operation::Load, started.elapsed().as_secs_f64());
        outcome
    }

    fn json_outcome(&self) -> Outcome<PathBuf> {
        let dataset = match self.fetch_dataset() {
            Ok(dataset) => dataset,
            Err(outcome) => return outcome,
        };

        let path = self
            .output_dir
            .join(filename::records_filename(&filename::run_timestamp()));
        match self.json_writer.write_records(dataset.records(), &path) {
            Ok(()) => {
                info!(path = %path.display(), "loaded data to JSON file");
                self.metrics.record_success(Operation::Load);
                Outcome::Success(path)
            }
            Err(err) => self.fail("error loading data to JSON", err),
        }
    }

    fn sqlite_outcome(&self, db_path: Option<&Path>) -> Outcome<PathBuf> {
        let dataset = match self.fetch_dataset() {
            Ok(dataset) => dataset,
            Err(outcome) => return outcome,
        };

        let db_path = db_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_dir.join(filename::DATABASE_FILENAME));
        match self.sqlite_writer.write_records(dataset.records(), &db_path) {
            Ok(()) => {
                info!(path = %db_path.display(), "loaded data to SQLite database");
                self.metrics.record_success(Operation::Load);
                Outcome::Success(db_path)
            }
            Err(err) => self.fail("error loading data to SQLite", err),
        }
    }

    fn csv_outcome(&self, include_summary: bool) -> Outcome<CsvExport> {
        let dataset = match self.fetch_dataset() {
            Ok(dataset) => dataset,
            Err(outcome) => return outcome,
        };

        let stamp = filename::run_timestamp();
        let summary = if include_summary {
            let summary_path = self.output_dir.join(filename::summary_filename(&stamp));
            match self.csv_writer.write_summary(&dataset, &summary_path) {
                Ok(()) => {
                    info!(path = %summary_path.display(), "saved summary statistics");
                    Some(summary_path)
                }
                Err(err) => return self.fail("error loading data to CSV", err),
            }
        } else {
            None
        };

        let report_path = self.output_dir.join(filename::report_filename(&stamp));
        match self.csv_writer.write_records(dataset.records(), &report_path) {
            Ok(()) => {
                info!(path = %report_path.display(), "loaded data to CSV file");
                self.metrics.record_success(Operation::Load);
                Outcome::Success(CsvExport {
                    report: report_path,
                    summary,
                })
            }
            Err(err) => self.fail("error loading data to CSV", err),
        }
    }

    /// Shared boundary handling: a missing input file is a warning and a
    /// failure-counter increment; a read error is logged and converted, not
    /// propagated. The records-loaded gauge is set to the row count of
    /// whatever dataset the operation goes on to process.
    fn fetch_dataset<T>(&self) -> std::result::Result<Dataset, Outcome<T>> {
        match self.reader.read_latest() {
            Ok(Some(dataset)) => {
                self.metrics.set_records_loaded(dataset.len() as u64);
                Ok(dataset)
            }
            Ok(None) => {
                warn!("no processed data file found to load");
                self.metrics.record_failure(Operation::Load);
                Err(Outcome::Empty)
            }
            Err(err) => {
                error!(error = %err, "error reading processed data");
                self.metrics.record_failure(Operation::Load);
                Err(Outcome::Failure(err.to_string()))
            }
        }
    }

    fn fail<T>(&self, context: &str, err: crate::error::PipelineError) -> Outcome<T> {
        error!(error = %err, "{context}");
        self.metrics.record_failure(Operation::Load);
        Outcome::Failure(err.to_string())
    }
}
