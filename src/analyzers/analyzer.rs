use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::analyzers::{statistics, visualizations};
use crate::config::Settings;
use crate::error::{Outcome, Result};
use crate::metrics::{MetricsSink, Operation};
use crate::models::{AnalysisReport, Dataset};
use crate::readers::DatasetReader;
use crate::utils::filename;

type ChartFn = fn(&Dataset, &Path, &str) -> Result<Option<PathBuf>>;

const CHARTS: [(&str, ChartFn); 5] = [
    (
        "city_temperature_comparison",
        visualizations::city_temperature_comparison,
    ),
    ("temperature_trends", visualizations::temperature_trends),
    (
        "weather_condition_distribution",
        visualizations::weather_condition_distribution,
    ),
    (
        "temperature_humidity_correlation",
        visualizations::temperature_humidity_correlation,
    ),
    ("wind_speed_comparison", visualizations::wind_speed_comparison),
];

/// Computes the analysis report over the latest processed dataset, persists
/// it as indented JSON and drives chart rendering.
pub struct WeatherAnalyzer {
    reader: DatasetReader,
    output_dir: PathBuf,
    metrics: Arc<dyn MetricsSink>,
}

impl WeatherAnalyzer {
    pub fn new(settings: &Settings, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            reader: DatasetReader::new(&settings.data.processed_data_path),
            output_dir: settings.data.output_data_path.clone(),
            metrics,
        }
    }

    /// Runs the full analysis.
    ///
    /// An absent or empty input dataset yields `Outcome::Empty` with nothing
    /// written; a read or serialization failure yields `Outcome::Failure`.
    /// Chart failures are isolated per chart and never affect the returned
    /// report, which is already saved by the time rendering starts.
    pub fn analyze(&self) -> Outcome<AnalysisReport> {
        let started = Instant::now();
        let outcome = self.run_analysis();
        self.metrics
            .observe_duration(Operation::Analysis, started.elapsed().as_secs_f64());
        outcome
    }

    fn run_analysis(&self) -> Outcome<AnalysisReport> {
        let dataset = match self.reader.read_latest() {
            Ok(Some(dataset)) if !dataset.is_empty() => dataset,
            Ok(_) => {
                warn!("no data available for analysis");
                self.metrics.record_failure(Operation::Analysis);
                return Outcome::Empty;
            }
            Err(err) => {
                error!(error = %err, "error loading processed data");
                self.metrics.record_failure(Operation::Analysis);
                return Outcome::Failure(err.to_string());
            }
        };

        let report = AnalysisReport {
            basic_stats: statistics::basic_stats(&dataset),
            city_comparisons: statistics::compare_cities(&dataset),
            temperature_trends: statistics::temperature_trends(&dataset),
            weather_conditions: statistics::weather_conditions(&dataset),
        };

        let stamp = filename::run_timestamp();
        match self.save_report(&report, &stamp) {
            Ok(path) => info!(path = %path.display(), "saved analysis results"),
            Err(err) => {
                error!(error = %err, "error saving analysis results");
                self.metrics.record_failure(Operation::Analysis);
                return Outcome::Failure(err.to_string());
            }
        }

        self.render_charts(&dataset, &stamp);

        self.metrics.record_success(Operation::Analysis);
        Outcome::Success(report)
    }

    fn save_report(&self, report: &AnalysisReport, stamp: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(filename::analysis_filename(stamp));
        let file = BufWriter::new(fs::File::create(&path)?);
        serde_json::to_writer_pretty(file, report)?;
        Ok(path)
    }

    /// All five charts share one run stamp. A failure in one chart is
    /// logged and never aborts the remaining charts.
    fn render_charts(&self, dataset: &Dataset, stamp: &str) {
        let figures_dir = self.output_dir.join("figures");
        if let Err(err) = fs::create_dir_all(&figures_dir) {
            error!(error = %err, "error creating figures directory");
            return;
        }

        for (name, chart) in CHARTS {
            match chart(dataset, &figures_dir, stamp) {
                Ok(Some(path)) => {
                    info!(chart = name, path = %path.display(), "saved chart");
                    self.metrics.visualization_created();
                }
                Ok(None) => debug!(chart = name, "chart skipped, required columns absent"),
                Err(err) => error!(chart = name, error = %err, "error generating chart"),
            }
        }
    }
}
