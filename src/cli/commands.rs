use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::analyzers::WeatherAnalyzer;
use crate::cli::args::{Cli, Commands, SinkFormat};
use crate::config::Settings;
use crate::error::{Outcome, Result};
use crate::metrics::{MetricsSink, Operation, PrometheusMetrics};
use crate::writers::MultiFormatLoader;

pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_file(&cli.config)?;
    init_tracing(cli.verbose, &settings.logging.level);

    let metrics = Arc::new(PrometheusMetrics::new()?);
    let sink: Arc<dyn MetricsSink> = metrics.clone();

    match cli.command {
        Commands::Analyze => {
            let analyzer = WeatherAnalyzer::new(&settings, sink);
            match analyzer.analyze() {
                Outcome::Success(report) => info!(
                    records = report.basic_stats.overall.count,
                    cities = report.city_comparisons.cities.len(),
                    "analysis complete"
                ),
                Outcome::Empty => warn!("analysis skipped, no input data"),
                Outcome::Failure(reason) => error!(%reason, "analysis failed"),
            }
        }

        Commands::Load {
            format,
            db_path,
            no_summary,
        } => {
            let loader = MultiFormatLoader::new(&settings, sink);
            match format {
                SinkFormat::Json => report_path("JSON", loader.load_to_json()),
                SinkFormat::Sqlite => {
                    report_path("SQLite", loader.load_to_sqlite(db_path.as_deref()))
                }
                SinkFormat::Csv => match loader.load_to_csv(!no_summary) {
                    Outcome::Success(export) => info!(
                        report = %export.report.display(),
                        summary = export.summary.is_some(),
                        "CSV load complete"
                    ),
                    Outcome::Empty => warn!("CSV load skipped, no input data"),
                    Outcome::Failure(reason) => error!(%reason, "CSV load failed"),
                },
            }
        }

        Commands::Run {
            skip_analyze,
            skip_load,
            show_metrics,
        } => {
            run_pipeline(&settings, &metrics, skip_analyze, skip_load);
            if show_metrics {
                println!("{}", metrics.render()?);
            }
        }
    }

    Ok(())
}

/// Executes analysis then all three sinks in sequence. Phase outcomes are
/// logged; only a `Failure` outcome marks the run failed, an `Empty` input
/// does not.
fn run_pipeline(
    settings: &Settings,
    metrics: &Arc<PrometheusMetrics>,
    skip_analyze: bool,
    skip_load: bool,
) {
    let sink: Arc<dyn MetricsSink> = metrics.clone();
    let started = Instant::now();
    let mut failed = false;

    info!("starting weather data pipeline");

    if skip_analyze {
        info!("skipping analysis phase");
    } else {
        info!("starting analysis phase");
        let analyzer = WeatherAnalyzer::new(settings, sink.clone());
        failed |= analyzer.analyze().is_failure();
    }

    if skip_load {
        info!("skipping loading phase");
    } else {
        info!("starting loading phase");
        let loader = MultiFormatLoader::new(settings, sink.clone());
        failed |= loader.load_to_json().is_failure();
        failed |= loader.load_to_sqlite(None).is_failure();
        failed |= loader.load_to_csv(true).is_failure();
    }

    let elapsed = started.elapsed().as_secs_f64();
    metrics.observe_duration(Operation::Pipeline, elapsed);
    if failed {
        metrics.record_failure(Operation::Pipeline);
        error!(elapsed_secs = elapsed, "pipeline completed with failures");
    } else {
        metrics.record_success(Operation::Pipeline);
        info!(elapsed_secs = elapsed, "pipeline completed");
    }
}

fn init_tracing(verbose: bool, default_level: &str) {
    let directive = if verbose { "debug" } else { default_level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    // Ignore the error if a subscriber is already installed (tests).
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn report_path(sink: &str, outcome: Outcome<std::path::PathBuf>) {
    match outcome {
        Outcome::Success(path) => info!(path = %path.display(), "{sink} load complete"),
        Outcome::Empty => warn!("{sink} load skipped, no input data"),
        Outcome::Failure(reason) => error!(%reason, "{sink} load failed"),
    }
}
