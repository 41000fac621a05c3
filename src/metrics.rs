use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

use crate::error::Result;

/// Pipeline operation a metric observation is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Analysis,
    Load,
    Pipeline,
}

/// Injectable sink for the pipeline's observability counters.
///
/// Components receive an implementation at construction time; nothing in the
/// crate touches a process-global registry. Increments are commutative and
/// carry no ordering guarantee.
pub trait MetricsSink: Send + Sync {
    fn record_success(&self, op: Operation);
    fn record_failure(&self, op: Operation);
    fn visualization_created(&self);
    fn set_records_loaded(&self, count: u64);
    fn observe_duration(&self, op: Operation, seconds: f64);
}

/// Sink that discards every observation. Default for tests.
#[derive(Debug, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record_success(&self, _op: Operation) {}
    fn record_failure(&self, _op: Operation) {}
    fn visualization_created(&self) {}
    fn set_records_loaded(&self, _count: u64) {}
    fn observe_duration(&self, _op: Operation, _seconds: f64) {}
}

/// Prometheus-backed sink. Metric names are part of the observable contract
/// and must not change between releases.
pub struct PrometheusMetrics {
    registry: Registry,
    analysis_successes: IntCounter,
    analysis_failures: IntCounter,
    visualizations_created: IntCounter,
    analysis_time: Histogram,
    load_successes: IntCounter,
    load_failures: IntCounter,
    records_loaded: IntGauge,
    load_time: Histogram,
    pipeline_runs: IntCounter,
    pipeline_failures: IntCounter,
    pipeline_duration: Histogram,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let analysis_successes = IntCounter::new(
            "weather_analysis_successes",
            "Number of successful analyses",
        )?;
        let analysis_failures =
            IntCounter::new("weather_analysis_failures", "Number of failed analyses")?;
        let visualizations_created = IntCounter::new(
            "weather_visualizations_created",
            "Number of visualizations created",
        )?;
        let analysis_time = Histogram::with_opts(HistogramOpts::new(
            "weather_analysis_processing_time",
            "Analysis processing time in seconds",
        ))?;
        let load_successes =
            IntCounter::new("weather_load_successes", "Number of successful data loads")?;
        let load_failures =
            IntCounter::new("weather_load_failures", "Number of failed data loads")?;
        let records_loaded =
            IntGauge::new("weather_records_loaded", "Number of records loaded")?;
        let load_time = Histogram::with_opts(HistogramOpts::new(
            "weather_load_processing_time",
            "Time to load data in seconds",
        ))?;
        let pipeline_runs =
            IntCounter::new("weather_pipeline_runs", "Number of completed pipeline runs")?;
        let pipeline_failures =
            IntCounter::new("weather_pipeline_failures", "Number of pipeline failures")?;
        let pipeline_duration = Histogram::with_opts(HistogramOpts::new(
            "weather_pipeline_duration_seconds",
            "Total pipeline execution time",
        ))?;

        registry.register(Box::new(analysis_successes.clone()))?;
        registry.register(Box::new(analysis_failures.clone()))?;
        registry.register(Box::new(visualizations_created.clone()))?;
        registry.register(Box::new(analysis_time.clone()))?;
        registry.register(Box::new(load_successes.clone()))?;
        registry.register(Box::new(load_failures.clone()))?;
        registry.register(Box::new(records_loaded.clone()))?;
        registry.register(Box::new(load_time.clone()))?;
        registry.register(Box::new(pipeline_runs.clone()))?;
        registry.register(Box::new(pipeline_failures.clone()))?;
        registry.register(Box::new(pipeline_duration.clone()))?;

        Ok(Self {
            registry,
            analysis_successes,
            analysis_failures,
            visualizations_created,
            analysis_time,
            load_successes,
            load_failures,
            records_loaded,
            load_time,
            pipeline_runs,
            pipeline_failures,
            pipeline_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Renders the current state of the registry in the Prometheus text
    /// exposition format, ready for an external scraper.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsSink for PrometheusMetrics {
    fn record_success(&self, op: Operation) {
        match op {
            Operation::Analysis => self.analysis_successes.inc(),
            Operation::Load => self.load_successes.inc(),
            Operation::Pipeline => self.pipeline_runs.inc(),
        }
    }

    fn record_failure(&self, op: Operation) {
        match op {
            Operation::Analysis => self.analysis_failures.inc(),
            Operation::Load => self.load_failures.inc(),
            Operation::Pipeline => self.pipeline_failures.inc(),
        }
    }

    fn visualization_created(&self) {
        self.visualizations_created.inc();
    }

    fn set_records_loaded(&self, count: u64) {
        self.records_loaded.set(count as i64);
    }

    fn observe_duration(&self, op: Operation, seconds: f64) {
        match op {
            Operation::Analysis => self.analysis_time.observe(seconds),
            Operation::Load => self.load_time.observe(seconds),
            Operation::Pipeline => self.pipeline_duration.observe(seconds),
        }
    }
}
