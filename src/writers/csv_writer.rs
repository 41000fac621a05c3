use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzers::utility::{max_value, mean, min_value, round2};
use crate::error::Result;
use crate::models::{Dataset, ObservationRecord};

/// Per-city summary row of the side-car summary CSV. Values are rounded to
/// two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySummaryRow {
    pub city: String,
    pub temperature_mean: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity_mean: f64,
    pub humidity_min: f64,
    pub humidity_max: f64,
    pub wind_speed_mean: f64,
    pub wind_speed_min: f64,
    pub wind_speed_max: f64,
}

/// Computes the per-city summary in lexicographic city order.
pub fn summarize_cities(dataset: &Dataset) -> Vec<CitySummaryRow> {
    dataset
        .by_city()
        .into_iter()
        .map(|(city, group)| {
            let temperatures: Vec<f64> = group.iter().map(|r| r.temperature).collect();
            let humidities: Vec<f64> = group.iter().map(|r| r.humidity).collect();
            let wind_speeds: Vec<f64> = group.iter().map(|r| r.wind_speed).collect();

            CitySummaryRow {
                city: city.to_string(),
                temperature_mean: round2(mean(&temperatures)),
                temperature_min: round2(min_value(&temperatures)),
                temperature_max: round2(max_value(&temperatures)),
                humidity_mean: round2(mean(&humidities)),
                humidity_min: round2(min_value(&humidities)),
                humidity_max: round2(max_value(&humidities)),
                wind_speed_mean: round2(mean(&wind_speeds)),
                wind_speed_min: round2(min_value(&wind_speeds)),
                wind_speed_max: round2(max_value(&wind_speeds)),
            }
        })
        .collect()
}

/// Writes the full record table, and optionally the per-city summary, as
/// CSV files with header rows.
#[derive(Debug, Default)]
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_records(&self, records: &[ObservationRecord], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_summary(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        for row in summarize_cities(dataset) {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
