use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::analyzers::utility::{max_value, mean, median, min_value};
use crate::models::{
    BasicStats, CityComparisons, CityStats, CityTrend, DateRange, Dataset, OverallStats,
    SpreadStats, TemperatureStats, TrendDirection, WeatherConditions,
};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Record count, timestamp bounds and whole-dataset spreads of temperature,
/// humidity and wind speed.
pub fn basic_stats(dataset: &Dataset) -> BasicStats {
    let records = dataset.records();

    let temperatures: Vec<f64> = records.iter().map(|r| r.temperature).collect();
    let humidities: Vec<f64> = records.iter().map(|r| r.humidity).collect();
    let wind_speeds: Vec<f64> = records.iter().map(|r| r.wind_speed).collect();

    let start = records
        .iter()
        .map(|r| r.timestamp)
        .min()
        .map(|t| t.format(ISO_FORMAT).to_string());
    let end = records
        .iter()
        .map(|r| r.timestamp)
        .max()
        .map(|t| t.format(ISO_FORMAT).to_string());

    BasicStats {
        overall: OverallStats {
            count: records.len(),
            date_range: DateRange { start, end },
            temperature: TemperatureStats {
                min: min_value(&temperatures),
                max: max_value(&temperatures),
                mean: mean(&temperatures),
                median: median(&temperatures),
            },
            humidity: SpreadStats {
                min: min_value(&humidities),
                max: max_value(&humidities),
                mean: mean(&humidities),
            },
            wind_speed: SpreadStats {
                min: min_value(&wind_speeds),
                max: max_value(&wind_speeds),
                mean: mean(&wind_speeds),
            },
        },
    }
}

/// Per-city spreads plus the warmest/coldest superlatives over mean
/// temperature. Selection is strict, so the lexicographically first city
/// wins among exact ties.
pub fn compare_cities(dataset: &Dataset) -> CityComparisons {
    let mut cities: BTreeMap<String, CityStats> = BTreeMap::new();

    for (city, group) in dataset.by_city() {
        let temperatures: Vec<f64> = group.iter().map(|r| r.temperature).collect();
        let humidities: Vec<f64> = group.iter().map(|r| r.humidity).collect();
        let wind_speeds: Vec<f64> = group.iter().map(|r| r.wind_speed).collect();

        cities.insert(
            city.to_string(),
            CityStats {
                temperature: SpreadStats {
                    min: min_value(&temperatures),
                    max: max_value(&temperatures),
                    mean: mean(&temperatures),
                },
                mean_humidity: mean(&humidities),
                mean_wind_speed: mean(&wind_speeds),
            },
        );
    }

    let mut warmest_city: Option<String> = None;
    let mut coldest_city: Option<String> = None;
    let mut warmest_mean = f64::NEG_INFINITY;
    let mut coldest_mean = f64::INFINITY;
    for (city, stats) in &cities {
        if stats.temperature.mean > warmest_mean {
            warmest_mean = stats.temperature.mean;
            warmest_city = Some(city.clone());
        }
        if stats.temperature.mean < coldest_mean {
            coldest_mean = stats.temperature.mean;
            coldest_city = Some(city.clone());
        }
    }

    CityComparisons {
        cities,
        warmest_city,
        coldest_city,
    }
}

/// One `(date, city)` aggregation cell: mean observed temperature plus the
/// extremes of the recorded `temp_min`/`temp_max` columns for that day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTemperature {
    pub mean: f64,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
}

/// Groups records by `(city, date)`, dropping records without a date. The
/// inner maps are date-ascending, which downstream trend and chart code
/// relies on.
pub fn daily_city_temperatures(
    dataset: &Dataset,
) -> BTreeMap<String, BTreeMap<NaiveDate, DailyTemperature>> {
    let mut cells: BTreeMap<String, BTreeMap<NaiveDate, (Vec<f64>, Option<f64>, Option<f64>)>> =
        BTreeMap::new();

    for record in dataset.records() {
        let Some(date) = record.date else {
            continue;
        };
        let cell = cells
            .entry(record.city.clone())
            .or_default()
            .entry(date)
            .or_insert((Vec::new(), None, None));
        cell.0.push(record.temperature);
        if let Some(t) = record.temp_min {
            cell.1 = Some(cell.1.map_or(t, |current: f64| current.min(t)));
        }
        if let Some(t) = record.temp_max {
            cell.2 = Some(cell.2.map_or(t, |current: f64| current.max(t)));
        }
    }

    cells
        .into_iter()
        .map(|(city, days)| {
            let days = days
                .into_iter()
                .map(|(date, (temps, temp_min, temp_max))| {
                    (
                        date,
                        DailyTemperature {
                            mean: mean(&temps),
                            temp_min,
                            temp_max,
                        },
                    )
                })
                .collect();
            (city, days)
        })
        .collect()
}

/// Day-over-day temperature movement per city.
///
/// Cities with fewer than two daily points are omitted entirely. The trend
/// label is `warming` only for a strictly positive delta sum; a sum of
/// exactly zero is `cooling`.
pub fn temperature_trends(dataset: &Dataset) -> BTreeMap<String, CityTrend> {
    let mut trends = BTreeMap::new();

    for (city, daily) in daily_city_temperatures(dataset) {
        if daily.len() < 2 {
            continue;
        }
        let means: Vec<f64> = daily.values().map(|d| d.mean).collect();
        let deltas: Vec<f64> = means.windows(2).map(|pair| pair[1] - pair[0]).collect();
        let sum: f64 = deltas.iter().sum();

        trends.insert(
            city,
            CityTrend {
                avg_daily_change: sum / deltas.len() as f64,
                max_increase: max_value(&deltas),
                max_decrease: min_value(&deltas),
                overall_trend: if sum > 0.0 {
                    TrendDirection::Warming
                } else {
                    TrendDirection::Cooling
                },
            },
        );
    }

    trends
}

/// Overall condition frequencies and the single most frequent condition per
/// city. Strict-greater selection over lexicographically ordered counts, so
/// the lexicographically first condition wins among ties. Returns an empty
/// result when no record carries a condition.
pub fn weather_conditions(dataset: &Dataset) -> WeatherConditions {
    let mut overall: BTreeMap<String, u64> = BTreeMap::new();
    let mut per_city: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();

    for record in dataset.records() {
        let Some(condition) = &record.weather_condition else {
            continue;
        };
        *overall.entry(condition.clone()).or_default() += 1;
        *per_city
            .entry(record.city.clone())
            .or_default()
            .entry(condition.clone())
            .or_default() += 1;
    }

    let most_common_by_city = per_city
        .into_iter()
        .filter_map(|(city, counts)| {
            let mut best: Option<(String, u64)> = None;
            for (condition, count) in counts {
                if best.as_ref().map_or(true, |(_, c)| count > *c) {
                    best = Some((condition, count));
                }
            }
            best.map(|(condition, _)| (city, condition))
        })
        .collect();

    WeatherConditions {
        overall_distribution: overall,
        most_common_by_city,
    }
}
