use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Combined analysis output, serialized once per run as indented JSON.
///
/// The four sections are independently computable projections of the same
/// dataset; none of them mutates after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub basic_stats: BasicStats,
    pub city_comparisons: CityComparisons,
    pub temperature_trends: BTreeMap<String, CityTrend>,
    pub weather_conditions: WeatherConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub overall: OverallStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub count: usize,
    pub date_range: DateRange,
    pub temperature: TemperatureStats,
    pub humidity: SpreadStats,
    pub wind_speed: SpreadStats,
}

/// ISO-8601 bounds of the observation timestamps, `None` for an empty
/// dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityComparisons {
    pub cities: BTreeMap<String, CityStats>,
    /// City with the highest mean temperature; lexicographically first city
    /// wins among exact ties.
    pub warmest_city: Option<String>,
    /// City with the lowest mean temperature; same tie-break as above.
    pub coldest_city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityStats {
    pub temperature: SpreadStats,
    pub mean_humidity: f64,
    pub mean_wind_speed: f64,
}

/// Day-over-day temperature movement for one city. Only cities with at
/// least two daily data points appear in the trend map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityTrend {
    pub avg_daily_change: f64,
    pub max_increase: f64,
    pub max_decrease: f64,
    pub overall_trend: TrendDirection,
}

/// Direction label for a city's temperature trend. A delta sum of exactly
/// zero resolves to `Cooling`; the rule is deliberately asymmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Warming,
    Cooling,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub overall_distribution: BTreeMap<String, u64>,
    pub most_common_by_city: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_direction_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TrendDirection::Warming).unwrap(),
            "\"warming\""
        );
        assert_eq!(
            serde_json::to_string(&TrendDirection::Cooling).unwrap(),
            "\"cooling\""
        );
    }

    #[test]
    fn test_report_has_four_top_level_sections() {
        let report = AnalysisReport {
            basic_stats: BasicStats {
                overall: OverallStats {
                    count: 0,
                    date_range: DateRange {
                        start: None,
                        end: None,
                    },
                    temperature: TemperatureStats {
                        min: 0.0,
                        max: 0.0,
                        mean: 0.0,
                        median: 0.0,
                    },
                    humidity: SpreadStats {
                        min: 0.0,
                        max: 0.0,
                        mean: 0.0,
                    },
                    wind_speed: SpreadStats {
                        min: 0.0,
                        max: 0.0,
                        mean: 0.0,
                    },
                },
            },
            city_comparisons: CityComparisons {
                cities: BTreeMap::new(),
                warmest_city: None,
                coldest_city: None,
            },
            temperature_trends: BTreeMap::new(),
            weather_conditions: WeatherConditions::default(),
        };

        let value = serde_json::to_value(&report).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec![
                "basic_stats",
                "city_comparisons",
                "temperature_trends",
                "weather_conditions"
            ]
        );
    }
}
