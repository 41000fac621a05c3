use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the processed observation table.
///
/// `city` and `temperature` are required for any statistic to be meaningful;
/// the optional fields silently disable the analyses that depend on them
/// (trend analysis needs `date`, condition analysis needs
/// `weather_condition`). A column that is absent from the input file leaves
/// the field `None` on every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: NaiveDateTime,

    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,

    pub city: String,

    pub temperature: f64,

    #[serde(default)]
    pub temp_min: Option<f64>,

    #[serde(default)]
    pub temp_max: Option<f64>,

    pub humidity: f64,

    pub wind_speed: f64,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub weather_condition: Option<String>,
}

/// Parses a timestamp in either ISO-8601 (`2023-07-15T12:00:00`) or
/// space-separated (`2023-07-15 12:00:00`) form, with optional fractional
/// seconds.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(value.trim()).map_err(serde::de::Error::custom)
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

/// Ordered collection of observation records loaded wholesale from exactly
/// one input file. Created per invocation and discarded after the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<ObservationRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ObservationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when at least one record carries a calendar date.
    pub fn has_dates(&self) -> bool {
        self.records.iter().any(|r| r.date.is_some())
    }

    /// True when at least one record carries a weather condition.
    pub fn has_conditions(&self) -> bool {
        self.records.iter().any(|r| r.weather_condition.is_some())
    }

    /// Partitions the records by city, in lexicographic city order.
    pub fn by_city(&self) -> BTreeMap<&str, Vec<&ObservationRecord>> {
        let mut groups: BTreeMap<&str, Vec<&ObservationRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.city.as_str()).or_default().push(record);
        }
        groups
    }

    /// Distinct city names in lexicographic order.
    pub fn cities(&self) -> Vec<String> {
        self.by_city().keys().map(|c| c.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, temperature: f64) -> ObservationRecord {
        ObservationRecord {
            timestamp: NaiveDateTime::parse_from_str("2023-07-15T12:00:00", "%Y-%m-%dT%H:%M:%S")
                .unwrap(),
            date: None,
            city: city.to_string(),
            temperature,
            temp_min: None,
            temp_max: None,
            humidity: 60.0,
            wind_speed: 3.0,
            weather_condition: None,
        }
    }

    #[test]
    fn test_parse_timestamp_accepts_both_separators() {
        let iso = parse_timestamp("2023-07-15T12:30:00").unwrap();
        let spaced = parse_timestamp("2023-07-15 12:30:00").unwrap();
        assert_eq!(iso, spaced);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("not-a-timestamp").is_err());
    }

    #[test]
    fn test_deserialize_record_from_csv_row() {
        let data = "timestamp,date,city,temperature,temp_min,temp_max,humidity,wind_speed,weather_condition\n\
                    2023-07-15 12:00:00,2023-07-15,London,18.5,15.0,21.0,65.0,4.2,Clouds\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let record: ObservationRecord = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(record.city, "London");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 7, 15));
        assert_eq!(record.temperature, 18.5);
        assert_eq!(record.weather_condition.as_deref(), Some("Clouds"));
    }

    #[test]
    fn test_empty_optional_cells_become_none() {
        let data = "timestamp,date,city,temperature,temp_min,temp_max,humidity,wind_speed,weather_condition\n\
                    2023-07-15 12:00:00,,London,18.5,,,65.0,4.2,\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let record: ObservationRecord = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(record.date, None);
        assert_eq!(record.temp_min, None);
        assert_eq!(record.temp_max, None);
        assert_eq!(record.weather_condition, None);
    }

    #[test]
    fn test_absent_optional_columns_default_to_none() {
        let data = "timestamp,city,temperature,humidity,wind_speed\n\
                    2023-07-15 12:00:00,London,18.5,65.0,4.2\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let record: ObservationRecord = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(record.date, None);
        assert_eq!(record.weather_condition, None);
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        let data = "timestamp,city,humidity,wind_speed\n2023-07-15 12:00:00,London,65.0,4.2\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let parsed: Result<ObservationRecord, _> = reader.deserialize().next().unwrap();
        assert!(parsed.is_err());
    }

    #[test]
    fn test_dataset_presence_probes() {
        let mut with_date = record("Paris", 21.0);
        with_date.date = NaiveDate::from_ymd_opt(2023, 7, 15);
        let mut with_condition = record("London", 18.0);
        with_condition.weather_condition = Some("Rain".to_string());

        let dataset = Dataset::new(vec![record("Oslo", 12.0), with_date, with_condition]);
        assert!(dataset.has_dates());
        assert!(dataset.has_conditions());

        let bare = Dataset::new(vec![record("Oslo", 12.0)]);
        assert!(!bare.has_dates());
        assert!(!bare.has_conditions());
    }

    #[test]
    fn test_by_city_partitions_in_lexicographic_order() {
        let dataset = Dataset::new(vec![
            record("Oslo", 12.0),
            record("London", 18.0),
            record("Oslo", 14.0),
        ]);

        let groups = dataset.by_city();
        let cities: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(cities, vec!["London", "Oslo"]);
        assert_eq!(groups["Oslo"].len(), 2);
    }
}
