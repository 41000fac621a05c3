use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::error::Result;
use crate::models::ObservationRecord;

/// Serializes the full ordered record list as indented JSON.
#[derive(Debug, Default)]
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_records(&self, records: &[ObservationRecord], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = BufWriter::new(fs::File::create(path)?);
        serde_json::to_writer_pretty(file, records)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(city: &str) -> ObservationRecord {
        ObservationRecord {
            timestamp: NaiveDate::from_ymd_opt(2023, 7, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            date: NaiveDate::from_ymd_opt(2023, 7, 15),
            city: city.to_string(),
            temperature: 18.5,
            temp_min: Some(15.0),
            temp_max: Some(21.0),
            humidity: 65.0,
            wind_speed: 4.2,
            weather_condition: Some("Clouds".to_string()),
        }
    }

    #[test]
    fn test_records_round_trip_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather_data.json");
        let records = vec![record("London"), record("Paris")];

        JsonWriter::new().write_records(&records, &path).unwrap();

        let parsed: Vec<ObservationRecord> =
            serde_json::from_reader(fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_empty_record_list_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather_data.json");

        JsonWriter::new().write_records(&[], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "[]");
    }
}
