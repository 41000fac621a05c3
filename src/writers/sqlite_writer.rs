use std::fs;
use std::path::Path;

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::ObservationRecord;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Writes the full record table into a SQLite database.
///
/// The target table is dropped and recreated on every write (replace
/// semantics, never append), and the two secondary indices are created
/// idempotently afterwards.
#[derive(Debug)]
pub struct SqliteWriter {
    table: String,
}

impl Default for SqliteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqliteWriter {
    pub fn new() -> Self {
        Self {
            table: "weather_data".to_string(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn write_records(&self, records: &[ObservationRecord], db_path: &Path) -> Result<()> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(db_path)?;
        let tx = conn.transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                 timestamp         TEXT NOT NULL,
                 date              TEXT,
                 city              TEXT NOT NULL,
                 temperature       REAL NOT NULL,
                 temp_min          REAL,
                 temp_max          REAL,
                 humidity          REAL NOT NULL,
                 wind_speed        REAL NOT NULL,
                 weather_condition TEXT
             );",
            table = self.table
        ))?;

        {
            let mut statement = tx.prepare(&format!(
                "INSERT INTO {} (timestamp, date, city, temperature, temp_min, temp_max, \
                 humidity, wind_speed, weather_condition) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                self.table
            ))?;
            for record in records {
                statement.execute(params![
                    record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    record.date.map(|d| d.to_string()),
                    record.city,
                    record.temperature,
                    record.temp_min,
                    record.temp_max,
                    record.humidity,
                    record.wind_speed,
                    record.weather_condition,
                ])?;
            }
        }

        tx.execute_batch(&format!(
            "CREATE INDEX IF NOT EXISTS idx_city ON {table} (city);
             CREATE INDEX IF NOT EXISTS idx_date ON {table} (date);",
            table = self.table
        ))?;

        tx.commit()?;
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
            temp_min: None,
            temp_max: None,
            humidity: 65.0,
            wind_speed: 4.2,
            weather_condition: None,
        }
    }

    fn row_count(db_path: &Path) -> i64 {
        let conn = Connection::open(db_path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM weather_data", [], |row| row.get(0))
            .unwrap()
    }

    fn index_count(db_path: &Path) -> i64 {
        let conn = Connection::open(db_path).unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'index' AND name IN ('idx_city', 'idx_date')",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_write_creates_table_and_indices() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("weather_data.db");

        SqliteWriter::new()
            .write_records(&[record("London"), record("Paris")], &db_path)
            .unwrap();

        assert_eq!(row_count(&db_path), 2);
        assert_eq!(index_count(&db_path), 2);
    }

    #[test]
    fn test_rewrite_replaces_rows_not_appends() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("weather_data.db");
        let writer = SqliteWriter::new();

        writer
            .write_records(
                &[record("London"), record("Paris"), record("Oslo")],
                &db_path,
            )
            .unwrap();
        assert_eq!(row_count(&db_path), 3);

        // Second run must leave only the second run's rows, and index
        // re-creation must be a no-op.
        writer
            .write_records(&[record("London"), record("Paris")], &db_path)
            .unwrap();
        assert_eq!(row_count(&db_path), 2);
        assert_eq!(index_count(&db_path), 2);
    }

    #[test]
    fn test_optional_fields_stored_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("weather_data.db");
        let mut r = record("London");
        r.date = None;

        SqliteWriter::new().write_records(&[r], &db_path).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let nulls: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM weather_data \
                 WHERE date IS NULL AND temp_min IS NULL AND weather_condition IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(nulls, 1);
    }
}
