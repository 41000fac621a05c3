pub mod csv_writer;
pub mod json_writer;
pub mod loader;
pub mod sqlite_writer;

pub use csv_writer::{summarize_cities, CitySummaryRow, CsvWriter};
pub use json_writer::JsonWriter;
pub use loader::{CsvExport, MultiFormatLoader};
pub use sqlite_writer::SqliteWriter;
