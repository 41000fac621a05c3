pub mod convert;
pub mod filename;

pub use convert::{celsius_to_fahrenheit, condition_icon, date_range, fahrenheit_to_celsius};
pub use filename::{run_timestamp, DATABASE_FILENAME};
