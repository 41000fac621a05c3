use chrono::Local;

/// Default SQLite database filename inside the output directory.
pub const DATABASE_FILENAME: &str = "weather_data.db";

/// Shared run stamp, format `YYYYMMDD_HHMMSS`. All artifacts written by one
/// run carry the same stamp.
pub fn run_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub fn analysis_filename(stamp: &str) -> String {
    format!("weather_analysis_{stamp}.json")
}

pub fn records_filename(stamp: &str) -> String {
    format!("weather_data_{stamp}.json")
}

pub fn report_filename(stamp: &str) -> String {
    format!("weather_report_{stamp}.csv")
}

pub fn summary_filename(stamp: &str) -> String {
    format!("weather_summary_{stamp}.csv")
}

pub fn figure_filename(stem: &str, stamp: &str) -> String {
    format!("{stem}_{stamp}.png")
}
