pub mod analysis;
pub mod observation;

pub use analysis::{
    AnalysisReport, BasicStats, CityComparisons, CityStats, CityTrend, DateRange, OverallStats,
    SpreadStats, TemperatureStats, TrendDirection, WeatherConditions,
};
pub use observation::{Dataset, ObservationRecord};
