use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chrono::NaiveDate;
use weather_reporter::analyzers::statistics;
use weather_reporter::models::{Dataset, ObservationRecord};

// Create test data for benchmarking
fn create_test_dataset(city_count: usize, days: usize) -> Dataset {
    let mut records = Vec::with_capacity(city_count * days);
    let base_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let conditions = ["Clear", "Clouds", "Rain", "Snow"];

    for city_id in 0..city_count {
        for day in 0..days {
            let date = base_date + chrono::Duration::days(day as i64);
            let base_temp = 10.0 + (city_id as f64) * 0.5 + ((day % 7) as f64) - 3.0;

            records.push(ObservationRecord {
                timestamp: date.and_hms_opt(12, 0, 0).unwrap(),
                date: Some(date),
                city: format!("City {city_id}"),
                temperature: base_temp,
                temp_min: Some(base_temp - 5.0),
                temp_max: Some(base_temp + 5.0),
                humidity: 50.0 + ((day % 11) as f64) * 3.0,
                wind_speed: 1.0 + ((day % 5) as f64),
                weather_condition: Some(conditions[(city_id + day) % conditions.len()].to_string()),
            });
        }
    }

    Dataset::new(records)
}

fn benchmark_basic_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("basic_stats");
    for size in [100, 1_000, 10_000] {
        let dataset = create_test_dataset(10, size / 10);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| statistics::basic_stats(black_box(dataset)))
        });
    }
    group.finish();
}

fn benchmark_compare_cities(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_cities");
    for size in [100, 1_000, 10_000] {
        let dataset = create_test_dataset(10, size / 10);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| statistics::compare_cities(black_box(dataset)))
        });
    }
    group.finish();
}

fn benchmark_temperature_trends(c: &mut Criterion) {
    let mut group = c.benchmark_group("temperature_trends");
    for size in [100, 1_000, 10_000] {
        let dataset = create_test_dataset(10, size / 10);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| statistics::temperature_trends(black_box(dataset)))
        });
    }
    group.finish();
}

fn benchmark_weather_conditions(c: &mut Criterion) {
    let mut group = c.benchmark_group("weather_conditions");
    for size in [100, 1_000, 10_000] {
        let dataset = create_test_dataset(10, size / 10);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| statistics::weather_conditions(black_box(dataset)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_basic_stats,
    benchmark_compare_cities,
    benchmark_temperature_trends,
    benchmark_weather_conditions
);
criterion_main!(benches);
