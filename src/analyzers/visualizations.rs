use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::analyzers::statistics::daily_city_temperatures;
use crate::analyzers::utility::linear_fit;
use crate::error::Result;
use crate::models::Dataset;
use crate::utils::filename::figure_filename;

const FIGURE_SIZE: (u32, u32) = (1024, 768);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 30);

// Every chart routine returns `Ok(None)` when its required columns are
// absent: the chart is skipped, no file is written and no error is raised.

fn series_color(index: usize) -> RGBAColor {
    Palette99::pick(index).to_rgba()
}

fn padded(min: f64, max: f64) -> (f64, f64) {
    let pad = ((max - min) * 0.1).max(1.0);
    (min - pad, max + pad)
}

/// Bar chart of mean temperature per city, sorted descending by value.
pub fn city_temperature_comparison(
    dataset: &Dataset,
    figures_dir: &Path,
    stamp: &str,
) -> Result<Option<PathBuf>> {
    if dataset.is_empty() {
        return Ok(None);
    }

    let mut means: Vec<(String, f64)> = dataset
        .by_city()
        .into_iter()
        .map(|(city, group)| {
            let sum: f64 = group.iter().map(|r| r.temperature).sum();
            (city.to_string(), sum / group.len() as f64)
        })
        .collect();
    means.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let path = figures_dir.join(figure_filename("city_temperature_comparison", stamp));
    let root = BitMapBackend::new(&path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let lowest = means.iter().map(|m| m.1).fold(0.0f64, f64::min);
    let highest = means.iter().map(|m| m.1).fold(0.0f64, f64::max);
    let (y_lo, y_hi) = padded(lowest, highest);

    let mut chart = ChartBuilder::on(&root)
        .caption("Average Temperature by City", CAPTION_FONT)
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..means.len() as i32, y_lo..y_hi)?;

    let labels: Vec<String> = means.iter().map(|m| m.0.clone()).collect();
    chart
        .configure_mesh()
        .x_desc("City")
        .y_desc("Temperature (°C)")
        .x_labels(means.len())
        .x_label_formatter(&|index| {
            labels
                .get(*index as usize)
                .cloned()
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(means.iter().enumerate().map(|(index, (_, mean))| {
        let (y0, y1) = if *mean >= 0.0 { (0.0, *mean) } else { (*mean, 0.0) };
        Rectangle::new(
            [(index as i32, y0), (index as i32 + 1, y1)],
            BLUE.mix(0.6).filled(),
        )
    }))?;

    root.present()?;
    Ok(Some(path.clone()))
}

/// One line per city of daily mean temperature over date. Requires the
/// `date` column.
pub fn temperature_trends(
    dataset: &Dataset,
    figures_dir: &Path,
    stamp: &str,
) -> Result<Option<PathBuf>> {
    if !dataset.has_dates() {
        return Ok(None);
    }

    let daily = daily_city_temperatures(dataset);
    let mut dates = daily.values().flat_map(|days| days.keys().copied());
    let first = match dates.next() {
        Some(date) => date,
        None => return Ok(None),
    };
    let (min_date, max_date) = daily
        .values()
        .flat_map(|days| days.keys().copied())
        .fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    // A single-day span still needs a non-degenerate axis.
    let max_axis = if min_date == max_date {
        max_date.succ_opt().unwrap_or(max_date)
    } else {
        max_date
    };

    let means: Vec<f64> = daily
        .values()
        .flat_map(|days| days.values().map(|d| d.mean))
        .collect();
    let lowest = means.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (y_lo, y_hi) = padded(lowest, highest);

    let path = figures_dir.join(figure_filename("temperature_trends", stamp));
    let root = BitMapBackend::new(&path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Temperature Trends by City", CAPTION_FONT)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(min_date..max_axis, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Temperature (°C)")
        .draw()?;

    for (index, (city, days)) in daily.iter().enumerate() {
        let color = series_color(index);
        chart
            .draw_series(LineSeries::new(
                days.iter().map(|(date, day)| (*date, day.mean)),
                color.stroke_width(2),
            ))?
            .label(city.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(Some(path.clone()))
}

/// Pie chart of weather-condition frequency with percentage labels.
/// Requires the `weather_condition` column.
pub fn weather_condition_distribution(
    dataset: &Dataset,
    figures_dir: &Path,
    stamp: &str,
) -> Result<Option<PathBuf>> {
    if !dataset.has_conditions() {
        return Ok(None);
    }

    let distribution = crate::analyzers::statistics::weather_conditions(dataset).overall_distribution;
    let sizes: Vec<f64> = distribution.values().map(|count| *count as f64).collect();
    let labels: Vec<String> = distribution.keys().cloned().collect();
    let colors: Vec<RGBColor> = (0..sizes.len())
        .map(|index| {
            let (r, g, b) = Palette99::COLORS[index % Palette99::COLORS.len()];
            RGBColor(r, g, b)
        })
        .collect();

    let path = figures_dir.join(figure_filename("weather_condition_distribution", stamp));
    let root = BitMapBackend::new(&path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let titled = root.titled("Distribution of Weather Conditions", CAPTION_FONT)?;

    let center = (400, 410);
    let radius = 250.0;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 16).into_font().color(&BLACK));
    titled.draw(&pie)?;

    root.present()?;
    Ok(Some(path.clone()))
}

/// Scatter of temperature against humidity, one color per city, with a
/// pooled degree-1 least-squares fit line.
pub fn temperature_humidity_correlation(
    dataset: &Dataset,
    figures_dir: &Path,
    stamp: &str,
) -> Result<Option<PathBuf>> {
    if dataset.is_empty() {
        return Ok(None);
    }

    let temperatures: Vec<f64> = dataset.records().iter().map(|r| r.temperature).collect();
    let humidities: Vec<f64> = dataset.records().iter().map(|r| r.humidity).collect();

    let t_lo = temperatures.iter().copied().fold(f64::INFINITY, f64::min);
    let t_hi = temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let h_lo = humidities.iter().copied().fold(f64::INFINITY, f64::min);
    let h_hi = humidities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (x_lo, x_hi) = padded(t_lo, t_hi);
    let (y_lo, y_hi) = padded(h_lo, h_hi);

    let path = figures_dir.join(figure_filename("temperature_humidity_correlation", stamp));
    let root = BitMapBackend::new(&path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Temperature vs. Humidity", CAPTION_FONT)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Temperature (°C)")
        .y_desc("Humidity (%)")
        .draw()?;

    for (index, (city, group)) in dataset.by_city().into_iter().enumerate() {
        let color = series_color(index);
        chart
            .draw_series(
                group
                    .iter()
                    .map(|r| Circle::new((r.temperature, r.humidity), 4, color.mix(0.6).filled())),
            )?
            .label(city.to_string())
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    if let Some((slope, intercept)) = linear_fit(&temperatures, &humidities) {
        chart
            .draw_series(LineSeries::new(
                [t_lo, t_hi]
                    .iter()
                    .map(|x| (*x, slope * x + intercept)),
                RED.stroke_width(2),
            ))?
            .label("Trend Line")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(Some(path.clone()))
}

/// Box plot of wind speed distribution, grouped by city.
pub fn wind_speed_comparison(
    dataset: &Dataset,
    figures_dir: &Path,
    stamp: &str,
) -> Result<Option<PathBuf>> {
    if dataset.is_empty() {
        return Ok(None);
    }

    let groups = dataset.by_city();
    let cities: Vec<String> = groups.keys().map(|c| c.to_string()).collect();
    let quartiles: Vec<(String, Quartiles)> = groups
        .into_iter()
        .map(|(city, group)| {
            let winds: Vec<f64> = group.iter().map(|r| r.wind_speed).collect();
            (city.to_string(), Quartiles::new(&winds))
        })
        .collect();

    let winds: Vec<f64> = dataset.records().iter().map(|r| r.wind_speed).collect();
    let lowest = winds.iter().copied().fold(f64::INFINITY, f64::min) as f32;
    let highest = winds.iter().copied().fold(f64::NEG_INFINITY, f64::max) as f32;

    let path = figures_dir.join(figure_filename("wind_speed_comparison", stamp));
    let root = BitMapBackend::new(&path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Wind Speed Distribution by City", CAPTION_FONT)
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(cities[..].into_segmented(), (lowest - 1.0)..(highest + 1.0))?;

    chart
        .configure_mesh()
        .x_desc("City")
        .y_desc("Wind Speed (m/s)")
        .draw()?;

    chart.draw_series(quartiles.iter().map(|(city, quartile)| {
        Boxplot::new_vertical(SegmentValue::CenterOf(city), quartile).width(25)
    }))?;

    root.present()?;
    Ok(Some(path.clone()))
}
