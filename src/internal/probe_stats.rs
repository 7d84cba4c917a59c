//! Measures probe lengths of the double-hashing table at increasing load factors and plots
//! them to `probe_lengths.png`.
//!
//! Set `RUST_LOG=debug` to also see the table's resize events.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::arithmetic_side_effects
)]

use std::error::Error;

use dhtable::{Table, TableConfig};
use plotters::{coord::Shift, prelude::*};
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Requested base capacity; the table gets the next prime number of slots
const BASE_CAPACITY: usize = 100_000;
/// Number of load factors measured, evenly spaced from 0.1 to 0.9
const NUM_LOAD_FACTORS: usize = 9;
/// Lookups per measurement for both hits and misses
const SAMPLES: usize = 10_000;
/// Where the chart is written
const OUTPUT: &str = "probe_lengths.png";

/// Probe statistics at one load factor
#[derive(Debug, Clone, Copy)]
struct Measurement {
    /// Achieved load factor
    load: f64,
    /// Mean probes of a successful lookup
    avg_hit: f64,
    /// Mean probes of an unsuccessful lookup
    avg_miss: f64,
    /// Longest successful lookup
    worst_hit: usize,
    /// Longest unsuccessful lookup
    worst_miss: usize,
}

/// Mean and maximum probe length over `keys`
fn probe_stats<K: AsRef<[u8]>>(table: &Table, keys: impl Iterator<Item = K>) -> (f64, usize) {
    let (total, worst, n) = keys.fold((0_usize, 0_usize, 0_usize), |(total, worst, n), key| {
        let probes = table.probe_len(&key);
        (total + probes, worst.max(probes), n + 1)
    });
    (total as f64 / n.max(1) as f64, worst)
}

/// Fills a fresh table to `load` with random keys and measures lookups
fn measure(load: f64, rng: &mut impl Rng) -> Measurement {
    // Grow as late as the policy allows so the table holds the target load.
    let config = TableConfig::new()
        .with_base_capacity(BASE_CAPACITY)
        .with_grow_threshold(95)
        .with_shrink_threshold(0);
    let mut table = Table::with_config(config);
    let target = (table.capacity() as f64 * load) as usize;

    let mut keys = Vec::with_capacity(target);
    while table.len() < target {
        let key = format!("{:016x}", rng.random::<u64>());
        if table.insert(key.as_str(), "v").is_none() {
            keys.push(key);
        }
    }

    let step = (keys.len() / SAMPLES).max(1);
    let (avg_hit, worst_hit) = probe_stats(&table, keys.iter().step_by(step));

    let misses: Vec<String> =
        (0..SAMPLES).map(|_| format!("miss-{:016x}", rng.random::<u64>())).collect();
    let (avg_miss, worst_miss) = probe_stats(&table, misses.iter());

    Measurement { load: table.load_factor(), avg_hit, avg_miss, worst_hit, worst_miss }
}

/// Draws one chart of `series` (name, color, points) into `area`
fn draw_chart(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    caption: &str,
    y_desc: &str,
    series: &[(&str, RGBColor, Vec<(f64, f64)>)],
) -> Result<(), Box<dyn Error>> {
    let max_y = series
        .iter()
        .flat_map(|(_, _, points)| points.iter().map(|&(_, y)| y))
        .fold(1.0, f64::max) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    for (name, color, points) in series {
        let style = ShapeStyle::from(color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), style))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        chart.draw_series(points.iter().map(|&point| Circle::new(point, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

/// Sweeps the load factors, prints the measured probe lengths and writes the chart.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut rng = rand::rng();
    let loads: Vec<f64> = (0..NUM_LOAD_FACTORS)
        .map(|i| 0.1 + 0.8 * i as f64 / (NUM_LOAD_FACTORS - 1) as f64)
        .collect();

    let mut results = Vec::with_capacity(loads.len());
    for load in loads {
        let m = measure(load, &mut rng);
        info!(target_load = load, load = m.load, "measured");
        println!(
            "load {:.2}: hit avg {:.2} worst {}, miss avg {:.2} worst {}",
            m.load, m.avg_hit, m.worst_hit, m.avg_miss, m.worst_miss
        );
        results.push(m);
    }

    let red = RGBColor(220, 50, 50);
    let blue = RGBColor(50, 90, 220);
    let points = |f: fn(&Measurement) -> f64| -> Vec<(f64, f64)> {
        results.iter().map(|m| (m.load, f(m))).collect()
    };

    let root = BitMapBackend::new(OUTPUT, (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(450);

    draw_chart(
        &upper,
        "Average Probe Length",
        "Probes",
        &[
            ("Successful lookup", red, points(|m| m.avg_hit)),
            ("Unsuccessful lookup", blue, points(|m| m.avg_miss)),
        ],
    )?;
    draw_chart(
        &lower,
        "Worst-Case Probe Length",
        "Probes",
        &[
            ("Successful lookup", red, points(|m| m.worst_hit as f64)),
            ("Unsuccessful lookup", blue, points(|m| m.worst_miss as f64)),
        ],
    )?;
    root.present()?;

    info!(path = OUTPUT, "wrote chart");
    Ok(())
}
