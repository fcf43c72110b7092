//! Visualization of weighslide runs.
//!
//! Two backends, both behind the `visualization` feature: a plotters-based
//! PNG chart of the input series against the reduced output, and a
//! textplots-based terminal chart used as the interactive preview.

use std::path::Path;

use plotters::prelude::*;
use textplots::{Chart, Plot, Shape};

use crate::error::{Error, Result};
use crate::na::NA;
use crate::series::{NASeries, Series};

/// Longest window description included in the chart title.
const TITLE_LABEL_LIMIT: usize = 50;

const PLOT_WIDTH: u32 = 800;
const PLOT_HEIGHT: u32 = 600;

/// Render the input series and the reduced output as a two-line PNG chart.
///
/// The frame follows the original tool: x covers the positions, y spans
/// `min * 0.8 .. max * 1.2` over both series. Missing output values are
/// left out of the line.
pub fn plot_series_png<P: AsRef<Path>>(
    input: &Series<f64>,
    output: &NASeries<f64>,
    window_label: &str,
    path: P,
) -> Result<()> {
    if input.is_empty() {
        return Err(Error::EmptyData(
            "nothing to plot: input series is empty".to_string(),
        ));
    }

    let input_points: Vec<(f64, f64)> = input
        .values()
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();
    let output_points: Vec<(f64, f64)> = output
        .values()
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.value().map(|v| (i as f64, *v)))
        .collect();

    let mut min_value = input.min().unwrap_or(0.0);
    let mut max_value = input.max().unwrap_or(0.0);
    if let NA::Value(v) = output.min() {
        min_value = min_value.min(v);
    }
    if let NA::Value(v) = output.max() {
        max_value = max_value.max(v);
    }
    let mut y_min = min_value * 0.8;
    let mut y_max = max_value * 1.2;
    if y_max <= y_min {
        // plotters rejects an empty axis range
        y_min -= 1.0;
        y_max += 1.0;
    }
    let x_max = ((input.len() - 1) as f64).max(1.0);

    let label: String = window_label.chars().take(TITLE_LABEL_LIMIT).collect();
    let title = format!("weighslide output for window {}", label);

    let root =
        BitMapBackend::new(path.as_ref(), (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("position")
        .y_desc("value")
        .draw()?;

    chart
        .draw_series(LineSeries::new(input_points, &BLUE))?
        .label("original data")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    let output_label = output
        .name()
        .cloned()
        .unwrap_or_else(|| "output".to_string());
    chart
        .draw_series(LineSeries::new(output_points, &RED))?
        .label(output_label)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()
        .map_err(|e| Error::Visualization(format!("プロットを書き込めませんでした: {}", e)))?;

    Ok(())
}

/// Print a quick terminal chart of the input and the reduced output.
///
/// Used for the `show_figure` option; the original tool popped a GUI window
/// here, which has no place in a command-line run.
pub fn show_terminal_chart(input: &Series<f64>, output: &NASeries<f64>) {
    if input.is_empty() {
        return;
    }

    let input_points: Vec<(f32, f32)> = input
        .values()
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f32, *v as f32))
        .collect();
    let output_points: Vec<(f32, f32)> = output
        .values()
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.value().map(|v| (i as f32, *v as f32)))
        .collect();

    let x_max = (input.len().saturating_sub(1)).max(1) as f32;

    println!("original data:");
    Chart::new(160, 60, 0.0, x_max)
        .lineplot(&Shape::Lines(&input_points))
        .display();

    if !output_points.is_empty() {
        println!("reduced output:");
        Chart::new(160, 60, 0.0, x_max)
            .lineplot(&Shape::Lines(&output_points))
            .display();
    }
}
