// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Renders the latency comparison: a time series chart of the per-second
//! mean latency with a one standard deviation band for each platform,
//! above the summary table.

mod series;
mod table;

pub use self::series::{Point, TimeSeries};

use crate::config::Phases;
use crate::{Config, Dataset, Error, Result, Summary};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Family used for all text, registered from the embedded DejaVu Sans
/// Mono face so rendering does not depend on fonts installed on the host.
const DEJAVU_SANS_MONO: &str = "DejaVu Sans Mono";

/// first legend entry, heading the platform entries
const LEGEND_TITLE: &str = "Platform";

const GREY: RGBColor = RGBColor(0x80, 0x80, 0x80);

/// number of dash segments in a phase marker
const DASHES: usize = 40;

fn render_error<E: Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

fn register_font() -> Result<()> {
    let font: &'static [u8] = dejavu::sans_mono::regular();
    plotters::style::register_font(DEJAVU_SANS_MONO, FontStyle::Normal, font)
        .map_err(|_| Error::Render("failed to load embedded font".to_string()))
}

/// Chart title, eg: `Latency Over Time - /api/upload (100 VUs, 5 Run Avg)
/// - Test Environment: windows-server`
pub fn title(config: &Config, runs: usize) -> String {
    format!(
        "Latency Over Time - /api/{} ({} VUs, {} Run Avg) - Test Environment: {}",
        config.endpoint(),
        config.vus(),
        runs,
        config.platform_folder()
    )
}

/// Render the chart and table to `config.output_path()`. The output
/// directory must already exist.
pub fn render(config: &Config, dataset: &Dataset, summary: &Summary) -> Result<PathBuf> {
    let path = config.output_path();
    check_output_dir(&path)?;
    register_font()?;

    let series = TimeSeries::from_samples(dataset.latency(), config.plot().bin());
    let size = config.plot().size();

    {
        let root = BitMapBackend::new(&path, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let split = (size.1 as f64 * config.plot().chart_share()) as i32;
        let (upper, lower) = root.split_vertically(split);

        draw_chart(&upper, &title(config, dataset.max_runs()), &series, config.phases())?;
        table::draw(&lower, summary)?;

        root.present().map_err(render_error)?;
    }

    info!("saved chart to {}", path.display());
    Ok(path)
}

fn check_output_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            Err(Error::OutputPath(dir.to_path_buf()))
        }
        _ => Ok(()),
    }
}

/// Axis ranges covering every band and phase marker.
fn ranges(series: &[TimeSeries], phases: &Phases) -> ((f64, f64), (f64, f64)) {
    let x_max = series
        .iter()
        .filter_map(|s| s.max_elapsed())
        .fold(phases.extent(), f64::max);

    let points = series.iter().flat_map(|s| s.points.iter());
    let (y_min, y_max) = points.fold((0.0_f64, 0.0_f64), |(lo, hi), p| {
        (lo.min(p.lower()), hi.max(p.upper()))
    });
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

    ((0.0, x_max.max(1.0)), (y_min, y_max))
}

fn draw_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    series: &[TimeSeries],
    phases: &Phases,
) -> Result<()> {
    let ((x_min, x_max), (y_min, y_max)) = ranges(series, phases);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (DEJAVU_SANS_MONO, 20))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc("Elapsed Time (s)")
        .y_desc("Latency (ms)")
        .label_style((DEJAVU_SANS_MONO, 14))
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
        .map_err(render_error)?
        .label(LEGEND_TITLE)
        .legend(|(x, y)| EmptyElement::<_, DB>::at((x, y)));

    for s in series {
        let colour = s.platform.colour();

        let mut band: Vec<(f64, f64)> = s.points.iter().map(|p| (p.elapsed, p.upper())).collect();
        band.extend(s.points.iter().rev().map(|p| (p.elapsed, p.lower())));
        chart
            .draw_series(std::iter::once(Polygon::new(band, colour.mix(0.2).filled())))
            .map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(
                s.points.iter().map(|p| (p.elapsed, p.mean)),
                colour.stroke_width(2),
            ))
            .map_err(render_error)?
            .label(s.platform.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2)));
    }

    // dashed markers between load phases
    let dash = (y_max - y_min) / (2 * DASHES) as f64;
    for &x in phases.boundaries() {
        chart
            .draw_series((0..DASHES).map(|i| {
                let y = y_min + (2 * i) as f64 * dash;
                PathElement::new(vec![(x, y), (x, y + dash)], GREY.stroke_width(1))
            }))
            .map_err(render_error)?;
    }

    let y_label = y_max * phases.label_height();
    let style = (DEJAVU_SANS_MONO, 14)
        .into_font()
        .color(&GREY)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(
            phases
                .labels()
                .iter()
                .map(|l| Text::new(l.text().to_string(), (l.at(), y_label), style.clone())),
        )
        .map_err(render_error)?;

    chart
        .configure_series_labels()
        .label_font((DEJAVU_SANS_MONO, 14))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(render_error)?;

    Ok(())
}
