//! Renders line charts to SVG files with plotters.
//!
//! Each canvas maps to `<output_dir>/<canvas-id>.svg`. Destroying the chart
//! removes the file. Hover styling and tooltips have no static equivalent and
//! are left to the caller (see [`super::ChartConfig::tooltips`]).

use super::{ChartConfig, ChartInstance, ChartRenderer};
use crate::core::error::FxError;
use crate::core::page::CanvasContext;
use anyhow::Result;
use plotters::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const CURVE_STEPS: usize = 8;

pub struct SvgChartRenderer {
    output_dir: PathBuf,
    size: (u32, u32),
}

impl SvgChartRenderer {
    pub fn new<P: Into<PathBuf>>(output_dir: P, size: (u32, u32)) -> Self {
        SvgChartRenderer {
            output_dir: output_dir.into(),
            size,
        }
    }

    pub fn path_for(&self, canvas_id: &str) -> PathBuf {
        self.output_dir.join(format!("{canvas_id}.svg"))
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn create(
        &mut self,
        context: &CanvasContext,
        config: &ChartConfig,
    ) -> Result<Box<dyn ChartInstance>, FxError> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            FxError::Render(format!(
                "cannot create {}: {e}",
                self.output_dir.display()
            ))
        })?;

        let path = self.path_for(&context.canvas_id);
        draw_line_chart(&path, self.size, config).map_err(|e| FxError::Render(e.to_string()))?;
        debug!("Rendered chart to {}", path.display());

        Ok(Box::new(SvgChart {
            canvas_id: context.canvas_id.clone(),
            path,
        }))
    }
}

#[derive(Debug)]
pub struct SvgChart {
    canvas_id: String,
    path: PathBuf,
}

impl ChartInstance for SvgChart {
    fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    fn destroy(self: Box<Self>) -> Result<(), FxError> {
        debug!("Destroying chart at {}", self.path.display());
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FxError::Render(format!(
                "cannot remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

fn draw_line_chart(path: &Path, size: (u32, u32), config: &ChartConfig) -> Result<()> {
    let labels = &config.data.labels;
    let dataset = config
        .data
        .datasets
        .first()
        .ok_or_else(|| anyhow::anyhow!("chart has no dataset"))?;

    let points: Vec<(f64, f64)> = dataset
        .data
        .iter()
        .enumerate()
        .map(|(i, y)| (i as f64, *y))
        .collect();

    let x_max = (points.len().saturating_sub(1)).max(1) as f64;
    let (y_min, y_max) = y_bounds(&dataset.data, config.options.y_begin_at_zero);
    let color = parse_hex_color(&dataset.border_color).unwrap_or(BLUE);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&dataset.label, ("sans-serif", 28).into_font().color(&BLACK))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

    let x_label = |x: &f64| {
        let index = x.round();
        if index < 0.0 || (index - x).abs() > f64::EPSILON {
            return String::new();
        }
        labels.get(index as usize).cloned().unwrap_or_default()
    };
    let y_label = |y: &f64| format!("{y:.4}");

    chart
        .configure_mesh()
        .x_labels(labels.len().clamp(2, 12))
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let curve = smooth_curve(&points, dataset.tension, CURVE_STEPS);

    if dataset.fill {
        chart.draw_series(AreaSeries::new(
            curve.iter().copied(),
            y_min,
            color.mix(0.2),
        ))?;
    }

    chart
        .draw_series(LineSeries::new(curve.iter().copied(), color.stroke_width(2)))?
        .label(&dataset.label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

    if dataset.point_radius > 0 {
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), dataset.point_radius, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Vertical axis bounds with a little headroom so the line never sits on the frame.
fn y_bounds(data: &[f64], begin_at_zero: bool) -> (f64, f64) {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let pad = if max > min {
        (max - min) * 0.05
    } else {
        (max.abs() * 0.01).max(0.0001)
    };

    let lower = if begin_at_zero { min.min(0.0) } else { min - pad };
    (lower, max + pad)
}

/// Samples a cubic Bezier spline through `points`. Control points follow the
/// neighbouring points scaled by `tension`, computed on axes normalised to
/// their spans so the curve shape does not depend on the rate magnitude.
pub(crate) fn smooth_curve(points: &[(f64, f64)], tension: f64, steps: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 || tension <= 0.0 || steps == 0 {
        return points.to_vec();
    }

    let x_span = span(points.iter().map(|p| p.0));
    let y_span = span(points.iter().map(|p| p.1));
    let distance = |a: (f64, f64), b: (f64, f64)| {
        ((b.0 - a.0) / x_span).hypot((b.1 - a.1) / y_span)
    };

    // (incoming, outgoing) control point per input point
    let controls: Vec<((f64, f64), (f64, f64))> = (0..points.len())
        .map(|i| {
            let current = points[i];
            if i == 0 || i == points.len() - 1 {
                return (current, current);
            }
            let previous = points[i - 1];
            let next = points[i + 1];
            let d01 = distance(previous, current);
            let d12 = distance(current, next);
            let total = d01 + d12;
            if total == 0.0 {
                return (current, current);
            }
            let fa = tension * d01 / total;
            let fb = tension * d12 / total;
            let dx = next.0 - previous.0;
            let dy = next.1 - previous.1;
            (
                (current.0 - fa * dx, current.1 - fa * dy),
                (current.0 + fb * dx, current.1 + fb * dy),
            )
        })
        .collect();

    let mut curve = Vec::with_capacity((points.len() - 1) * steps + 1);
    curve.push(points[0]);
    for i in 0..points.len() - 1 {
        let p0 = points[i];
        let c0 = controls[i].1;
        let c1 = controls[i + 1].0;
        let p1 = points[i + 1];
        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            let u = 1.0 - t;
            let b0 = u * u * u;
            let b1 = 3.0 * u * u * t;
            let b2 = 3.0 * u * t * t;
            let b3 = t * t * t;
            curve.push((
                b0 * p0.0 + b1 * c0.0 + b2 * c1.0 + b3 * p1.0,
                b0 * p0.1 + b1 * c0.1 + b2 * c1.1 + b3 * p1.1,
            ));
        }
    }
    curve
}

fn span(values: impl Iterator<Item = f64>) -> f64 {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if hi > lo { hi - lo } else { 1.0 }
}

fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
