//! Chart description handed to a renderer, and the renderer seam itself.

pub mod svg;

use crate::core::error::FxError;
use crate::core::page::CanvasContext;

pub use svg::SvgChartRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
}

/// Produces the tooltip text for one point from its label and value.
pub type TooltipLabel = fn(&str, f64) -> String;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub fill: bool,
    /// Bezier curve tension, 0 draws straight segments.
    pub tension: f64,
    pub point_radius: u32,
    pub point_hover_radius: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub responsive: bool,
    pub tooltip_label: TooltipLabel,
    pub y_begin_at_zero: bool,
}

#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartConfig {
    /// Tooltip text for every point of the first dataset.
    pub fn tooltips(&self) -> Vec<String> {
        let Some(dataset) = self.data.datasets.first() else {
            return Vec::new();
        };
        self.data
            .labels
            .iter()
            .zip(&dataset.data)
            .map(|(label, value)| (self.options.tooltip_label)(label, *value))
            .collect()
    }
}

/// A live chart drawn on a canvas.
pub trait ChartInstance: Send {
    fn canvas_id(&self) -> &str;

    /// Tears the chart down and releases whatever it drew.
    fn destroy(self: Box<Self>) -> Result<(), FxError>;
}

pub trait ChartRenderer: Send {
    fn create(
        &mut self,
        context: &CanvasContext,
        config: &ChartConfig,
    ) -> Result<Box<dyn ChartInstance>, FxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltips_pair_labels_with_values() {
        let config = ChartConfig {
            kind: ChartKind::Line,
            data: ChartData {
                labels: vec!["01/01/2024".to_string(), "02/01/2024".to_string()],
                datasets: vec![Dataset {
                    label: "USD to INR".to_string(),
                    data: vec![83.0, 83.5],
                    border_color: "#000000".to_string(),
                    fill: false,
                    tension: 0.0,
                    point_radius: 0,
                    point_hover_radius: 0,
                }],
            },
            options: ChartOptions {
                responsive: false,
                tooltip_label: |label, value| format!("{label}={value}"),
                y_begin_at_zero: true,
            },
        };
        assert_eq!(config.tooltips(), vec!["01/01/2024=83", "02/01/2024=83.5"]);
    }
}
