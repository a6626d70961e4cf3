//! Historical rate chart workflow.

use super::WorkflowState;
use crate::chart::{
    ChartConfig, ChartData, ChartInstance, ChartKind, ChartOptions, ChartRenderer, Dataset,
};
use crate::core::currency::{DateRange, ExchangeRateProvider, RateSeries};
use crate::core::error::FxError;
use crate::core::page::{self, CanvasContext, Page};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

pub const CHART_FAILED_ALERT: &str = "Failed to load chart data.";
pub const LINE_COLOR: &str = "#3a8fd0";

/// Daily rates of one currency pair, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RateHistory {
    pub from: String,
    pub to: String,
    pub range: DateRange,
    pub labels: Vec<String>,
    pub rates: Vec<f64>,
}

impl RateHistory {
    /// Builds the history from an API response. Every date must carry a rate
    /// for `to`.
    pub fn from_series(
        series: &RateSeries,
        from: &str,
        to: &str,
        range: DateRange,
    ) -> Result<Self, FxError> {
        if series.rates.is_empty() {
            return Err(FxError::EmptySeries {
                start: range.start.to_string(),
                end: range.end.to_string(),
            });
        }

        let (labels, rates) = series
            .rates
            .iter()
            .map(|(date, rates)| {
                rates
                    .get(to)
                    .map(|rate| (date_label(*date), *rate))
                    .ok_or_else(|| FxError::MissingRate {
                        currency: to.to_string(),
                        date: Some(date.to_string()),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unzip();

        Ok(RateHistory {
            from: from.to_string(),
            to: to.to_string(),
            range,
            labels,
            rates,
        })
    }

    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig {
            kind: ChartKind::Line,
            data: ChartData {
                labels: self.labels.clone(),
                datasets: vec![Dataset {
                    label: format!("{} to {}", self.from, self.to),
                    data: self.rates.clone(),
                    border_color: LINE_COLOR.to_string(),
                    fill: true,
                    tension: 0.3,
                    point_radius: 3,
                    point_hover_radius: 6,
                }],
            },
            options: ChartOptions {
                responsive: true,
                tooltip_label,
                y_begin_at_zero: false,
            },
        }
    }
}

/// `DD/MM/YYYY`
pub fn date_label(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn tooltip_label(label: &str, rate: f64) -> String {
    format!("Date: {label} | Rate: {rate:.4}")
}

/// Loads the trailing-year chart and owns the one live chart instance.
pub struct ChartWorkflow {
    provider: Arc<dyn ExchangeRateProvider>,
    renderer: Box<dyn ChartRenderer>,
    chart: Option<Box<dyn ChartInstance>>,
    state: WorkflowState,
}

impl ChartWorkflow {
    pub fn new(provider: Arc<dyn ExchangeRateProvider>, renderer: Box<dyn ChartRenderer>) -> Self {
        ChartWorkflow {
            provider,
            renderer,
            chart: None,
            state: WorkflowState::Idle,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn has_chart(&self) -> bool {
        self.chart.is_some()
    }

    /// Fetches one year of rates ending `today` and redraws the chart. Any
    /// failure raises exactly one alert and keeps the previous chart.
    pub async fn load(&mut self, page: &mut dyn Page, today: NaiveDate) -> Option<RateHistory> {
        let result = match self.try_load(page, today).await {
            Ok(history) => {
                self.transition(WorkflowState::Displaying);
                Some(history)
            }
            Err(e) => {
                warn!(error = %e, "Chart load failed");
                self.transition(WorkflowState::Failed);
                page.alert(CHART_FAILED_ALERT);
                None
            }
        };
        self.transition(WorkflowState::Idle);
        result
    }

    async fn try_load(
        &mut self,
        page: &mut dyn Page,
        today: NaiveDate,
    ) -> Result<RateHistory, FxError> {
        let from = page.value(page::FROM_CHART)?;
        let to = page.value(page::TO_CHART)?;
        let context = page.context(page::RATE_CHART)?;
        let range = DateRange::trailing_year(today);

        self.transition(WorkflowState::Requesting);
        let series = self.provider.series(&range, &from, &to).await?;
        let history = RateHistory::from_series(&series, &from, &to, range)?;
        debug!(points = history.rates.len(), "Loaded rate history");

        self.replace_chart(&context, &history.chart_config())?;
        Ok(history)
    }

    /// Destroys the current chart, then draws the new one.
    fn replace_chart(
        &mut self,
        context: &CanvasContext,
        config: &ChartConfig,
    ) -> Result<(), FxError> {
        if let Some(previous) = self.chart.take() {
            debug!(canvas = previous.canvas_id(), "Destroying previous chart");
            if let Err(e) = previous.destroy() {
                warn!(error = %e, "Failed to destroy previous chart");
            }
        }
        let chart = self.renderer.create(context, config)?;
        debug!(canvas = chart.canvas_id(), "Created chart");
        self.chart = Some(chart);
        Ok(())
    }

    fn transition(&mut self, next: WorkflowState) {
        debug!(from = ?self.state, to = ?next, "Chart state");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::{MockProvider, RecordingRenderer};
    use crate::core::page::{MemoryPage, SelectOption};

    const SERIES: &str = r#"{
        "base": "USD",
        "rates": {
            "2024-03-02": {"INR": 82.91},
            "2024-03-01": {"INR": 82.9},
            "2024-03-04": {"INR": 82.87654}
        }
    }"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn chart_page(from: &str, to: &str) -> MemoryPage {
        let mut page = MemoryPage::new();
        page.add_chart_elements();
        for code in [from, to] {
            page.add_option(page::FROM_CHART, SelectOption::new(code, code))
                .unwrap();
            page.add_option(page::TO_CHART, SelectOption::new(code, code))
                .unwrap();
        }
        page.set_value(page::FROM_CHART, from).unwrap();
        page.set_value(page::TO_CHART, to).unwrap();
        page
    }

    #[test]
    fn test_history_is_ordered_and_labelled() {
        let series: RateSeries = serde_json::from_str(SERIES).unwrap();
        let range = DateRange::trailing_year(today());
        let history = RateHistory::from_series(&series, "USD", "INR", range).unwrap();

        assert_eq!(history.labels, vec!["01/03/2024", "02/03/2024", "04/03/2024"]);
        assert_eq!(history.rates, vec![82.9, 82.91, 82.87654]);
    }

    #[test]
    fn test_history_requires_every_rate() {
        let series: RateSeries = serde_json::from_str(
            r#"{"rates": {"2024-03-01": {"INR": 82.9}, "2024-03-02": {"EUR": 0.92}}}"#,
        )
        .unwrap();
        let range = DateRange::trailing_year(today());
        let result = RateHistory::from_series(&series, "USD", "INR", range);
        assert!(matches!(
            result,
            Err(FxError::MissingRate { date: Some(ref d), .. }) if d == "2024-03-02"
        ));

        let empty: RateSeries = serde_json::from_str(r#"{"rates": {}}"#).unwrap();
        let result = RateHistory::from_series(&empty, "USD", "INR", range);
        assert!(matches!(result, Err(FxError::EmptySeries { .. })));
    }

    #[test]
    fn test_chart_config() {
        let series: RateSeries = serde_json::from_str(SERIES).unwrap();
        let range = DateRange::trailing_year(today());
        let config = RateHistory::from_series(&series, "USD", "INR", range)
            .unwrap()
            .chart_config();

        assert_eq!(config.kind, ChartKind::Line);
        assert_eq!(config.data.datasets.len(), 1);
        let dataset = &config.data.datasets[0];
        assert_eq!(dataset.label, "USD to INR");
        assert_eq!(dataset.border_color, "#3a8fd0");
        assert!(dataset.fill);
        assert_eq!(dataset.tension, 0.3);
        assert_eq!((dataset.point_radius, dataset.point_hover_radius), (3, 6));
        assert!(!config.options.y_begin_at_zero);
        assert_eq!(
            config.tooltips()[2],
            "Date: 04/03/2024 | Rate: 82.8765"
        );
    }

    #[tokio::test]
    async fn test_requests_trailing_year() {
        let provider = Arc::new(MockProvider::with_series(SERIES));
        let (renderer, _) = RecordingRenderer::new();
        let mut workflow = ChartWorkflow::new(provider.clone(), Box::new(renderer));

        for (from, to) in [("USD", "INR"), ("EUR", "INR")] {
            let mut page = chart_page(from, to);
            workflow.load(&mut page, today()).await.unwrap();
        }

        let calls = provider.series_calls();
        assert_eq!(calls.len(), 2);
        for (range, _, _) in &calls {
            assert_eq!(range.to_path_segment(), "2023-03-04..2024-03-04");
        }
        assert_eq!(calls[1].1, "EUR");
    }

    #[tokio::test]
    async fn test_second_load_destroys_first_chart() {
        let provider = Arc::new(MockProvider::with_series(SERIES));
        let (renderer, events) = RecordingRenderer::new();
        let mut workflow = ChartWorkflow::new(provider, Box::new(renderer));
        let mut page = chart_page("USD", "INR");

        workflow.load(&mut page, today()).await.unwrap();
        workflow.load(&mut page, today()).await.unwrap();

        assert_eq!(
            events.lock().unwrap().clone(),
            vec!["create 1", "destroy 1", "create 2"]
        );
        assert!(workflow.has_chart());
        assert!(page.alerts().is_empty());
        assert_eq!(workflow.state(), WorkflowState::Idle);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_chart() {
        let provider = Arc::new(MockProvider::with_series(SERIES));
        let (renderer, events) = RecordingRenderer::new();
        let mut workflow = ChartWorkflow::new(provider.clone(), Box::new(renderer));
        let mut page = chart_page("USD", "INR");
        workflow.load(&mut page, today()).await.unwrap();

        provider.fail_requests();
        assert!(workflow.load(&mut page, today()).await.is_none());

        assert_eq!(events.lock().unwrap().clone(), vec!["create 1"]);
        assert!(workflow.has_chart());
        assert_eq!(page.alerts(), [CHART_FAILED_ALERT]);
    }

    #[tokio::test]
    async fn test_missing_canvas_fails_without_request() {
        let provider = Arc::new(MockProvider::with_series(SERIES));
        let (renderer, _) = RecordingRenderer::new();
        let mut workflow = ChartWorkflow::new(provider.clone(), Box::new(renderer));
        let mut page = MemoryPage::new();
        page.with_select(page::FROM_CHART).with_select(page::TO_CHART);

        assert!(workflow.load(&mut page, today()).await.is_none());
        assert!(provider.series_calls().is_empty());
        assert_eq!(page.alerts().len(), 1);
    }
}
