//! The converter controller: wires the currency selectors, the conversion
//! workflow and the chart workflow to a page.

pub mod chart;
pub mod convert;
pub mod selectors;

use crate::chart::ChartRenderer;
use crate::core::config::DefaultsConfig;
use crate::core::currency::ExchangeRateProvider;
use crate::core::error::PageError;
use crate::core::page::Page;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

pub use chart::{ChartWorkflow, RateHistory};
pub use convert::{Conversion, ConversionWorkflow};
pub use selectors::{CHART_PAIR, CONVERTER_PAIR, FlagAssets, SelectorPair};

/// Idle -> Requesting -> Displaying | Failed -> Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Requesting,
    Displaying,
    Failed,
}

pub struct ConverterController {
    defaults: DefaultsConfig,
    flags: FlagAssets,
    conversion: ConversionWorkflow,
    chart: ChartWorkflow,
}

impl ConverterController {
    pub fn new(
        provider: Arc<dyn ExchangeRateProvider>,
        renderer: Box<dyn ChartRenderer>,
        defaults: DefaultsConfig,
        flags: FlagAssets,
    ) -> Self {
        ConverterController {
            defaults,
            flags,
            conversion: ConversionWorkflow::new(Arc::clone(&provider)),
            chart: ChartWorkflow::new(provider, renderer),
        }
    }

    /// Populates every selector pair present on the page and returns the
    /// pairs that were set up.
    pub fn initialize(&self, page: &mut dyn Page) -> Result<Vec<SelectorPair>, PageError> {
        let mut initialized = Vec::new();
        for pair in [CONVERTER_PAIR, CHART_PAIR] {
            if !pair.is_present(&*page) {
                debug!(from = pair.from, to = pair.to, "Selector pair not on page");
                continue;
            }
            selectors::populate_selects(page, &pair, &self.defaults, &self.flags)?;
            initialized.push(pair);
        }
        Ok(initialized)
    }

    pub async fn convert(&mut self, page: &mut dyn Page) -> Option<Conversion> {
        self.conversion.convert(page).await
    }

    /// Loads the chart for the year ending today (UTC).
    pub async fn load_chart(&mut self, page: &mut dyn Page) -> Option<RateHistory> {
        self.load_chart_until(page, Utc::now().date_naive()).await
    }

    pub async fn load_chart_until(
        &mut self,
        page: &mut dyn Page,
        today: NaiveDate,
    ) -> Option<RateHistory> {
        self.chart.load(page, today).await
    }

    pub fn has_chart(&self) -> bool {
        self.chart.has_chart()
    }
}
