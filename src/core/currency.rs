//! Currency table and exchange rate abstractions

use crate::core::error::FxError;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Inr,
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cny,
    Chf,
    Cad,
    Aud,
    Aed,
}

impl Currency {
    /// Every supported currency, in selector order.
    pub const ALL: [Currency; 10] = [
        Currency::Inr,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Cny,
        Currency::Chf,
        Currency::Cad,
        Currency::Aud,
        Currency::Aed,
    ];

    pub const DEFAULT_FROM: Currency = Currency::Inr;
    pub const DEFAULT_TO: Currency = Currency::Usd;

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cny => "CNY",
            Currency::Chf => "CHF",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Aed => "AED",
        }
    }

    /// Two letter region code used for the flag asset.
    pub fn region(&self) -> &'static str {
        match self {
            Currency::Inr => "in",
            Currency::Usd => "us",
            Currency::Eur => "eu",
            Currency::Gbp => "gb",
            Currency::Jpy => "jp",
            Currency::Cny => "cn",
            Currency::Chf => "ch",
            Currency::Cad => "ca",
            Currency::Aud => "au",
            Currency::Aed => "ae",
        }
    }

    /// English display name of the region.
    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::Inr => "India",
            Currency::Usd => "United States",
            Currency::Eur => "European Union",
            Currency::Gbp => "United Kingdom",
            Currency::Jpy => "Japan",
            Currency::Cny => "China",
            Currency::Chf => "Switzerland",
            Currency::Cad => "Canada",
            Currency::Aud => "Australia",
            Currency::Aed => "United Arab Emirates",
        }
    }

    /// Looks up a currency by its ISO code. Codes are case sensitive, as on the page.
    pub fn from_code(code: &str) -> Option<Currency> {
        Currency::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn flag_path(&self, flags_dir: &str) -> String {
        format!("{}/{}.png", flags_dir.trim_end_matches('/'), self.region())
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(&s.trim().to_uppercase())
            .ok_or_else(|| anyhow!("Unsupported currency: {}", s))
    }
}

/// Inclusive calendar date range used for the historical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// One calendar year ending on `today`. Starting from 29 February the
    /// start clamps to 28 February of the previous year, where a plain
    /// year rollover (as browsers' `setFullYear` does) would give 1 March.
    pub fn trailing_year(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_months(Months::new(12))
            .unwrap_or(NaiveDate::MIN);
        DateRange { start, end: today }
    }

    /// Path segment understood by the rates API, e.g. `2023-05-01..2024-05-01`.
    pub fn to_path_segment(&self) -> String {
        format!(
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Point-in-time conversion response. `rates` maps target code to the converted amount.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LatestRates {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    pub rates: HashMap<String, f64>,
}

/// Historical response. `rates` maps each date to the rates on that day.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RateSeries {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub rates: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn latest(&self, amount: f64, from: &str, to: &str) -> Result<LatestRates, FxError>;

    async fn series(&self, range: &DateRange, from: &str, to: &str)
    -> Result<RateSeries, FxError>;
}
