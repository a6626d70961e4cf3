//! Point-in-time conversion workflow.

use super::WorkflowState;
use crate::core::currency::ExchangeRateProvider;
use crate::core::error::FxError;
use crate::core::page::{self, Page};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

pub const INVALID_AMOUNT_ALERT: &str = "Please enter a valid positive number.";
pub const CONVERSION_FAILED_ALERT: &str = "Failed to fetch exchange rate. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub converted: f64,
}

impl Display for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} = {} {}",
            self.amount, self.from, self.converted, self.to
        )
    }
}

/// Reads the leading number of `raw`, ignoring whatever follows it, so
/// `"10 USD"` is 10. The number must be finite and strictly greater than zero.
pub fn parse_amount(raw: &str) -> Result<f64, FxError> {
    let input = raw.trim_start();
    let prefix = &input[..numeric_prefix_len(input)];
    match prefix.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(FxError::InvalidAmount(raw.to_string())),
    }
}

/// Length of the longest prefix shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix_len(input: &str) -> usize {
    let bytes = input.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let integer = digits_from(end);
    end += integer;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if integer > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if integer == 0 && fraction == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exponent = digits_from(exp_end);
        if exponent > 0 {
            end = exp_end + exponent;
        }
    }
    end
}

pub struct ConversionWorkflow {
    provider: Arc<dyn ExchangeRateProvider>,
    state: WorkflowState,
}

impl ConversionWorkflow {
    pub fn new(provider: Arc<dyn ExchangeRateProvider>) -> Self {
        ConversionWorkflow {
            provider,
            state: WorkflowState::Idle,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Converts the amount on the page and shows the result. Any failure
    /// raises exactly one alert and keeps the previous result.
    pub async fn convert(&mut self, page: &mut dyn Page) -> Option<Conversion> {
        let outcome = self.try_convert(page).await;
        let result = match outcome {
            Ok(conversion) => {
                self.transition(WorkflowState::Displaying);
                Some(conversion)
            }
            Err(e) => {
                warn!(error = %e, "Conversion failed");
                self.transition(WorkflowState::Failed);
                let message = if e.is_validation() {
                    INVALID_AMOUNT_ALERT
                } else {
                    CONVERSION_FAILED_ALERT
                };
                page.alert(message);
                None
            }
        };
        self.transition(WorkflowState::Idle);
        result
    }

    async fn try_convert(&mut self, page: &mut dyn Page) -> Result<Conversion, FxError> {
        let from = page.value(page::FROM)?;
        let to = page.value(page::TO)?;
        let amount = parse_amount(&page.value(page::AMOUNT)?)?;

        self.transition(WorkflowState::Requesting);
        let response = self.provider.latest(amount, &from, &to).await?;
        let converted = *response.rates.get(&to).ok_or_else(|| FxError::MissingRate {
            currency: to.clone(),
            date: response.date.clone(),
        })?;

        let conversion = Conversion {
            amount,
            from,
            to,
            converted,
        };
        page.set_text(page::RESULT, &conversion.to_string())?;
        Ok(conversion)
    }

    fn transition(&mut self, next: WorkflowState) {
        debug!(from = ?self.state, to = ?next, "Conversion state");
        self.state = next;
    }
}
