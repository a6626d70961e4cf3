pub mod chart;
pub mod convert;
pub mod currencies;
pub mod setup;
pub mod ui;

use crate::core::Currency;
use crate::core::page::{self, MemoryPage};
use anyhow::{Result, anyhow};

/// Applies selections given on the command line as if the user picked them,
/// so the paired flags follow.
fn select_currencies(
    page: &mut MemoryPage,
    (from_id, to_id): (&str, &str),
    from: Option<Currency>,
    to: Option<Currency>,
) -> Result<()> {
    if let Some(currency) = from {
        page::choose(page, from_id, currency.code())?;
    }
    if let Some(currency) = to {
        page::choose(page, to_id, currency.code())?;
    }
    Ok(())
}

/// Turns the alerts raised on the page into the command's error.
fn alert_error(page: &mut MemoryPage) -> anyhow::Error {
    let alerts = page.take_alerts();
    if alerts.is_empty() {
        anyhow!("Operation failed")
    } else {
        anyhow!(alerts.join("\n"))
    }
}
