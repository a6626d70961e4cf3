//! Selector population and flag synchronisation.

use crate::core::config::DefaultsConfig;
use crate::core::currency::Currency;
use crate::core::error::PageError;
use crate::core::page::{self, Page, SelectOption};
use std::sync::Arc;
use tracing::{debug, warn};

/// Ids of one pair of currency selectors and their flag images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorPair {
    pub from: &'static str,
    pub to: &'static str,
    pub from_flag: &'static str,
    pub to_flag: &'static str,
}

pub const CONVERTER_PAIR: SelectorPair = SelectorPair {
    from: page::FROM,
    to: page::TO,
    from_flag: page::FROM_FLAG,
    to_flag: page::TO_FLAG,
};

pub const CHART_PAIR: SelectorPair = SelectorPair {
    from: page::FROM_CHART,
    to: page::TO_CHART,
    from_flag: page::FROM_CHART_FLAG,
    to_flag: page::TO_CHART_FLAG,
};

impl SelectorPair {
    pub fn is_present(&self, page: &dyn Page) -> bool {
        page.has_element(self.from) && page.has_element(self.to)
    }
}

/// Where flag images live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagAssets {
    dir: String,
}

impl FlagAssets {
    pub fn new(dir: &str) -> Self {
        FlagAssets {
            dir: dir.to_string(),
        }
    }

    pub fn path_for(&self, code: &str) -> Option<String> {
        Currency::from_code(code).map(|c| c.flag_path(&self.dir))
    }
}

impl Default for FlagAssets {
    fn default() -> Self {
        Self::new("flags")
    }
}

/// Fills both selectors of `pair` with every currency, selects the defaults,
/// shows their flags and keeps each flag in sync with later changes.
pub fn populate_selects(
    page: &mut dyn Page,
    pair: &SelectorPair,
    defaults: &DefaultsConfig,
    flags: &FlagAssets,
) -> Result<(), PageError> {
    for currency in Currency::ALL {
        let name = currency.display_name();
        page.add_option(pair.from, SelectOption::new(name, currency.code()))?;
        page.add_option(pair.to, SelectOption::new(name, currency.code()))?;
    }

    page.set_value(pair.from, defaults.from.code())?;
    page.set_value(pair.to, defaults.to.code())?;
    update_flag(page, pair.from, pair.from_flag, flags)?;
    update_flag(page, pair.to, pair.to_flag, flags)?;

    page.add_change_listener(pair.from, flag_listener(pair.from, pair.from_flag, flags))?;
    page.add_change_listener(pair.to, flag_listener(pair.to, pair.to_flag, flags))?;

    debug!(from = pair.from, to = pair.to, "Populated selector pair");
    Ok(())
}

/// Points `image_id` at the flag of the currency selected in `select_id`.
/// An unknown currency code leaves the image as it is.
pub fn update_flag(
    page: &mut dyn Page,
    select_id: &str,
    image_id: &str,
    flags: &FlagAssets,
) -> Result<(), PageError> {
    let code = page.value(select_id)?;
    match flags.path_for(&code) {
        Some(path) => page.set_image_source(image_id, &path),
        None => {
            debug!(select_id, code, "No flag for currency");
            Ok(())
        }
    }
}

fn flag_listener(
    select_id: &'static str,
    image_id: &'static str,
    flags: &FlagAssets,
) -> page::ChangeListener {
    let flags = flags.clone();
    Arc::new(move |page: &mut dyn Page| {
        if let Err(e) = update_flag(page, select_id, image_id, &flags) {
            warn!(error = %e, select_id, "Failed to update flag");
        }
    })
}
