//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod page;

// Re-export main types for cleaner imports
pub use currency::{Currency, DateRange, ExchangeRateProvider, LatestRates, RateSeries};
pub use error::{FxError, PageError};
pub use page::{MemoryPage, Page};
