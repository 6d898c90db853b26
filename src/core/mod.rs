//! Core converter logic, independent of any front end

pub mod amount;
pub mod config;
pub mod converter;
pub mod currency;
pub mod log;
pub mod rate;

// Re-export main types for cleaner imports
pub use converter::{ConversionOutcome, Converter, Snapshot};
pub use currency::CurrencyCode;
pub use rate::{ConversionRequest, Quote, RateProvider};
