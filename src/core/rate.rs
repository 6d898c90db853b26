//! Currency conversion abstractions

use super::currency::CurrencyCode;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A validated conversion: positive amount, distinct currencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub amount: Decimal,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

/// Converted amount as reported by the rate service.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub amount: f64,
    pub date: Option<NaiveDate>,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn convert(&self, request: &ConversionRequest) -> Result<Quote>;
}
