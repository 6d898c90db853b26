use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::rate::{ConversionRequest, Quote, RateProvider};

/// Client for Frankfurter-compatible `latest` endpoints.
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    date: Option<NaiveDate>,
    rates: HashMap<String, serde_json::Value>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(
        name = "FrankfurterConvert",
        skip(self),
        fields(from = %request.from, to = %request.to)
    )]
    async fn convert(&self, request: &ConversionRequest) -> Result<Quote> {
        let pair = format!("{}{}", request.from, request.to);
        let amount = request.amount.to_string();
        let url = reqwest::Url::parse_with_params(
            &format!("{}/latest", self.base_url),
            &[
                ("amount", amount.as_str()),
                ("from", request.from.as_str()),
                ("to", request.to.as_str()),
            ],
        )
        .with_context(|| format!("Invalid rate service URL: {}", self.base_url))?;
        debug!(%url, "Requesting conversion");

        let client = reqwest::Client::builder()
            .user_agent(concat!("fxconv/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, pair))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                pair
            ));
        }

        let text = response.text().await?;
        let data: LatestResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", pair, e))?;

        let amount = data
            .rates
            .get(request.to.as_str())
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| anyhow!("No numeric rate found for currency pair: {}", pair))?;

        Ok(Quote {
            amount,
            date: data.date,
        })
    }
}
