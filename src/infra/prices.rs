//! One-shot loader for the external price table.
//!
//! The price resource is a flat JSON object mapping price keys to amounts.
//! Loading happens at most once per session; a failure leaves the session in
//! degraded all-zero-price mode and is never retried automatically.

use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;

use crate::domain::PriceTable;
use crate::util::version::version_label;

#[derive(Debug, Error)]
pub enum PriceFetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed price payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct PriceClient {
    http: Client,
    url: Url,
}

impl PriceClient {
    pub fn new(url: &str) -> Result<Self, PriceFetchError> {
        let url = Url::parse(url)?;
        let http = Client::builder()
            .user_agent(format!("malerikalkyl/{}", version_label()))
            .build()?;
        Ok(Self { http, url })
    }

    pub async fn fetch_price_table(&self) -> Result<PriceTable, PriceFetchError> {
        let payload: Value = self
            .http
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(parse_price_payload(&payload))
    }
}

/// Parses a raw JSON string into a price table, e.g. the embedded default.
pub fn parse_price_json(raw: &str) -> Result<PriceTable, PriceFetchError> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(parse_price_payload(&value))
}

/// Builds a table from whatever usable entries the payload carries. Amounts
/// may arrive as numbers or numeric strings; anything negative, non-finite
/// or non-numeric is skipped so one bad entry cannot spoil the table.
pub fn parse_price_payload(value: &Value) -> PriceTable {
    let mut table = PriceTable::new();
    let Some(object) = value.as_object() else {
        return table;
    };

    for (key, entry) in object {
        let amount = match entry {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        if let Some(amount) = amount.filter(|a| a.is_finite() && *a >= 0.0) {
            table.insert(key.clone(), amount);
        }
    }

    table
}
