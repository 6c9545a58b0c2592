use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use crate::api::MarketSource;
use crate::config::ApiConfig;
use crate::error::{Error, Result};

const MARKETS_ENDPOINT: &str = "coins/markets";

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    params: Vec<(&'static str, String)>,
}

impl CoinGeckoClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            params: query_params(config),
        })
    }

    pub fn markets_url(&self) -> String {
        format!("{}/{}", self.base_url, MARKETS_ENDPOINT)
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }
}

/// Fixed query for the first page of assets by market cap.
pub fn query_params(config: &ApiConfig) -> Vec<(&'static str, String)> {
    vec![
        ("vs_currency", config.vs_currency.clone()),
        ("order", config.order.clone()),
        ("per_page", config.per_page.to_string()),
        ("page", config.page.to_string()),
        ("sparkline", config.sparkline.to_string()),
    ]
}

/// Turns a status and body into the fetch outcome.
pub fn parse_markets_response(status: StatusCode, body: &str) -> Result<Option<Vec<Value>>> {
    if status != StatusCode::OK {
        error!("Error fetching data: {}", status.as_u16());
        return Ok(None);
    }

    match serde_json::from_str::<Value>(body)? {
        Value::Array(assets) => Ok(Some(assets)),
        other => Err(Error::MalformedResponse(format!(
            "expected a JSON array of assets, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl MarketSource for CoinGeckoClient {
    async fn fetch_markets(&self) -> Result<Option<Vec<Value>>> {
        let url = self.markets_url();
        info!("Fetching latest cryptocurrency data from {}", url);

        let response = self.client.get(&url).query(&self.params).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Upstream answered {} with {} bytes", status, body.len());

        let assets = parse_markets_response(status, &body)?;
        if let Some(assets) = &assets {
            info!("Fetched {} assets", assets.len());
        }
        Ok(assets)
    }
}
