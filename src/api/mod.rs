use async_trait::async_trait;
use serde_json::Value;
use crate::error::Result;

pub mod coingecko;

pub use coingecko::CoinGeckoClient;

/// Source of raw per-asset market objects.
///
/// `Ok(None)` is the absence value: the upstream answered with a non-success
/// status and there is nothing to process this tick. Transport failures and
/// unparseable bodies come back as `Err`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn fetch_markets(&self) -> Result<Option<Vec<Value>>>;
}
