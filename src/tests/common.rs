use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use async_trait::async_trait;
use serde_json::{json, Value};
use crate::models::{MarketRecord, MarketTable};
use crate::scheduler::Clock;

pub fn record(name: &str, symbol: &str, price: f64, market_cap: f64, volume: f64, change: f64) -> MarketRecord {
    MarketRecord {
        name: name.to_string(),
        symbol: symbol.to_string(),
        current_price: Some(price),
        market_cap: Some(market_cap),
        total_volume: Some(volume),
        price_change_24h: Some(change),
    }
}

// Upstream-shaped asset object, with a few of the extra fields the real API sends.
pub fn asset_json(name: &str, symbol: &str, price: f64, market_cap: f64, volume: f64, change: f64) -> Value {
    json!({
        "id": name.to_lowercase(),
        "symbol": symbol,
        "name": name,
        "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
        "current_price": price,
        "market_cap": market_cap,
        "market_cap_rank": 1,
        "total_volume": volume,
        "high_24h": price * 1.02,
        "low_24h": price * 0.98,
        "price_change_24h": price * change / 100.0,
        "price_change_percentage_24h": change,
        "last_updated": "2024-05-01T12:00:00.000Z"
    })
}

pub fn sample_assets() -> Vec<Value> {
    vec![
        asset_json("Bitcoin", "btc", 64000.0, 1.26e12, 2.8e10, -1.2),
        asset_json("Ethereum", "eth", 3100.0, 3.7e11, 1.4e10, 2.4),
        asset_json("Tether", "usdt", 1.0, 1.1e11, 4.9e10, 0.01),
        asset_json("BNB", "bnb", 590.0, 8.7e10, 1.8e9, 0.6),
        asset_json("Solana", "sol", 145.0, 6.5e10, 2.6e9, 5.3),
        asset_json("XRP", "xrp", 0.52, 2.9e10, 1.1e9, -3.8),
    ]
}

pub fn table_with_prices(prices: &[f64]) -> MarketTable {
    MarketTable::new(
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| record(&format!("Coin{}", i), &format!("C{}", i), *p, 1.0, 1.0, 0.0))
            .collect(),
    )
}

pub fn table_with_changes(changes: &[f64]) -> MarketTable {
    MarketTable::new(
        changes
            .iter()
            .enumerate()
            .map(|(i, c)| record(&format!("Coin{}", i), &format!("C{}", i), 1.0, 1.0, 1.0, *c))
            .collect(),
    )
}

pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("crypto-tracker-{}-{}", std::process::id(), name))
}

/// Clock that only moves when slept on or advanced by hand.
pub struct ManualClock {
    now: Mutex<Instant>,
    sleeps: AtomicUsize,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
            sleeps: AtomicUsize::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn sleeps(&self) -> usize {
        self.sleeps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.advance(duration);
    }
}

/// Write sink whose contents stay readable after it is boxed away.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
