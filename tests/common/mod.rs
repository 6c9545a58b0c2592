#![allow(dead_code)]

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use crypto_tracker::config::ApiConfig;

pub fn asset_json(name: &str, symbol: &str, price: f64, market_cap: f64, volume: f64, change: f64) -> Value {
    json!({
        "id": name.to_lowercase(),
        "symbol": symbol,
        "name": name,
        "current_price": price,
        "market_cap": market_cap,
        "market_cap_rank": 1,
        "total_volume": volume,
        "price_change_percentage_24h": change,
    })
}

pub fn sample_body() -> String {
    Value::Array(vec![
        asset_json("Bitcoin", "btc", 64000.0, 1.26e12, 2.8e10, -1.2),
        asset_json("Ethereum", "eth", 3100.0, 3.7e11, 1.4e10, 2.4),
        asset_json("Tether", "usdt", 1.0, 1.1e11, 4.9e10, 0.01),
        asset_json("BNB", "bnb", 590.0, 8.7e10, 1.8e9, 0.6),
        asset_json("Solana", "sol", 145.0, 6.5e10, 2.6e9, 5.3),
        asset_json("XRP", "xrp", 0.52, 2.9e10, 1.1e9, -3.8),
    ])
    .to_string()
}

/// Minimal HTTP server answering exactly one request with a canned response.
/// The join handle yields the raw request head it received.
pub struct StubServer {
    pub base_url: String,
    pub handle: JoinHandle<String>,
}

impl StubServer {
    pub async fn respond_once(status: &'static str, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        Self {
            base_url: format!("http://{}/api/v3", addr),
            handle,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: Some(5),
            ..ApiConfig::default()
        }
    }
}

/// Base URL of a port nobody is listening on.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/v3", addr)
}

pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("crypto-tracker-it-{}-{}", std::process::id(), name))
}

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
