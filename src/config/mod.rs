use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::fs;
use std::time::Duration;
use anyhow::{Context, Result};
use crate::driver::Disposition;
use crate::error::ErrorKind;
use crate::transform::MissingFieldPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_OUTPUT_PATH: &str = "Live_Crypto_Data.xlsx";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
    pub schedule: ScheduleConfig,
    pub policy: PolicyConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
    pub sparkline: bool,
    /// No timeout unless set.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            vs_currency: "usd".to_string(),
            order: "market_cap_desc".to_string(),
            per_page: 50,
            page: 1,
            sparkline: false,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub sheet_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            sheet_name: "Sheet1".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
    pub poll_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            poll_secs: 1,
        }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    pub missing_field: MissingFieldPolicy,
    pub on_network_error: Disposition,
    pub on_malformed_response: Disposition,
    pub on_write_error: Disposition,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            missing_field: MissingFieldPolicy::Fail,
            on_network_error: Disposition::Escalate,
            on_malformed_response: Disposition::Escalate,
            on_write_error: Disposition::Escalate,
        }
    }
}

impl PolicyConfig {
    pub fn disposition(&self, kind: ErrorKind) -> Disposition {
        match kind {
            ErrorKind::Network => self.on_network_error,
            ErrorKind::Malformed => self.on_malformed_response,
            ErrorKind::Persist => self.on_write_error,
            ErrorKind::Config => Disposition::Escalate,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("reading config file {:?}", path))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("parsing config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.per_page == 0 || self.api.per_page > 250 {
            anyhow::bail!("api.per_page must be between 1 and 250, got {}", self.api.per_page);
        }
        if self.api.page == 0 {
            anyhow::bail!("api.page must be at least 1");
        }
        if self.schedule.interval_secs == 0 {
            anyhow::bail!("schedule.interval_secs must be positive");
        }
        if self.schedule.poll_secs == 0 {
            anyhow::bail!("schedule.poll_secs must be positive");
        }
        if self.output.sheet_name.trim().is_empty() {
            anyhow::bail!("output.sheet_name cannot be empty");
        }
        Ok(())
    }
}
