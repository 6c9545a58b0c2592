use std::io::Write;
use std::sync::Arc;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use crate::analysis::{self, AnalysisSummary};
use crate::api::{CoinGeckoClient, MarketSource};
use crate::config::{Config, PolicyConfig};
use crate::error::Result;
use crate::export::{TablePersister, XlsxExporter};
use crate::scheduler::{StopHandle, SystemClock, Ticker};
use crate::transform;

/// What the driver does with a failed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Log it and wait for the next tick.
    Skip,
    /// Stop the loop and hand the error to the caller.
    Escalate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The upstream gave nothing usable; persist and analysis were skipped.
    NoData,
    Completed { rows: usize, summary: AnalysisSummary },
}

/// Runs fetch, transform, persist and analyze in sequence on every tick.
pub struct Driver {
    source: Box<dyn MarketSource>,
    persister: Box<dyn TablePersister>,
    report: Box<dyn Write + Send>,
    ticker: Ticker,
    policy: PolicyConfig,
}

impl Driver {
    pub fn new(
        source: Box<dyn MarketSource>,
        persister: Box<dyn TablePersister>,
        report: Box<dyn Write + Send>,
        ticker: Ticker,
        policy: PolicyConfig,
    ) -> Self {
        Self {
            source,
            persister,
            report,
            ticker,
            policy,
        }
    }

    /// CoinGecko source, xlsx output, report on stdout and the wall clock.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = CoinGeckoClient::new(&config.api)?;
        let persister = XlsxExporter::from_config(&config.output);
        let ticker = Ticker::new(
            Arc::new(SystemClock),
            config.schedule.interval(),
            config.schedule.poll(),
        );

        Ok(Self::new(
            Box::new(source),
            Box::new(persister),
            Box::new(std::io::stdout()),
            ticker,
            config.policy.clone(),
        ))
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.ticker.stop_handle()
    }

    pub async fn run_tick(&mut self) -> Result<TickOutcome> {
        info!("Fetching latest cryptocurrency data...");
        let raw = self.source.fetch_markets().await?;

        let table = transform::build_table(raw, self.policy.missing_field)?;

        if let Some(table) = &table {
            self.persister.persist(table)?;
        }

        let summary = analysis::analyze_and_report(table.as_ref(), self.report.as_mut())?;

        Ok(match (table, summary) {
            (Some(table), Some(summary)) => TickOutcome::Completed {
                rows: table.len(),
                summary,
            },
            _ => TickOutcome::NoData,
        })
    }

    /// Ticks until stopped or until an escalated error.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Starting market snapshot loop, interval {:?}",
            self.ticker.interval()
        );

        while self.ticker.wait_for_tick().await {
            match self.run_tick().await {
                Ok(TickOutcome::NoData) => {
                    warn!("No market data this tick, skipping write and analysis");
                }
                Ok(TickOutcome::Completed { rows, .. }) => {
                    info!("Tick completed with {} rows", rows);
                }
                Err(err) => match self.policy.disposition(err.kind()) {
                    Disposition::Skip => {
                        warn!("Tick failed ({:?}), waiting for the next one: {}", err.kind(), err);
                    }
                    Disposition::Escalate => {
                        error!("Tick failed ({:?}): {}", err.kind(), err);
                        return Err(err);
                    }
                },
            }
        }

        info!("Market snapshot loop stopped");
        Ok(())
    }
}
