use crate::core::markers;
use crate::core::poller::{await_condition, PollPlan, PollReport};
use crate::domain::ports::{Fetcher, ProbeConfig};
use crate::utils::error::Result;
use std::time::Duration;

/// Drives eventual-consistency checks against one service with a shared
/// attempt budget and interval.
pub struct SyncVerifier<F: Fetcher> {
    fetcher: F,
    max_attempts: u32,
    interval: Duration,
}

impl<F: Fetcher> SyncVerifier<F> {
    pub fn new(fetcher: F, config: &dyn ProbeConfig) -> Self {
        Self {
            fetcher,
            max_attempts: config.max_attempts(),
            interval: config.interval(),
        }
    }

    pub fn with_settings(fetcher: F, max_attempts: u32, interval: Duration) -> Self {
        Self {
            fetcher,
            max_attempts,
            interval,
        }
    }

    /// Wait until `marker` shows up at `target`.
    pub async fn verify_content(&self, target: &str, marker: &str) -> Result<PollReport> {
        tracing::info!("Waiting for '{}' to appear at {}", marker, target);
        let report = self.run(target, markers::contains(marker)).await?;
        tracing::info!(
            "'{}' appeared after {} attempts ({}ms)",
            marker,
            report.attempts,
            report.elapsed_ms
        );
        Ok(report)
    }

    /// Wait until `marker` is gone from `target`.
    pub async fn verify_content_missing(&self, target: &str, marker: &str) -> Result<PollReport> {
        tracing::info!("Waiting for '{}' to disappear from {}", marker, target);
        let report = self.run(target, markers::absent(marker)).await?;
        tracing::info!(
            "'{}' disappeared after {} attempts ({}ms)",
            marker,
            report.attempts,
            report.elapsed_ms
        );
        Ok(report)
    }

    /// Wait until the product listing at `target` reports the given stock.
    pub async fn verify_stock(&self, target: &str, level: u32) -> Result<PollReport> {
        tracing::info!("Waiting for stock to reach {} at {}", level, target);
        let report = self.run(target, markers::stock_level(level)).await?;
        tracing::info!(
            "Stock {} observed after {} attempts ({}ms)",
            level,
            report.attempts,
            report.elapsed_ms
        );
        Ok(report)
    }

    /// Wait until the body at `target` matches `pattern`.
    pub async fn verify_matches(&self, target: &str, pattern: &str) -> Result<PollReport> {
        tracing::info!("Waiting for /{}/ to match at {}", pattern, target);
        let predicate = markers::matches(pattern)?;
        let report = self.run(target, predicate).await?;
        tracing::info!(
            "Pattern matched after {} attempts ({}ms)",
            report.attempts,
            report.elapsed_ms
        );
        Ok(report)
    }

    async fn run<P: Fn(&str) -> bool>(&self, target: &str, predicate: P) -> Result<PollReport> {
        let plan = PollPlan::new(target, self.max_attempts, self.interval)?;
        await_condition(&self.fetcher, &plan, predicate).await
    }
}
