use crate::domain::model::{ProbeResponse, ServiceEndpoint};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Read-only probe against a target resource. Implementations must not
/// mutate downstream state; transport failures are returned as errors and
/// downgraded to "condition not yet met" by the poller.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, target: &str) -> Result<ProbeResponse>;
}

#[async_trait]
impl Fetcher for Box<dyn Fetcher> {
    async fn fetch(&self, target: &str) -> Result<ProbeResponse> {
        (**self).fetch(target).await
    }
}

impl std::fmt::Debug for dyn Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Fetcher")
    }
}

/// Single seam for acquiring an authenticated probe against a service.
/// The returned fetcher carries whatever session context the login
/// established (cookies), so subsequent probes are authorized.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn acquire(&self, service: &ServiceEndpoint) -> Result<Box<dyn Fetcher>>;
}

/// Capability surface of a browser-driving layer. Keeping flows behind this
/// trait lets the automation engine be swapped without touching them, and
/// lets flow logic run against a scripted double in tests.
#[async_trait]
pub trait UiDriver: Send + Sync {
    async fn navigate(&mut self, url: &str) -> Result<()>;
    async fn fill_field(&mut self, name: &str, value: &str) -> Result<()>;
    async fn click(&mut self, selector: &str) -> Result<()>;
    async fn read_text(&mut self, selector: &str) -> Result<String>;
}

pub trait ProbeConfig: Send + Sync {
    fn max_attempts(&self) -> u32;
    fn interval(&self) -> Duration;
}
