use crate::domain::model::{ProbeResponse, ServiceEndpoint};
use crate::domain::ports::{Fetcher, SessionProvider};
use crate::utils::error::{ProbeError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only GET probe over a reqwest client. Non-2xx responses come back
/// as data; only transport failures are errors.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Wrap an existing client, keeping whatever cookie/session state it carries.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpProbe {
    async fn fetch(&self, target: &str) -> Result<ProbeResponse> {
        let response = self.client.get(target).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ProbeResponse { status, body })
    }
}

/// Request-based session acquisition: posts the service's login form over a
/// cookie-store client and hands back a probe bound to that client, so every
/// subsequent fetch carries the session cookie.
#[derive(Debug, Clone)]
pub struct FormLogin {
    request_timeout: Duration,
}

impl FormLogin {
    pub fn new() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

impl Default for FormLogin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for FormLogin {
    async fn acquire(&self, service: &ServiceEndpoint) -> Result<Box<dyn Fetcher>> {
        let credentials =
            service
                .credentials
                .as_ref()
                .ok_or_else(|| ProbeError::MissingConfigError {
                    field: format!("services.{}.username", service.name),
                })?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(self.request_timeout)
            .build()?;

        let response = client
            .post(service.login_url())
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(ProbeError::LoginError {
                service: service.name.clone(),
                status: status.as_u16(),
            });
        }

        tracing::debug!(
            "logged in to '{}' as '{}'",
            service.name,
            credentials.username
        );
        Ok(Box::new(HttpProbe::with_client(client)))
    }
}
