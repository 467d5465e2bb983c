use serde::{Deserialize, Serialize};

/// One observed probe result. Non-2xx statuses are data here, not errors;
/// the poller decides what they mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

impl ProbeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A service of the deployment under verification, addressed by its
/// reverse-proxy base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub name: String,
    pub base_url: String,
    pub login_path: String,
    pub credentials: Option<Credentials>,
}

impl ServiceEndpoint {
    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.login_path)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Product fields as the product-management UI form expects them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSpec {
    pub name: String,
    pub kind: String,
    pub price: String,
    pub unit: String,
    pub description: Option<String>,
}

/// Timestamp-suffixed identifier so concurrent runs against the same
/// deployment do not observe each other's data.
pub fn isolated_name(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_millis())
}
