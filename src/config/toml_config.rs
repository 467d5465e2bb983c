use crate::domain::model::{Credentials, ServiceEndpoint};
use crate::domain::ports::ProbeConfig;
use crate::utils::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

const DEFAULT_MAX_ATTEMPTS: u32 = 20;
const DEFAULT_INTERVAL_MS: u64 = 1000;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_LOGIN_PATH: &str = "/login";

/// Services file describing the deployment under verification and the
/// default probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub probe: Option<ProbeDefaults>,
    pub services: HashMap<String, ServiceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeDefaults {
    pub max_attempts: Option<u32>,
    pub interval_ms: Option<u64>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub login_path: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProbeError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replace `${VAR_NAME}` references with environment values, leaving
    /// unknown variables untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.services.is_empty() {
            return Err(ProbeError::MissingConfigError {
                field: "services".to_string(),
            });
        }

        for (name, service) in &self.services {
            crate::utils::validation::validate_url(
                &format!("services.{}.base_url", name),
                &service.base_url,
            )?;
            if service.username.is_some() != service.password.is_some() {
                return Err(ProbeError::MissingConfigError {
                    field: format!("services.{}.username/password", name),
                });
            }
        }

        if let Some(probe) = &self.probe {
            if let Some(max_attempts) = probe.max_attempts {
                crate::utils::validation::validate_positive_number(
                    "probe.max_attempts",
                    u64::from(max_attempts),
                    1,
                )?;
            }
        }

        Ok(())
    }

    /// Resolve one configured service into an endpoint the session layer
    /// can log in to.
    pub fn service(&self, name: &str) -> Result<ServiceEndpoint> {
        let config = self
            .services
            .get(name)
            .ok_or_else(|| ProbeError::MissingConfigError {
                field: format!("services.{}", name),
            })?;

        let credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            }),
            (None, None) => None,
            _ => {
                return Err(ProbeError::MissingConfigError {
                    field: format!("services.{}.username/password", name),
                })
            }
        };

        Ok(ServiceEndpoint {
            name: name.to_string(),
            base_url: config.base_url.clone(),
            login_path: config
                .login_path
                .clone()
                .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
            credentials,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        let seconds = self
            .probe
            .as_ref()
            .and_then(|p| p.request_timeout_seconds)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS);
        Duration::from_secs(seconds)
    }
}

impl ProbeConfig for TomlConfig {
    fn max_attempts(&self) -> u32 {
        self.probe
            .as_ref()
            .and_then(|p| p.max_attempts)
            .unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    fn interval(&self) -> Duration {
        let ms = self
            .probe
            .as_ref()
            .and_then(|p| p.interval_ms)
            .unwrap_or(DEFAULT_INTERVAL_MS);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[probe]
max_attempts = 40
interval_ms = 500

[services.webshop]
base_url = "https://reverse-proxy:8443"
username = "manager"
password = "password"

[services.product-management]
base_url = "https://reverse-proxy:8444"
login_path = "/login"
username = "manager"
password = "password"

[services.warehouse]
base_url = "https://reverse-proxy:8445"
username = "staff"
password = "password"

[services.order]
base_url = "https://reverse-proxy:8447"
username = "o-user"
password = "o-user"

[services.loyalty]
base_url = "https://reverse-proxy:8448"
"#;

    #[test]
    fn test_parses_services_and_defaults() {
        let config = TomlConfig::from_toml_str(SAMPLE).unwrap();
        config.validate_config().unwrap();

        assert_eq!(config.max_attempts(), 40);
        assert_eq!(config.interval(), Duration::from_millis(500));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.services.len(), 5);
    }

    #[test]
    fn test_resolves_service_endpoint() {
        let config = TomlConfig::from_toml_str(SAMPLE).unwrap();
        let warehouse = config.service("warehouse").unwrap();

        assert_eq!(warehouse.base_url, "https://reverse-proxy:8445");
        assert_eq!(warehouse.login_url(), "https://reverse-proxy:8445/login");
        assert_eq!(warehouse.credentials.unwrap().username, "staff");

        let loyalty = config.service("loyalty").unwrap();
        assert!(loyalty.credentials.is_none());

        assert!(config.service("unknown").is_err());
    }

    #[test]
    fn test_defaults_apply_without_probe_section() {
        let config = TomlConfig::from_toml_str(
            r#"
[services.webshop]
base_url = "http://webshop-demo:8000"
"#,
        )
        .unwrap();

        assert_eq!(config.max_attempts(), 20);
        assert_eq!(config.interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = TomlConfig::from_toml_str(
            r#"
[services.webshop]
base_url = "not-a-url"
"#,
        )
        .unwrap();

        assert!(config.validate_config().is_err());
    }

    #[test]
    fn test_rejects_password_without_username() {
        let config = TomlConfig::from_toml_str(
            r#"
[services.webshop]
base_url = "https://reverse-proxy:8443"
password = "password"
"#,
        )
        .unwrap();

        assert!(config.validate_config().is_err());
        assert!(config.service("webshop").is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SYNC_PROBE_TEST_PASSWORD", "s3cret");
        let config = TomlConfig::from_toml_str(
            r#"
[services.webshop]
base_url = "https://reverse-proxy:8443"
username = "manager"
password = "${SYNC_PROBE_TEST_PASSWORD}"
"#,
        )
        .unwrap();

        let webshop = config.service("webshop").unwrap();
        assert_eq!(webshop.credentials.unwrap().password, "s3cret");
    }

    #[test]
    fn test_unknown_env_var_left_as_is() {
        let config = TomlConfig::from_toml_str(
            r#"
[services.webshop]
base_url = "https://reverse-proxy:8443"
username = "manager"
password = "${SYNC_PROBE_UNSET_VAR}"
"#,
        )
        .unwrap();

        let webshop = config.service("webshop").unwrap();
        assert_eq!(
            webshop.credentials.unwrap().password,
            "${SYNC_PROBE_UNSET_VAR}"
        );
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = TomlConfig::from_file(&path).unwrap();
        assert!(config.services.contains_key("webshop"));

        assert!(TomlConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
