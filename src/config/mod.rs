pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::ports::ProbeConfig;
#[cfg(feature = "cli")]
use crate::utils::error::{ProbeError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_required_field, validate_url,
    Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::time::Duration;

/// The awaited condition, resolved from the mutually exclusive marker flags.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Contains(String),
    Absent(String),
    Stock(u32),
    Matches(String),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sync-probe")]
#[command(about = "Poll a service until it reflects an expected state")]
pub struct CliConfig {
    /// Resource URL to probe directly (alternative to --config/--service)
    #[arg(long)]
    pub target: Option<String>,

    /// Services TOML file
    #[arg(long)]
    pub config: Option<String>,

    /// Service name from the config file to probe
    #[arg(long)]
    pub service: Option<String>,

    /// Path probed on the selected service
    #[arg(long, default_value = "/products")]
    pub path: String,

    /// Succeed once this marker appears in the body
    #[arg(long)]
    pub contains: Option<String>,

    /// Succeed once this marker is gone from the body
    #[arg(long)]
    pub absent: Option<String>,

    /// Succeed once the listing reports this stock count
    #[arg(long)]
    pub stock: Option<u32>,

    /// Succeed once the body matches this regex
    #[arg(long, value_name = "PATTERN")]
    pub matches: Option<String>,

    #[arg(long, default_value = "20")]
    pub max_attempts: u32,

    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,

    /// Print the poll report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn condition(&self) -> Result<Condition> {
        let mut conditions = Vec::new();
        if let Some(marker) = &self.contains {
            conditions.push(Condition::Contains(marker.clone()));
        }
        if let Some(marker) = &self.absent {
            conditions.push(Condition::Absent(marker.clone()));
        }
        if let Some(level) = self.stock {
            conditions.push(Condition::Stock(level));
        }
        if let Some(pattern) = &self.matches {
            conditions.push(Condition::Matches(pattern.clone()));
        }

        match conditions.len() {
            0 => Err(ProbeError::MissingConfigError {
                field: "--contains | --absent | --stock | --matches".to_string(),
            }),
            1 => Ok(conditions.remove(0)),
            n => Err(ProbeError::InvalidConfigValueError {
                field: "condition".to_string(),
                value: format!("{} markers", n),
                reason: "Only one of --contains/--absent/--stock/--matches may be given"
                    .to_string(),
            }),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("max_attempts", u64::from(self.max_attempts), 1)?;

        match &self.target {
            Some(target) => validate_url("target", target)?,
            None => {
                validate_required_field("config", &self.config)?;
                validate_required_field("service", &self.service)?;
            }
        }

        match self.condition()? {
            Condition::Contains(marker) | Condition::Absent(marker) => {
                validate_non_empty_string("marker", &marker)?;
            }
            Condition::Matches(pattern) => {
                validate_non_empty_string("matches", &pattern)?;
            }
            Condition::Stock(_) => {}
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ProbeConfig for CliConfig {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
