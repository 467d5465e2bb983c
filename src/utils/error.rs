use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required config field: {field}")]
    MissingConfigError { field: String },

    #[error("Login to '{service}' failed with status {status}")]
    LoginError { service: String, status: u16 },

    #[error("Driver error: {message}")]
    DriverError { message: String },

    #[error("Timed out after {attempts} attempts (last status: {last_status:?})")]
    TimeoutExceeded {
        attempts: u32,
        last_status: Option<u16>,
        last_body: Option<String>,
        last_error: Option<String>,
    },
}

impl ProbeError {
    /// Truncated view of the last observed body, for log output on timeout.
    pub fn last_observed_snippet(&self) -> Option<String> {
        match self {
            ProbeError::TimeoutExceeded { last_body, .. } => last_body.as_ref().map(|body| {
                let mut snippet: String = body.chars().take(200).collect();
                if body.chars().count() > 200 {
                    snippet.push_str("...");
                }
                snippet
            }),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
