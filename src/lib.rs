pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Condition};
pub use config::toml_config::TomlConfig;

pub use adapters::http::{FormLogin, HttpProbe};
pub use core::poller::{await_condition, PollPlan, PollProgress, PollReport, PollState};
pub use core::verify::SyncVerifier;
pub use utils::error::{ProbeError, Result};
