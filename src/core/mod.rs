pub mod flows;
pub mod markers;
pub mod poller;
pub mod verify;

pub use crate::domain::model::{ProbeResponse, ProductSpec, ServiceEndpoint};
pub use crate::domain::ports::{Fetcher, ProbeConfig, SessionProvider, UiDriver};
pub use crate::utils::error::Result;
