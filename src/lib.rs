#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::ClientConfig;
pub use crate::core::{AdminApi, AdminResource, TransportHttp, TransportOptions};
pub use utils::error::{BuxError, Result};
