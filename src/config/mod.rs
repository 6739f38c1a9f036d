#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::model::UnknownErrorPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the destination directory.
pub const DESTINATION_ENV: &str = "FILEDESTINATION";
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// Everything the driver needs. Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub watch_target: PathBuf,
    pub destination: PathBuf,
    pub interval: Duration,
    pub include_hidden: bool,
    pub unknown_error_policy: UnknownErrorPolicy,
    /// `None` runs forever.
    pub max_cycles: Option<u64>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            watch_target: PathBuf::from("."),
            destination: PathBuf::new(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            include_hidden: false,
            unknown_error_policy: UnknownErrorPolicy::default(),
            max_cycles: None,
        }
    }
}
