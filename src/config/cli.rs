use crate::config::{RelayConfig, DEFAULT_INTERVAL_SECS, DESTINATION_ENV};
use crate::domain::model::UnknownErrorPolicy;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_required_field,
    Validate,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "file-relay")]
#[command(about = "Moves the newest entry of a watch directory to $FILEDESTINATION on a fixed interval")]
pub struct CliConfig {
    /// Directory to watch
    pub watch_target: PathBuf,

    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS, help = "Seconds to wait between cycles")]
    pub interval_secs: u64,

    #[arg(long, help = "Stop after this many cycles")]
    pub max_cycles: Option<u64>,

    #[arg(long, help = "Also consider dot-prefixed entries")]
    pub include_hidden: bool,

    #[arg(long, help = "Stop the loop on unclassified selection errors")]
    pub halt_on_unknown_error: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("watch_target", &self.watch_target)?;
        validate_positive_number("interval_secs", self.interval_secs, 1)?;
        if let Some(max) = self.max_cycles {
            validate_positive_number("max_cycles", max, 1)?;
        }
        Ok(())
    }
}

impl CliConfig {
    /// Combine the parsed arguments with the destination looked up through
    /// `env`. An unset or blank destination is a missing-config error.
    pub fn into_relay_config<F>(self, env: F) -> Result<RelayConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.validate()?;

        let destination = env(DESTINATION_ENV);
        let destination = validate_required_field(DESTINATION_ENV, &destination)?;
        validate_non_empty_string(DESTINATION_ENV, destination).map_err(|_| {
            RelayError::MissingConfigError {
                field: DESTINATION_ENV.to_string(),
            }
        })?;

        let unknown_error_policy = if self.halt_on_unknown_error {
            UnknownErrorPolicy::Halt
        } else {
            UnknownErrorPolicy::Continue
        };

        Ok(RelayConfig {
            watch_target: self.watch_target,
            destination: PathBuf::from(destination),
            interval: Duration::from_secs(self.interval_secs),
            include_hidden: self.include_hidden,
            unknown_error_policy,
            max_cycles: self.max_cycles,
        })
    }
}
