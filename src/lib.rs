pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{StdoutReporter, SystemClock, TokioSleeper};
pub use config::RelayConfig;
pub use crate::core::{driver::RelayDriver, relocator::relocate, selector::select_latest};
pub use domain::model::{CycleReport, ErrorKind, RunSummary, Selection, UnknownErrorPolicy};
pub use utils::error::{MoveError, RelayError, Result, SelectError};
