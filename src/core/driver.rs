use crate::config::RelayConfig;
use crate::core::relocator::relocate;
use crate::core::selector::{select_latest, SelectOptions};
use crate::domain::model::{CycleReport, ErrorKind, NextStep, RunSummary, Selection, UnknownErrorPolicy};
use crate::domain::ports::{Clock, ReportSink, Sleeper};
use crate::utils::error::{ErrorSeverity, MoveError, RelayError, SelectError};
use std::fs;

/// Select → move → report → sleep, on a fixed interval.
///
/// The interval is measured from the end of a cycle: the cycle completes and
/// reports, then the driver sleeps exactly `config.interval`.
pub struct RelayDriver<C: Clock, S: Sleeper, R: ReportSink> {
    config: RelayConfig,
    clock: C,
    sleeper: S,
    sink: R,
}

impl<C: Clock, S: Sleeper, R: ReportSink> RelayDriver<C, S, R> {
    pub fn new(config: RelayConfig, clock: C, sleeper: S, sink: R) -> Self {
        Self {
            config,
            clock,
            sleeper,
            sink,
        }
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Run one cycle and emit its report. Never panics on filesystem failures.
    pub fn run_cycle(&mut self) -> (CycleReport, NextStep) {
        // 目的地可能位於監看目錄內，永遠不當作候選
        let options = SelectOptions {
            include_hidden: self.config.include_hidden,
            skip: fs::canonicalize(&self.config.destination).ok(),
        };

        let (report, next) = match select_latest(&self.config.watch_target, &options) {
            Ok(Selection::Empty) => (
                CycleReport::Empty {
                    at: self.clock.now(),
                },
                NextStep::Continue,
            ),
            Ok(Selection::Found(candidate)) => {
                match relocate(&candidate.path, &self.config.destination) {
                    Ok(_) => (
                        CycleReport::Moved {
                            path: candidate.path,
                            destination: self.config.destination.clone(),
                            at: self.clock.now(),
                        },
                        NextStep::Continue,
                    ),
                    Err(err) => self.failure(err.into()),
                }
            }
            Err(err) => self.failure(err.into()),
        };

        self.sink.emit(&report);
        (report, next)
    }

    /// Loop until `config.max_cycles` is reached, or forever when it is unset.
    ///
    /// Returns early only when an unclassified selection error occurs under
    /// `UnknownErrorPolicy::Halt`.
    pub async fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::default();

        loop {
            let (report, next) = self.run_cycle();
            summary.record(&report);

            if next == NextStep::Halt {
                tracing::error!("Stopping after unclassified selection error");
                summary.halted = true;
                break;
            }

            if let Some(max) = self.config.max_cycles {
                if summary.cycles >= max {
                    break;
                }
            }

            self.sleeper.sleep(self.config.interval).await;
        }

        tracing::info!(
            "Relay finished: {} cycles, {} moved, {} empty, {} errors",
            summary.cycles,
            summary.moved,
            summary.empty,
            summary.errors
        );
        summary
    }

    fn failure(&self, err: RelayError) -> (CycleReport, NextStep) {
        let kind = error_kind(&err);
        let next = match (kind, self.config.unknown_error_policy) {
            (ErrorKind::Unclassified, UnknownErrorPolicy::Halt) => NextStep::Halt,
            _ => NextStep::Continue,
        };

        if err.severity() >= ErrorSeverity::High {
            tracing::error!(category = ?err.category(), "💡 {}", err.recovery_suggestion());
        } else {
            tracing::debug!(category = ?err.category(), "💡 {}", err.recovery_suggestion());
        }

        let detail = match &err {
            RelayError::Select(inner) => inner.to_string(),
            RelayError::Move(inner) => inner.to_string(),
            other => other.to_string(),
        };
        let report = CycleReport::Error {
            kind,
            detail,
            at: self.clock.now(),
        };
        (report, next)
    }
}

/// Report kind for a failed cycle. Configuration errors never reach a cycle
/// and are counted as unclassified.
pub fn error_kind(err: &RelayError) -> ErrorKind {
    match err {
        RelayError::Select(SelectError::NotFound { .. }) => ErrorKind::SourceNotFound,
        RelayError::Move(MoveError::NotFound { .. }) => ErrorKind::MoveNotFound,
        RelayError::Move(MoveError::Other { .. }) => ErrorKind::MoveOther,
        RelayError::Select(SelectError::Other { .. })
        | RelayError::MissingConfigError { .. }
        | RelayError::InvalidConfigValueError { .. } => ErrorKind::Unclassified,
    }
}
