use crate::domain::model::{CycleReport, ErrorKind};
use crate::domain::ports::ReportSink;
use std::io::Write;

/// Prints each report to stdout followed by a blank line, and mirrors it to
/// the log.
#[derive(Debug, Default)]
pub struct StdoutReporter;

impl ReportSink for StdoutReporter {
    fn emit(&mut self, report: &CycleReport) {
        log_report(report);

        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}\n", report).and_then(|_| out.flush()) {
            tracing::warn!("Could not write cycle report to stdout: {}", e);
        }
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    reports: Vec<CycleReport>,
}

impl VecSink {
    pub fn reports(&self) -> &[CycleReport] {
        &self.reports
    }
}

impl ReportSink for VecSink {
    fn emit(&mut self, report: &CycleReport) {
        self.reports.push(report.clone());
    }
}

fn log_report(report: &CycleReport) {
    match report {
        CycleReport::Moved {
            path, destination, ..
        } => tracing::info!(
            src = %path.display(),
            dest = %destination.display(),
            "Moved latest entry"
        ),
        CycleReport::Empty { .. } => tracing::info!("Watch directory empty"),
        CycleReport::Error {
            kind: ErrorKind::Unclassified,
            detail,
            ..
        } => tracing::error!(kind = ErrorKind::Unclassified.tag(), "{}", detail),
        CycleReport::Error { kind, detail, .. } => {
            tracing::warn!(kind = kind.tag(), "{}", detail)
        }
    }
}
