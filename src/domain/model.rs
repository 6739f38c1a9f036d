use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// Newest entry found in the watch directory during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub recency: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Found(CandidateFile),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SourceNotFound,
    MoveNotFound,
    MoveOther,
    Unclassified,
}

impl ErrorKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ErrorKind::SourceNotFound => "SOURCE NOT FOUND ERROR",
            ErrorKind::MoveNotFound => "FILE NOT FOUND ERROR",
            ErrorKind::MoveOther => "MOVE ERROR",
            ErrorKind::Unclassified => "SELECTION ERROR",
        }
    }
}

/// Outcome of a single cycle. Emitted once, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    Moved {
        path: PathBuf,
        destination: PathBuf,
        at: DateTime<Utc>,
    },
    Empty {
        at: DateTime<Utc>,
    },
    Error {
        kind: ErrorKind,
        detail: String,
        at: DateTime<Utc>,
    },
}

impl CycleReport {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            CycleReport::Moved { at, .. }
            | CycleReport::Empty { at }
            | CycleReport::Error { at, .. } => *at,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CycleReport::Error { .. })
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleReport::Moved {
                path, destination, ..
            } => write!(
                f,
                "File {} successfully moved to {}",
                path.display(),
                destination.display()
            )?,
            CycleReport::Empty { .. } => {
                write!(f, "The directory provided is empty; no files were moved.")?
            }
            CycleReport::Error { kind, detail, .. } => write!(f, "{}: {}", kind.tag(), detail)?,
        }
        write!(f, "\nUTC_time:{}", self.at().format("%Y-%m-%d %H:%M:%S%.6f"))
    }
}

/// What the driver does after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Continue,
    Halt,
}

/// Policy for selection errors that are neither "empty" nor "not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownErrorPolicy {
    #[default]
    Continue,
    Halt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub moved: u64,
    pub empty: u64,
    pub errors: u64,
    pub halted: bool,
}

impl RunSummary {
    pub fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        match report {
            CycleReport::Moved { .. } => self.moved += 1,
            CycleReport::Empty { .. } => self.empty += 1,
            CycleReport::Error { .. } => self.errors += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn moved_report_names_path_and_destination() {
        let report = CycleReport::Moved {
            path: PathBuf::from("/in/b.txt"),
            destination: PathBuf::from("/out"),
            at: at(),
        };
        assert_eq!(
            report.to_string(),
            "File /in/b.txt successfully moved to /out\nUTC_time:2018-05-01 12:30:00.000000"
        );
    }

    #[test]
    fn empty_report_is_not_an_error() {
        let report = CycleReport::Empty { at: at() };
        assert!(!report.is_error());
        assert!(report
            .to_string()
            .starts_with("The directory provided is empty; no files were moved."));
    }

    #[test]
    fn error_report_is_tagged() {
        let report = CycleReport::Error {
            kind: ErrorKind::MoveNotFound,
            detail: "/in/gone.txt: No such file or directory".to_string(),
            at: at(),
        };
        let text = report.to_string();
        assert!(text.starts_with("FILE NOT FOUND ERROR: /in/gone.txt"));
        assert!(text.ends_with("UTC_time:2018-05-01 12:30:00.000000"));
    }

    #[test]
    fn summary_counts_each_outcome() {
        let mut summary = RunSummary::default();
        summary.record(&CycleReport::Empty { at: at() });
        summary.record(&CycleReport::Error {
            kind: ErrorKind::SourceNotFound,
            detail: String::new(),
            at: at(),
        });
        assert_eq!(summary.cycles, 2);
        assert_eq!(summary.empty, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.moved, 0);
    }
}
