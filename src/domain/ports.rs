use crate::domain::model::CycleReport;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Source of report timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Waits between cycles. Swapped for a recording fake in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub trait ReportSink: Send {
    fn emit(&mut self, report: &CycleReport);
}
