// Adapters layer: concrete clock, sleeper and report sink implementations.

pub mod clock;
pub mod report;

pub use clock::{FixedClock, RecordingSleeper, SystemClock, TokioSleeper};
pub use report::{StdoutReporter, VecSink};
