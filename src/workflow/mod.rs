pub mod backoff;
pub mod tracker;

pub use backoff::{Backoff, BackoffTimer};
pub use tracker::{CancelFlag, SleepFn, SubmissionTracker};
