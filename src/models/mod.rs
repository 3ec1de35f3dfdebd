pub mod result;
pub mod status;
pub mod submission;

pub use result::{FailureReason, Outcome, TrackingResult};
pub use status::{StatusRow, Verdict};
pub use submission::{Language, SubmissionRequest};
