pub mod view;

pub use view::{ResultView, SubmissionForm};
