mod controller;
mod registry;
mod status;

pub use controller::{FormController, FormSettings, SubmitError};
pub use registry::FormRegistry;
pub use status::{FailureReason, FormSnapshot, SubmissionStatus};
