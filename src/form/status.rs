use crate::domain::EmailShapeError;

/// What the footer should render for the newsletter form.
#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Succeeded => "succeeded",
            SubmissionStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    EmptyInput,
    InvalidShape,
    /// Carries the collaborator's detail for logs; never shown to visitors.
    SubmissionFailed(String),
}

impl FailureReason {
    pub fn detail(&self) -> Option<&str> {
        match self {
            FailureReason::SubmissionFailed(detail) => Some(detail),
            _ => None,
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::EmptyInput => write!(f, "empty input"),
            FailureReason::InvalidShape => write!(f, "invalid shape"),
            FailureReason::SubmissionFailed(_) => write!(f, "submission failed"),
        }
    }
}

impl From<EmailShapeError> for FailureReason {
    fn from(e: EmailShapeError) -> Self {
        match e {
            EmailShapeError::Empty => FailureReason::EmptyInput,
            EmailShapeError::InvalidShape => FailureReason::InvalidShape,
        }
    }
}

impl serde::Serialize for FailureReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Read-only view of a form, handed to the presentation layer.
#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub raw_input: String,
    pub status: SubmissionStatus,
    pub error_reason: Option<FailureReason>,
}

impl FormSnapshot {
    /// What a form looks like before its visitor ever submitted.
    pub fn idle() -> Self {
        Self {
            raw_input: String::new(),
            status: SubmissionStatus::Idle,
            error_reason: None,
        }
    }
}
