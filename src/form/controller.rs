use std::sync::{Arc, Weak};
use std::time::Duration;

use anyhow::Context;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::status::{FailureReason, FormSnapshot, SubmissionStatus};
use crate::domain::{EmailShapeError, SubscriberEmail};
use crate::subscription_service::SubscriptionService;

#[derive(Debug, Clone, Copy)]
pub struct FormSettings {
    /// How long `Succeeded` stays on screen before the form resets itself.
    pub success_display_window: Duration,
    /// Upper bound on a single call to the subscription service.
    pub submission_timeout: Duration,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            success_display_window: Duration::from_millis(3000),
            submission_timeout: Duration::from_millis(5000),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("empty input")]
    EmptyInput,

    #[error("invalid shape")]
    InvalidShape,

    #[error("submission failed")]
    SubmissionFailed(#[source] anyhow::Error),

    #[error("submission already in progress")]
    AlreadyInProgress,
}

impl From<EmailShapeError> for SubmitError {
    fn from(e: EmailShapeError) -> Self {
        match e {
            EmailShapeError::Empty => SubmitError::EmptyInput,
            EmailShapeError::InvalidShape => SubmitError::InvalidShape,
        }
    }
}

struct FormState {
    raw_input: String,
    status: SubmissionStatus,
    error_reason: Option<FailureReason>,
    submission: Option<JoinHandle<()>>,
    reset_timer: Option<JoinHandle<()>>,
}

impl FormState {
    fn fail(&mut self, reason: FailureReason) {
        self.status = SubmissionStatus::Failed;
        self.error_reason = Some(reason);
    }

    fn cancel_submission(&mut self) {
        if let Some(submission) = self.submission.take() {
            submission.abort();
        }
        if self.status == SubmissionStatus::Pending {
            self.fail(FailureReason::SubmissionFailed("cancelled".into()));
        }
    }

    fn cancel_reset_timer(&mut self) {
        if let Some(timer) = self.reset_timer.take() {
            timer.abort();
        }
    }
}

/// Owns the newsletter input of one rendered footer and drives its
/// submission state machine.
///
/// ```text
/// Idle      --submit(invalid)-->  Failed
/// Idle      --submit(valid)---->  Pending
/// Pending   --service ok------->  Succeeded
/// Pending   --service error---->  Failed
/// Succeeded --window elapsed--->  Idle
/// Failed    --input change----->  Idle
/// Failed    --submit(valid)---->  Pending
/// ```
///
/// The service call runs in a task owned by the controller, so a caller
/// that stops waiting on `submit` never leaves the form stuck in `Pending`.
pub struct FormController {
    state: Arc<Mutex<FormState>>,
    service: Arc<dyn SubscriptionService>,
    settings: FormSettings,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl FormController {
    pub fn new(service: Arc<dyn SubscriptionService>, settings: FormSettings) -> Self {
        let state = FormState {
            raw_input: String::new(),
            status: SubmissionStatus::Idle,
            error_reason: None,
            submission: None,
            reset_timer: None,
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            service,
            settings,
        }
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.state.lock().await;
        FormSnapshot {
            raw_input: state.raw_input.clone(),
            status: state.status,
            error_reason: state.error_reason.clone(),
        }
    }

    /// Record what the visitor typed. Editing clears a previous failure.
    #[tracing::instrument(name = "newsletter input changed", skip(self, new_value))]
    pub async fn on_input_change(&self, new_value: String) {
        let mut state = self.state.lock().await;
        state.raw_input = new_value;

        if state.status == SubmissionStatus::Failed {
            state.status = SubmissionStatus::Idle;
            state.error_reason = None;
        }
    }

    #[tracing::instrument(
        name = "submitting newsletter form",
        skip(self),
        fields(subscriber_email = tracing::field::Empty)
    )]
    pub async fn submit(&self) -> Result<(), SubmitError> {
        let done = {
            let mut state = self.state.lock().await;

            if state.status == SubmissionStatus::Pending {
                tracing::warn!("submission already in progress");
                return Err(SubmitError::AlreadyInProgress);
            }

            let email = match SubscriberEmail::parse(state.raw_input.clone()) {
                Ok(email) => email,
                Err(e) => {
                    tracing::info!(reason = %e, "newsletter input rejected");
                    state.fail(e.into());
                    return Err(e.into());
                }
            };
            tracing::Span::current()
                .record("subscriber_email", tracing::field::display(&email));

            state.cancel_reset_timer();
            state.status = SubmissionStatus::Pending;
            state.error_reason = None;

            // the task needs this lock to finish, so it cannot complete
            // before its handle is stored.
            let (tx, rx) = oneshot::channel();
            let submission = tokio::spawn(
                run_submission(
                    Arc::downgrade(&self.state),
                    self.service.clone(),
                    email,
                    self.settings,
                    tx,
                )
                .instrument(tracing::Span::current()),
            );
            state.submission = Some(submission);
            rx
        };

        match done.await {
            Ok(outcome) => outcome,
            Err(_) => Err(SubmitError::SubmissionFailed(anyhow::anyhow!(
                "the submission was cancelled"
            ))),
        }
    }

    /// Abort an in-flight submission and the pending success reset, if any.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        state.cancel_submission();
        state.cancel_reset_timer();
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_lock() {
            state.cancel_submission();
            state.cancel_reset_timer();
        }
    }
}

// Tasks below only hold a weak handle: once the controller is gone there
// is nothing left to mutate.
async fn run_submission(
    state: Weak<Mutex<FormState>>,
    service: Arc<dyn SubscriptionService>,
    email: SubscriberEmail,
    settings: FormSettings,
    done: oneshot::Sender<Result<(), SubmitError>>,
) {
    let outcome =
        tokio::time::timeout(settings.submission_timeout, service.subscribe(&email))
            .await
            .context("subscription service did not answer in time")
            .and_then(|r| r.context("subscription service failed"));

    let Some(shared) = state.upgrade() else {
        return;
    };
    let mut state = shared.lock().await;
    state.submission = None;

    let outcome = match outcome {
        Ok(()) => {
            tracing::info!("newsletter subscription succeeded");
            state.status = SubmissionStatus::Succeeded;
            state.error_reason = None;
            state.raw_input.clear();
            state.reset_timer = Some(schedule_reset(
                Arc::downgrade(&shared),
                settings.success_display_window,
            ));
            Ok(())
        }
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "newsletter subscription failed");
            state.fail(FailureReason::SubmissionFailed(format!("{:#}", e)));
            Err(SubmitError::SubmissionFailed(e))
        }
    };
    drop(state);

    // nobody may be waiting any more, the state above is what counts.
    let _ = done.send(outcome);
}

fn schedule_reset(state: Weak<Mutex<FormState>>, window: Duration) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            tokio::time::sleep(window).await;

            let Some(shared) = state.upgrade() else {
                return;
            };
            let mut state = shared.lock().await;
            if state.status == SubmissionStatus::Succeeded {
                state.status = SubmissionStatus::Idle;
                state.reset_timer = None;
                tracing::debug!("newsletter form reset to idle");
            }
        }
        .instrument(tracing::debug_span!("newsletter success reset")),
    )
}
