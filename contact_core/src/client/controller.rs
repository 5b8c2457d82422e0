//! Submission lifecycle for the contact form
//!
//! `Idle → Pending → Settled(Sent | Failed) → Idle`. The return to `Idle` is
//! a spawned timer tied to the identity of the submission that settled; a
//! newer submission aborts it, and a timer that still fires for an older
//! submission leaves the state alone.

use super::form::ContactForm;
use super::transport::{HttpRelayTransport, RelayTransport};
use crate::config::FormConfig;
use crate::models::{Field, FormValues};
use crate::validation::FieldErrors;
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const FEEDBACK_WINDOW: Duration = Duration::from_millis(5000);
pub const SENT_MESSAGE: &str = "Message Sent";
pub const FAILED_MESSAGE: &str = "Failed: Please try again later";
pub const SUBMIT_LABEL: &str = "Send Message";
pub const PENDING_LABEL: &str = "Sending...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    Failed,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Sent => SENT_MESSAGE,
            Outcome::Failed => FAILED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Pending,
    Settled(Outcome),
}

/// What a call to [`FormController::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request is already in flight; nothing was sent.
    Busy,
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    Settled(Outcome),
}

#[derive(Debug, Deserialize)]
struct RelayErrorBody {
    #[serde(default)]
    error: Option<String>,
}

struct Inner {
    form: ContactForm,
    state: SubmissionState,
    submission: Option<Uuid>,
    revert: Option<JoinHandle<()>>,
}

pub struct FormController<T> {
    inner: Arc<Mutex<Inner>>,
    transport: Arc<T>,
    feedback_window: Duration,
}

impl<T> Clone for FormController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            transport: self.transport.clone(),
            feedback_window: self.feedback_window,
        }
    }
}

impl FormController<HttpRelayTransport> {
    pub fn from_config(config: &FormConfig) -> Self {
        Self::new(HttpRelayTransport::new(config.relay_url.clone()))
            .with_feedback_window(Duration::from_millis(config.feedback_window_ms))
    }
}

impl<T: RelayTransport + 'static> FormController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                form: ContactForm::default(),
                state: SubmissionState::Idle,
                submission: None,
                revert: None,
            })),
            transport: Arc::new(transport),
            feedback_window: FEEDBACK_WINDOW,
        }
    }

    pub fn with_feedback_window(mut self, window: Duration) -> Self {
        self.feedback_window = window;
        self
    }

    pub fn set_value(&self, field: Field, value: impl Into<String>) {
        self.inner.lock().form.set_value(field, value);
    }

    pub fn blur(&self, field: Field) {
        self.inner.lock().form.blur(field);
    }

    pub fn values(&self) -> FormValues {
        self.inner.lock().form.values().clone()
    }

    /// Errors of touched fields only.
    pub fn visible_errors(&self) -> FieldErrors {
        self.inner.lock().form.visible_errors()
    }

    pub fn state(&self) -> SubmissionState {
        self.inner.lock().state
    }

    pub fn feedback(&self) -> Option<&'static str> {
        match self.state() {
            SubmissionState::Settled(outcome) => Some(outcome.message()),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.state() != SubmissionState::Pending
    }

    pub fn submit_label(&self) -> &'static str {
        if self.can_submit() {
            SUBMIT_LABEL
        } else {
            PENDING_LABEL
        }
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let (submission_id, body) = {
            let mut inner = self.inner.lock();

            if inner.state == SubmissionState::Pending {
                debug!("submit ignored while a request is in flight");
                return SubmitOutcome::Busy;
            }

            inner.form.touch_all();
            if !inner.form.is_valid() {
                return SubmitOutcome::Invalid(inner.form.visible_errors());
            }

            if let Some(revert) = inner.revert.take() {
                revert.abort();
            }

            let submission_id = Uuid::new_v4();
            inner.submission = Some(submission_id);
            inner.state = SubmissionState::Pending;
            (submission_id, inner.form.values().to_form_body())
        };

        let in_flight = InFlight {
            controller: self,
            submission_id,
            settled: false,
        };

        debug!(submission = %submission_id, "posting contact form");
        let outcome = match self.transport.post_form(body).await {
            Ok(reply) if reply.is_success() => Outcome::Sent,
            Ok(reply) => {
                let detail = serde_json::from_str::<RelayErrorBody>(&reply.body)
                    .ok()
                    .and_then(|body| body.error);
                warn!(
                    submission = %submission_id,
                    status = reply.status,
                    error = ?detail,
                    "relay rejected contact form"
                );
                Outcome::Failed
            }
            Err(err) => {
                warn!(submission = %submission_id, error = %err, "relay request failed");
                Outcome::Failed
            }
        };

        in_flight.settle(outcome);
        SubmitOutcome::Settled(outcome)
    }

    fn settle(&self, submission_id: Uuid, outcome: Outcome) {
        let mut inner = self.inner.lock();
        if inner.submission != Some(submission_id) {
            return;
        }

        inner.state = SubmissionState::Settled(outcome);
        if outcome == Outcome::Sent {
            inner.form.reset();
        }
        info!(submission = %submission_id, outcome = ?outcome, "contact form settled");

        let Ok(runtime) = Handle::try_current() else {
            inner.state = SubmissionState::Idle;
            return;
        };

        let weak = Arc::downgrade(&self.inner);
        let window = self.feedback_window;
        inner.revert = Some(runtime.spawn(async move {
            tokio::time::sleep(window).await;
            expire(&weak, submission_id);
        }));
    }
}

/// A submission waiting on the transport. Dropped before it settles (the
/// caller timed out or lost a `select!`), it settles as failed.
struct InFlight<'a, T: RelayTransport + 'static> {
    controller: &'a FormController<T>,
    submission_id: Uuid,
    settled: bool,
}

impl<T: RelayTransport + 'static> InFlight<'_, T> {
    fn settle(mut self, outcome: Outcome) {
        self.settled = true;
        self.controller.settle(self.submission_id, outcome);
    }
}

impl<T: RelayTransport + 'static> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(submission = %self.submission_id, "contact form submission abandoned");
            self.controller.settle(self.submission_id, Outcome::Failed);
        }
    }
}

fn expire(inner: &Weak<Mutex<Inner>>, submission_id: Uuid) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut inner = inner.lock();
    if inner.submission == Some(submission_id)
        && matches!(inner.state, SubmissionState::Settled(_))
    {
        inner.state = SubmissionState::Idle;
        inner.revert = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::{TransportError, TransportReply};
    use crate::validation::{EMAIL_INVALID, MESSAGE_REQUIRED};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeTransport {
        bodies: Mutex<Vec<String>>,
        replies: Mutex<VecDeque<Result<TransportReply, TransportError>>>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeTransport {
        fn replying(replies: Vec<Result<TransportReply, TransportError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Self::default()
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl RelayTransport for FakeTransport {
        async fn post_form(&self, body: String) -> Result<TransportReply, TransportError> {
            self.bodies.lock().push(body);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies.lock().pop_front().unwrap_or_else(|| Ok(ok_reply()))
        }
    }

    fn ok_reply() -> TransportReply {
        TransportReply {
            status: 200,
            body: r#"{"success":true,"response":{"id":"abc"}}"#.to_string(),
        }
    }

    fn failed_reply() -> TransportReply {
        TransportReply {
            status: 500,
            body: r#"{"error":"quota exceeded"}"#.to_string(),
        }
    }

    fn fill<T: RelayTransport + 'static>(controller: &FormController<T>) {
        controller.set_value(Field::Name, "Ada");
        controller.set_value(Field::Email, "ada@example.com");
        controller.set_value(Field::Message, "Hi");
    }

    fn calls(controller: &FormController<FakeTransport>) -> usize {
        controller.transport.bodies.lock().len()
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_submission_resets_and_reverts() {
        let controller = FormController::new(FakeTransport::default());
        fill(&controller);

        let outcome = controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Settled(Outcome::Sent));
        assert_eq!(controller.state(), SubmissionState::Settled(Outcome::Sent));
        assert_eq!(controller.feedback(), Some(SENT_MESSAGE));
        assert_eq!(controller.values(), FormValues::default());
        assert!(controller.visible_errors().is_empty());
        assert_eq!(
            controller.transport.bodies.lock().as_slice(),
            ["user_name=Ada&user_email=ada%40example.com&message=Hi"]
        );

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(controller.state(), SubmissionState::Settled(Outcome::Sent));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(controller.state(), SubmissionState::Idle);
        assert_eq!(controller.feedback(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_submission_keeps_values() {
        let controller = FormController::new(FakeTransport::replying(vec![Ok(failed_reply())]));
        fill(&controller);

        let outcome = controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Settled(Outcome::Failed));
        assert_eq!(controller.feedback(), Some(FAILED_MESSAGE));
        assert_eq!(controller.values(), FormValues::new("Ada", "ada@example.com", "Hi"));

        tokio::time::sleep(FEEDBACK_WINDOW + Duration::from_millis(1)).await;
        assert_eq!(controller.state(), SubmissionState::Idle);
        assert_eq!(controller.values().name, "Ada");
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_a_failure() {
        let unreachable = reqwest::Client::new()
            .post("not a url")
            .send()
            .await
            .unwrap_err();
        let controller = FormController::new(FakeTransport::replying(vec![
            Err(TransportError::Request(unreachable)),
            Ok(TransportReply {
                status: 502,
                body: "<html>bad gateway</html>".to_string(),
            }),
        ]));
        fill(&controller);

        assert_eq!(controller.submit().await, SubmitOutcome::Settled(Outcome::Failed));
        assert_eq!(controller.submit().await, SubmitOutcome::Settled(Outcome::Failed));
        assert_eq!(controller.feedback(), Some(FAILED_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_makes_no_request() {
        let controller = FormController::new(FakeTransport::default());
        controller.set_value(Field::Name, "Ada");
        controller.set_value(Field::Email, "ada.example.com");

        assert!(controller.visible_errors().is_empty());

        match controller.submit().await {
            SubmitOutcome::Invalid(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[&Field::Email], EMAIL_INVALID);
                assert_eq!(errors[&Field::Message], MESSAGE_REQUIRED);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        assert_eq!(calls(&controller), 0);
        assert_eq!(controller.state(), SubmissionState::Idle);
        assert_eq!(controller.visible_errors().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_pending_is_ignored() {
        let gate = Arc::new(Notify::new());
        let controller = FormController::new(FakeTransport::gated(gate.clone()));
        fill(&controller);

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        });

        while controller.state() != SubmissionState::Pending {
            tokio::task::yield_now().await;
        }
        assert!(!controller.can_submit());
        assert_eq!(controller.submit_label(), PENDING_LABEL);

        assert_eq!(controller.submit().await, SubmitOutcome::Busy);
        assert_eq!(calls(&controller), 1);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Settled(Outcome::Sent));
        assert_eq!(calls(&controller), 1);
        assert!(controller.can_submit());
        assert_eq!(controller.submit_label(), SUBMIT_LABEL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_revert_does_not_override_newer_submission() {
        let controller = FormController::new(FakeTransport::replying(vec![
            Ok(failed_reply()),
            Ok(ok_reply()),
        ]));
        fill(&controller);

        assert_eq!(controller.submit().await, SubmitOutcome::Settled(Outcome::Failed));

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(controller.submit().await, SubmitOutcome::Settled(Outcome::Sent));

        // The first submission's window would have closed here.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(controller.state(), SubmissionState::Settled(Outcome::Sent));

        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert_eq!(controller.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_submission_does_not_lock_the_form() {
        let gate = Arc::new(Notify::new());
        let controller = FormController::new(FakeTransport::gated(gate.clone()));
        fill(&controller);

        let abandoned = tokio::time::timeout(Duration::from_millis(100), controller.submit()).await;
        assert!(abandoned.is_err());
        assert_eq!(calls(&controller), 1);
        assert_eq!(controller.state(), SubmissionState::Settled(Outcome::Failed));
        assert_eq!(controller.values().name, "Ada");

        tokio::time::sleep(FEEDBACK_WINDOW + Duration::from_millis(1)).await;
        assert_eq!(controller.state(), SubmissionState::Idle);

        gate.notify_one();
        assert_eq!(controller.submit().await, SubmitOutcome::Settled(Outcome::Sent));
        assert_eq!(calls(&controller), 2);
    }

    #[test]
    fn test_from_config_uses_window() {
        let config = FormConfig {
            relay_url: "http://localhost:3000/contact".to_string(),
            feedback_window_ms: 1200,
        };
        let controller = FormController::from_config(&config);
        assert_eq!(controller.feedback_window, Duration::from_millis(1200));
        assert_eq!(controller.state(), SubmissionState::Idle);
    }
}
