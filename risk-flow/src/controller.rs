//! Submission Controller – the request lifecycle state machine.
//!
//! ```text
//!            submit (valid)            reply / transport error
//!   Idle ─────────────────▶ Submitting ───────────────────────▶ Succeeded | Failed
//!     ▲  submit (invalid) ──────────────────────────────────────▶ Failed
//!     └──────────── next submit clears the previous outcome ◀──────────┘
//! ```
//!
//! A submit trigger that arrives while an attempt is `Submitting` is ignored, never queued.
//! The check and the transition into `Submitting` happen under one lock with no await in
//! between, so two triggers can never both get through.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use crate::{
    classifier::{RiskTier, classify},
    client::{PredictionClient, PredictionResponse, ServiceReply},
    config::ResponsePolicy,
    form::{FormState, PredictionRequest},
    validator::validate,
};

pub const VALIDATION_MESSAGE: &str = "Please fill all required fields";
pub const TRANSPORT_MESSAGE: &str = "Failed to connect to backend";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from backend";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    /// The service answered; the label is absent when the body carried none
    Succeeded(Option<String>),
    /// User-facing error message
    Failed(String),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    pub fn result(&self) -> Option<&str> {
        match self {
            SubmissionState::Succeeded(result) => result.as_deref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Tier of a successful result that carries a label (an empty label classifies as `Low`)
    pub fn tier(&self) -> Option<RiskTier> {
        self.result().map(classify)
    }
}

/// What a submit trigger did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The attempt ran to a terminal state
    Resolved(SubmissionState),
    /// Another attempt was already in flight; nothing happened
    Ignored,
}

pub struct SubmissionController {
    client: Arc<dyn PredictionClient>,
    policy: ResponsePolicy,
    state: Arc<Mutex<SubmissionState>>,
}

impl SubmissionController {
    pub fn new(client: Arc<dyn PredictionClient>, policy: ResponsePolicy) -> Self {
        Self {
            client,
            policy,
            state: Arc::new(Mutex::new(SubmissionState::Idle)),
        }
    }

    pub fn state(&self) -> SubmissionState {
        lock(&self.state).clone()
    }

    /// Run one submission attempt against `form`.
    ///
    /// The request is built from `form` as it is now; later edits only affect later
    /// attempts. There is no timeout and no retry.
    pub async fn submit(&self, form: &FormState) -> SubmitOutcome {
        let request = {
            let mut state = lock(&self.state);
            if state.is_submitting() {
                info!("Submission already in flight, ignoring trigger");
                return SubmitOutcome::Ignored;
            }

            // clear the previous outcome before re-entering the machine
            *state = SubmissionState::Idle;

            if let Err(e) = validate(form).into_result() {
                info!("Submission blocked: {}", e);
                *state = SubmissionState::Failed(VALIDATION_MESSAGE.to_string());
                return SubmitOutcome::Resolved(state.clone());
            }

            *state = SubmissionState::Submitting;
            PredictionRequest::from(form)
        };

        let in_flight = InFlight {
            state: self.state.clone(),
            settled: false,
        };

        info!("Submitting prediction request");
        let next = match self.client.send(&request).await {
            Ok(reply) => self.resolve_reply(reply),
            Err(e) => {
                warn!("Prediction service unreachable: {}", e);
                SubmissionState::Failed(TRANSPORT_MESSAGE.to_string())
            }
        };

        in_flight.settle(next.clone());
        info!(state = ?next, "Submission resolved");
        SubmitOutcome::Resolved(next)
    }

    fn resolve_reply(&self, reply: ServiceReply) -> SubmissionState {
        let parsed = PredictionResponse::parse(&reply.body);
        match (parsed, self.policy) {
            (Ok(PredictionResponse { result: Some(result), .. }), _) => {
                SubmissionState::Succeeded(Some(result))
            }
            (Ok(response), ResponsePolicy::Lenient) => {
                warn!(
                    status = reply.status,
                    service_error = ?response.error,
                    "Prediction response has no result; accepting it as success"
                );
                SubmissionState::Succeeded(None)
            }
            (Ok(response), ResponsePolicy::Strict) => SubmissionState::Failed(
                response
                    .error
                    .unwrap_or_else(|| UNEXPECTED_RESPONSE_MESSAGE.to_string()),
            ),
            (Err(e), ResponsePolicy::Lenient) => {
                warn!(
                    status = reply.status,
                    "Malformed prediction response ({}); accepting it as success", e
                );
                SubmissionState::Succeeded(None)
            }
            (Err(e), ResponsePolicy::Strict) => {
                warn!(status = reply.status, "Malformed prediction response: {}", e);
                SubmissionState::Failed(UNEXPECTED_RESPONSE_MESSAGE.to_string())
            }
        }
    }
}

fn lock(state: &Mutex<SubmissionState>) -> MutexGuard<'_, SubmissionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks an attempt as in flight. If the attempt's future is dropped before it settles,
/// the single-flight slot is released back to `Idle`.
struct InFlight {
    state: Arc<Mutex<SubmissionState>>,
    settled: bool,
}

impl InFlight {
    fn settle(mut self, next: SubmissionState) {
        *lock(&self.state) = next;
        self.settled = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.settled {
            let mut state = lock(&self.state);
            if state.is_submitting() {
                warn!("Submission abandoned before the service replied");
                *state = SubmissionState::Idle;
            }
        }
    }
}
