use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::{
    classifier::RiskTier,
    client::PredictionClient,
    config::ResponsePolicy,
    controller::{SubmissionController, SubmissionState, SubmitOutcome},
    error::Result,
    form::FormState,
};

/// One operator's form and its submission lifecycle
pub struct Session {
    pub id: String,
    form: RwLock<FormState>,
    controller: SubmissionController,
}

/// Read-only view of a session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub form: FormState,
    pub submission: SubmissionState,
    pub tier: Option<RiskTier>,
    pub advisories: Vec<String>,
}

impl Session {
    pub fn new(client: Arc<dyn PredictionClient>, policy: ResponsePolicy) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), client, policy)
    }

    pub fn with_id(
        id: impl Into<String>,
        client: Arc<dyn PredictionClient>,
        policy: ResponsePolicy,
    ) -> Self {
        Self {
            id: id.into(),
            form: RwLock::new(FormState::init()),
            controller: SubmissionController::new(client, policy),
        }
    }

    pub fn form(&self) -> FormState {
        self.form
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn state(&self) -> SubmissionState {
        self.controller.state()
    }

    /// Replace the current form with one where `name` holds `value`
    pub fn update(&self, name: &str, value: impl Into<String>) -> Result<FormState> {
        let mut form = self
            .form
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let next = form.update(name, value)?;
        *form = next.clone();
        Ok(next)
    }

    /// Submit the form as it stands right now
    pub async fn submit(&self) -> SubmitOutcome {
        let snapshot = self.form();
        info!(session_id = %self.id, "Submit triggered");
        self.controller.submit(&snapshot).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let form = self.form();
        let submission = self.state();
        SessionSnapshot {
            session_id: self.id.clone(),
            advisories: form.advisories(),
            tier: submission.tier(),
            form,
            submission,
        }
    }
}
