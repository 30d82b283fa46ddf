//! SubmissionRunner – convenience wrapper that owns the prediction client and the session
//! storage, so front ends can drive sessions by id.
//!
//! Every operation loads the session, applies exactly one operator intent, and returns.
//! Sessions are shared (`Arc<Session>`), so an edit arriving while the same session is
//! submitting lands on the live form without disturbing the request already sent.

use std::sync::Arc;
use tracing::info;

use crate::{
    client::{HttpPredictionClient, PredictionClient},
    config::{ClientConfig, ResponsePolicy},
    controller::SubmitOutcome,
    error::{Result, RiskError},
    form::FormState,
    session::{Session, SessionSnapshot},
    storage::SessionStorage,
};

#[derive(Clone)]
pub struct SubmissionRunner {
    client: Arc<dyn PredictionClient>,
    storage: Arc<dyn SessionStorage>,
    policy: ResponsePolicy,
}

impl SubmissionRunner {
    pub fn new(
        client: Arc<dyn PredictionClient>,
        storage: Arc<dyn SessionStorage>,
        policy: ResponsePolicy,
    ) -> Self {
        Self {
            client,
            storage,
            policy,
        }
    }

    /// Runner posting over HTTP to the configured endpoint
    pub fn from_config(config: &ClientConfig, storage: Arc<dyn SessionStorage>) -> Self {
        let client = Arc::new(HttpPredictionClient::from_config(config));
        Self::new(client, storage, config.response_policy)
    }

    pub async fn create(&self) -> Result<Arc<Session>> {
        let session = Arc::new(Session::new(self.client.clone(), self.policy));
        self.storage.save(session.clone()).await?;
        info!(session_id = %session.id, "Session created");
        Ok(session)
    }

    pub async fn load(&self, session_id: &str) -> Result<Arc<Session>> {
        self.storage
            .get(session_id)
            .await?
            .ok_or_else(|| RiskError::SessionNotFound(session_id.to_string()))
    }

    pub async fn update(&self, session_id: &str, name: &str, value: String) -> Result<FormState> {
        let session = self.load(session_id).await?;
        session.update(name, value)
    }

    pub async fn submit(&self, session_id: &str) -> Result<SubmitOutcome> {
        let session = self.load(session_id).await?;
        Ok(session.submit().await)
    }

    pub async fn snapshot(&self, session_id: &str) -> Result<SessionSnapshot> {
        Ok(self.load(session_id).await?.snapshot())
    }

    /// End a session. A submission still in flight finishes against the detached
    /// session and its outcome is dropped with it.
    pub async fn end(&self, session_id: &str) -> Result<()> {
        self.load(session_id).await?;
        self.storage.delete(session_id).await?;
        info!(session_id = %session_id, "Session ended");
        Ok(())
    }
}
