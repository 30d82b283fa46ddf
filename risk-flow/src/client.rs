use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::ClientConfig,
    error::{Result, RiskError},
    form::PredictionRequest,
};

/// A response that made it back from the prediction service, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: String,
}

/// Body returned by the prediction service.
///
/// On success the service sends `result` (and the raw class in `prediction`);
/// on bad input it answers 400 with only `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub prediction: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PredictionResponse {
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| RiskError::ResponseShape(e.to_string()))
    }
}

/// The network collaborator: one request in, one reply (or transport failure) out
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Any failure to reach the service or read its reply is a `RiskError::Transport`
    async fn send(&self, request: &PredictionRequest) -> Result<ServiceReply>;
}

/// `PredictionClient` that POSTs JSON over HTTP
#[derive(Clone)]
pub struct HttpPredictionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.endpoint.clone())
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn send(&self, request: &PredictionRequest) -> Result<ServiceReply> {
        debug!(endpoint = %self.endpoint, "Posting prediction request");

        // .json() sets Content-Type: application/json
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| RiskError::Transport(format!("prediction request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RiskError::Transport(format!("failed to read response body: {}", e)))?;

        debug!(status, bytes = body.len(), "Prediction service replied");
        Ok(ServiceReply { status, body })
    }
}
