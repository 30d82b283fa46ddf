use risk_flow::SessionSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateFieldRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// `resolved` or `ignored`
    pub outcome: &'static str,
    #[serde(flatten)]
    pub session: SessionSnapshot,
}
