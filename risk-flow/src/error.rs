use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unusable response body: {0}")]
    ResponseShape(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RiskError>;
