pub mod classifier;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod runner;
pub mod schema;
pub mod session;
pub mod storage;
pub mod validator;

// Re-export commonly used types
pub use classifier::{RiskTier, classify};
pub use client::{HttpPredictionClient, PredictionClient, PredictionResponse, ServiceReply};
pub use config::{ClientConfig, ResponsePolicy};
pub use controller::{
    SubmissionController, SubmissionState, SubmitOutcome, TRANSPORT_MESSAGE,
    UNEXPECTED_RESPONSE_MESSAGE, VALIDATION_MESSAGE,
};
pub use error::{Result, RiskError};
pub use form::{FormState, PredictionRequest};
pub use runner::SubmissionRunner;
pub use schema::{Choice, Domain, FieldDefinition, FieldKind, fields, lookup};
pub use session::{Session, SessionSnapshot};
pub use storage::{InMemorySessionStorage, SessionStorage};
pub use validator::{MANDATORY_FIELDS, ValidationResult, validate};
