use thiserror::Error;

use tabguard_core::{ClassificationResult, RequestTicket};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ClassificationCompleted {
        ticket: RequestTicket,
        result: ClassificationResult,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid classifier endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("http client setup failed: {0}")]
    Client(String),
}
