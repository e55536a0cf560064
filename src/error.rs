use crate::harness::FixtureState;
use esfixture_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Client construction failed: {0}")]
    Construction(#[source] ClientError),

    #[error("Cleanup of index {index} failed: {source}")]
    Cleanup {
        index: String,
        #[source]
        source: ClientError,
    },

    #[error("Provisioning failed at {step}: {source}")]
    Provisioning {
        step: String,
        #[source]
        source: ClientError,
    },

    #[error("Expected acknowledgment for index {index}, got null")]
    NullAcknowledgment { index: String },

    #[error("Duplicate fixture document {doc_type}/{id}")]
    DuplicateDocument { doc_type: String, id: String },

    #[error("Invalid fixture transition from {from:?} to {to:?}")]
    InvalidTransition { from: FixtureState, to: FixtureState },

    #[error("Invalid mapping: {0}")]
    Mapping(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, HarnessError>;

impl From<serde_json::Error> for HarnessError {
    fn from(e: serde_json::Error) -> Self {
        HarnessError::Json(e.to_string())
    }
}

impl HarnessError {
    /// The client error underneath, if any.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            HarnessError::Construction(e)
            | HarnessError::Cleanup { source: e, .. }
            | HarnessError::Provisioning { source: e, .. } => Some(e),
            _ => None,
        }
    }

    /// True when strict decoding rejected a response somewhere in setup.
    pub fn is_decode(&self) -> bool {
        self.client_error().is_some_and(ClientError::is_decode)
    }
}
