use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::decoder::DecodeError;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("Request validation failed: missing required fields {0:?}")]
    Validation(Vec<&'static str>),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cluster returned {status}: {}", describe(.error_type, .reason))]
    Status {
        status: StatusCode,
        error_type: Option<String>,
        reason: Option<String>,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe(error_type: &Option<String>, reason: &Option<String>) -> String {
    match (error_type, reason) {
        (Some(t), Some(r)) => format!("{} [{}]", t, r),
        (Some(t), None) => t.clone(),
        (None, Some(r)) => r.clone(),
        (None, None) => "no error details".to_string(),
    }
}

impl ClientError {
    /// Builds a status error from a non-2xx response body.
    ///
    /// Accepts both the structured `{"error": {"type", "reason"}}` shape and the
    /// legacy `{"error": "..."}` string shape. Bodies that are not JSON become
    /// the reason verbatim.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let (error_type, reason) = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => match map.get("error") {
                Some(Value::Object(err)) => (
                    err.get("type").and_then(Value::as_str).map(str::to_string),
                    err.get("reason").and_then(Value::as_str).map(str::to_string),
                ),
                Some(Value::String(reason)) => (None, Some(reason.clone())),
                _ => (None, None),
            },
            _ if body.is_empty() => (None, None),
            _ => (None, Some(String::from_utf8_lossy(body).into_owned())),
        };

        ClientError::Status {
            status,
            error_type,
            reason,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// True when the cluster reported the target index as missing.
    pub fn is_index_not_found(&self) -> bool {
        match self {
            ClientError::Status {
                status,
                error_type,
                ..
            } => {
                *status == StatusCode::NOT_FOUND
                    && error_type
                        .as_deref()
                        .map_or(true, |t| t == "index_not_found_exception")
            }
            _ => false,
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ClientError::Decode(_))
    }
}
