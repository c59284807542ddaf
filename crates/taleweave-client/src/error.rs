//! Error taxonomy for calls to the story workflow service.

use std::time::Duration;

use thiserror::Error;

use crate::types::Operation;

/// Number of body characters kept when a response cannot be decoded.
pub const SNIPPET_LEN: usize = 200;

/// Every way a workflow call can fail. A failed call never yields partial data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("{operation} timed out after {}. The workflow may need more time to process.", describe_timeout(.timeout))]
    Timeout { operation: Operation, timeout: Duration },

    #[error("Could not connect to the story service at {url}. Please ensure it is running. ({message})")]
    ConnectionFailure { url: String, message: String },

    #[error("Story service returned an error: {status} - {body}")]
    HttpError { status: u16, body: String },

    #[error("Story service returned invalid JSON: {message}\nResponse: {snippet}")]
    MalformedResponse { message: String, snippet: String },
}

fn describe_timeout(timeout: &Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        return format!("{} seconds", timeout.as_secs());
    }

    format!("{} ms", timeout.as_millis())
}

impl TransportError {
    pub fn malformed(err: &serde_json::Error, body: &str) -> Self {
        TransportError::MalformedResponse {
            message: err.to_string(),
            snippet: body.chars().take(SNIPPET_LEN).collect(),
        }
    }

    pub fn from_reqwest(
        operation: Operation,
        url: &str,
        timeout: Duration,
        err: reqwest::Error,
    ) -> Self {
        if err.is_timeout() {
            return TransportError::Timeout { operation, timeout };
        }

        TransportError::ConnectionFailure {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}
