//! Error types for the campaign API client.
//!
//! Every failure is normalized into an [`ApiError`] carrying a single
//! human-readable message, so callers can display one field without
//! knowing the backend's error schema.

use serde::Deserialize;
use thiserror::Error;

/// Fixed message for failures where no response was received at all.
pub const CONNECTIVITY_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

/// Message fragments the server uses for campaigns that are simply not in
/// the right lifecycle state yet. Errors matching these are expected during
/// preview orchestration and are suppressed from diagnostic logging.
const LIFECYCLE_CONFLICT_PHRASES: [&str; 5] = [
    "must be processed",
    "invalid state",
    "process the campaign",
    "draft",
    "already processed",
];

/// Errors produced by [`CampaignClient`](super::CampaignClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server responded with a non-success status.
    /// `message` is already normalized for display.
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// No response was received (DNS failure, refused connection, timeout).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// A response arrived but its body could not be decoded.
    #[error("failed to parse API response: {0}")]
    Decode(#[source] reqwest::Error),
}

// Error body shape used by the backend. Both fields are optional because
// FastAPI emits `detail` while some handlers emit `message`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
}

impl ApiError {
    /// Build a normalized error from a non-success response, consuming it.
    ///
    /// Message priority: body `message` field, body `detail` field, then a
    /// generic `Error {status}` fallback for empty or unparseable bodies.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = body
            .message
            .or(body.detail)
            .unwrap_or_else(|| format!("Error {status}"));
        ApiError::Status { status, message }
    }

    /// Wrap a transport-level failure (the request never got a response).
    pub fn transport(source: reqwest::Error) -> Self {
        ApiError::Network(source)
    }

    /// The user-facing message for this error.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Network(_) => CONNECTIVITY_MESSAGE.to_string(),
            ApiError::Decode(source) => source.to_string(),
        }
    }

    /// The HTTP status of this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a retry could plausibly succeed: no response at all,
    /// a server-side error (5xx), or rate limiting (429).
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => (500..=599).contains(status) || *status == 429,
            ApiError::Decode(_) => false,
        }
    }

    /// Whether this is an expected lifecycle conflict: a 400 whose message
    /// says the campaign is not in the right state yet. These are part of
    /// the normal preview flow, not genuine errors.
    pub fn is_lifecycle_conflict(&self) -> bool {
        match self {
            ApiError::Status {
                status: 400,
                message,
            } => {
                let lower = message.to_lowercase();
                LIFECYCLE_CONFLICT_PHRASES
                    .iter()
                    .any(|phrase| lower.contains(phrase))
            }
            _ => false,
        }
    }

    /// Whether this 400 specifically says processing already happened.
    /// The orchestrator treats this as step success rather than failure.
    /// Known fragility: a string contract, the server exposes no dedicated
    /// status code for it.
    pub fn is_already_processed(&self) -> bool {
        matches!(
            self,
            ApiError::Status { status: 400, message }
                if message.to_lowercase().contains("already processed")
        )
    }
}
