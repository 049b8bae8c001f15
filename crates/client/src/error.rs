//! Error types for the marketplace API client.

use thiserror::Error;

use crate::session::SessionError;

/// Errors that can occur when calling the marketplace API.
///
/// Every failure of [`ApiClient`](crate::http::ApiClient) is one of these; the
/// client never swallows an error and never hands back an untyped one.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session token is available. The request was not sent.
    #[error("not signed in")]
    Unauthenticated,

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Numeric status code.
        status: u16,
        /// Response body text, or the status line when the body is empty.
        body: String,
    },

    /// The request could not reach the server or the response could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response claimed JSON but did not decode into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built (bad header value, bad endpoint).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The server accepted a session change that could not be stored locally.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// HTTP status, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the session is missing or was rejected by the server.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Http { status: 401, .. })
    }

    /// Message suitable for showing to the person using the app.
    ///
    /// Uses the server's `message` field when the body is a JSON error object.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated | Self::Http { status: 401, .. } => {
                "Your session has ended. Please log in again.".to_string()
            }
            Self::Http { body, .. } => server_message(body).unwrap_or_else(|| body.clone()),
            Self::Network(_) => {
                "Could not reach the marketplace. Check your connection and try again.".to_string()
            }
            Self::Decode(_) => "The marketplace sent a response we could not read.".to_string(),
            Self::InvalidRequest(reason) => reason.clone(),
            Self::Session(e) => format!(
                "Your session could not be saved to {}. Check that the location is writable.",
                e.location()
            ),
        }
    }
}

/// Extract `message` (or `error`) from a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key)?.as_str().map(str::to_owned))
}
