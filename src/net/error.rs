//! Transport-to-domain error translation for backend calls.
//!
//! ERROR HANDLING
//! ==============
//! A non-2xx response becomes [`ApiError::Status`] whose display text is the
//! server's own message, so callers can show it verbatim. Control flow keys
//! off [`ErrorKind`], never off message text.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Deserialize;

/// Structured error code the backend sends when an identity assertion has no
/// account yet and sign-up must collect a password.
pub const PASSWORD_REQUIRED_CODE: &str = "password_required";

/// Message the backend used before it sent [`PASSWORD_REQUIRED_CODE`].
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Password is required for email sign up";

/// Coarse classification of a failed backend call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network unreachable, timeout, or unreadable response.
    Transport,
    /// 401/403: bad or expired credentials.
    Unauthorized,
    /// The identity is valid but the account must be created via sign-up.
    NewUserRequiresPassword,
    /// 404.
    NotFound,
    /// 400/409/422: the server rejected the submitted data.
    Validation,
    /// 5xx.
    Server,
    /// Any other status.
    Other,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("{message}")]
    Status { status: u16, kind: ErrorKind, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ApiError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Status { kind, .. } => *kind,
            Self::Transport(_) | Self::Timeout | Self::Decode(_) | Self::ClientBuild(_) => ErrorKind::Transport,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build the domain error for a non-success response body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let code = parsed.as_ref().and_then(|b| b.code.clone());
        let message = parsed
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| status_fallback_message(status));
        let kind = classify(status, code.as_deref(), &message);
        Self::Status { status, kind, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Error body shapes the backend emits: `{message}`, `{detail}`, or `{error}`,
/// each optionally with a `code`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        [self.message, self.detail, self.error]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
    }
}

pub(crate) fn status_fallback_message(status: u16) -> String {
    format!("request failed with status {status}")
}

fn classify(status: u16, code: Option<&str>, message: &str) -> ErrorKind {
    if code == Some(PASSWORD_REQUIRED_CODE) || message.contains(PASSWORD_REQUIRED_MESSAGE) {
        return ErrorKind::NewUserRequiresPassword;
    }
    match status {
        401 | 403 => ErrorKind::Unauthorized,
        404 => ErrorKind::NotFound,
        400 | 409 | 422 => ErrorKind::Validation,
        500..=599 => ErrorKind::Server,
        _ => ErrorKind::Other,
    }
}
