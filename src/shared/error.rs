//! Usage: Error types for outbound API calls and session transitions.

use serde_json::Value;

/// Any failure of an outbound HTTP call. Never retried or recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("REQUEST_INVALID_URL: {0}")]
    InvalidUrl(String),
    #[error("REQUEST_TIMEOUT: {0}")]
    Timeout(String),
    #[error("REQUEST_CONNECT_FAILED: {0}")]
    Connect(String),
    #[error("REQUEST_TRANSPORT: {0}")]
    Transport(String),
    #[error("REQUEST_HTTP_{status}: {message}")]
    Status { status: u16, message: String },
    #[error("REQUEST_DECODE: {0}")]
    Decode(String),
    #[error("REQUEST_CLIENT_INIT: {0}")]
    Client(String),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Builds a `Status` error, preferring the server's own `error`/`message` text.
    pub(crate) fn from_status(status: u16, body: &Value) -> Self {
        let message = ["error", "message"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| match body {
                Value::String(text) if !text.trim().is_empty() => text.trim().to_string(),
                _ => format!("server responded with status {status}"),
            });
        Self::Status { status, message }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(err.to_string());
        }
        if err.is_connect() {
            return Self::Connect(err.to_string());
        }
        if err.is_builder() {
            return Self::InvalidUrl(err.to_string());
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("SESSION_STORAGE: {0}")]
    Storage(String),
    #[error("SESSION_CORRUPT_PROFILE: stored user is not valid JSON: {0}")]
    CorruptProfile(String),
    #[error("SESSION_INVALID_SERVER_URL: server url is required")]
    InvalidServerUrl,
    #[error("SESSION_NOT_AUTHENTICATED: login required")]
    NotAuthenticated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_server_error_field() {
        let body = serde_json::json!({ "error": "Invalid credentials" });
        let err = RequestError::from_status(401, &body);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "REQUEST_HTTP_401: Invalid credentials");
    }

    #[test]
    fn status_error_falls_back_to_text_then_generic_message() {
        let text = RequestError::from_status(502, &Value::String("Bad Gateway".to_string()));
        assert_eq!(text.to_string(), "REQUEST_HTTP_502: Bad Gateway");

        let generic = RequestError::from_status(500, &Value::Null);
        assert_eq!(
            generic.to_string(),
            "REQUEST_HTTP_500: server responded with status 500"
        );
    }

    #[test]
    fn session_error_wraps_request_error_transparently() {
        let err: SessionError = RequestError::Timeout("deadline".to_string()).into();
        assert_eq!(err.to_string(), "REQUEST_TIMEOUT: deadline");
    }
}
