use thiserror::Error;

/// Top-level error type for the `phonebook-api` crate.
///
/// Covers every failure mode of the HTTP adapter: transport, URL
/// construction, non-2xx responses, and payload decoding.
/// `phonebook-core` normalizes these into `ErrorInfo` values.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client builder failure.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The bearer token cannot be encoded as a header value.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    /// A resource id that cannot name a single path segment (`""`, `.`, `..`).
    #[error("Invalid resource id: {0:?}")]
    InvalidId(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response from the server.
    ///
    /// `message` is taken from the body's `message` field, falling back to
    /// its `error` field. `details` holds the parsed JSON body, if any.
    #[error("API error (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
        details: Option<serde_json::Value>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status carried by this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the server rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if no response was received at all.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// Returns `true` for a timed-out request.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Server-provided message, if the response carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server-provided error body, if any.
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status_and_message() {
        let err = Error::Api {
            status: 400,
            message: Some("Number already exists".into()),
            details: None,
        };
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.server_message(), Some("Number already exists"));
        assert!(!err.is_unauthorized());
        assert!(!err.is_transient());
        assert_eq!(
            err.to_string(),
            "API error (HTTP 400): Number already exists"
        );
    }

    #[test]
    fn unauthorized_is_detected_by_status() {
        let err = Error::Api {
            status: 401,
            message: None,
            details: None,
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "API error (HTTP 401): no message");
    }
}
