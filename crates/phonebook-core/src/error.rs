// ── Core error types ──
//
// Operations never return transport errors. Every failure path builds an
// `ErrorInfo` (message + HTTP-ish status + optional server body), which
// the front end can classify by `kind` or `status`. `CoreError` covers the
// few failures that happen before any operation runs.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Message used when an operation needs a session and none exists.
pub const NO_TOKEN_MESSAGE: &str = "No token provided";

/// Status reported for requests aborted by logout.
pub const CANCELLED_STATUS: u16 = 499;

/// Status reported when no response was received.
pub const DEFAULT_STATUS: u16 = 500;

/// Failure classification, derived from the HTTP status when there is one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or rejected token (401).
    Unauthorized,
    /// Request rejected by the server (other 4xx).
    Validation,
    /// Server-side failure (5xx) or an unreadable success body.
    Server,
    /// No response: connection failure or timeout.
    Network,
    /// Aborted locally because the session ended.
    Cancelled,
}

impl ErrorKind {
    /// Classify a server response status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            400..=499 => Self::Validation,
            _ => Self::Server,
        }
    }
}

/// Structured failure value every operation resolves to.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message} (status {status})")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>, status: u16) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
            details: None,
        }
    }

    /// The guard failure for operations that require a session.
    pub fn no_token() -> Self {
        Self::new(ErrorKind::Unauthorized, NO_TOKEN_MESSAGE, 401)
    }

    /// A request dropped because its session ended.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "Request cancelled", CANCELLED_STATUS)
    }

    /// Normalize an adapter error.
    ///
    /// The server's `message` (or `error`) field wins; otherwise `fallback`
    /// is used. Failures without a response keep status 500 and record the
    /// cause under `details.cause`.
    pub fn from_api(err: &phonebook_api::Error, fallback: &str) -> Self {
        use phonebook_api::Error as ApiError;

        match err {
            ApiError::Api {
                status,
                message,
                details,
            } => Self {
                kind: ErrorKind::from_status(*status),
                message: message.clone().unwrap_or_else(|| fallback.to_owned()),
                status: *status,
                details: details.clone(),
            },
            ApiError::Transport(e) if e.status().is_some() => {
                let status = e.status().map_or(DEFAULT_STATUS, |s| s.as_u16());
                Self::new(ErrorKind::from_status(status), fallback, status).with_cause(err)
            }
            ApiError::Transport(e) if e.is_timeout() => {
                let mut info = Self::new(ErrorKind::Network, fallback, DEFAULT_STATUS);
                info.details = Some(json!({ "cause": err.to_string(), "timeout": true }));
                info
            }
            ApiError::Transport(_) | ApiError::InvalidUrl(_) | ApiError::Tls(_) => {
                Self::new(ErrorKind::Network, fallback, DEFAULT_STATUS).with_cause(err)
            }
            ApiError::InvalidToken(_) => {
                Self::new(ErrorKind::Unauthorized, fallback, 401).with_cause(err)
            }
            ApiError::InvalidId(_) => {
                Self::new(ErrorKind::Validation, fallback, 400).with_cause(err)
            }
            ApiError::Deserialization { .. } => {
                Self::new(ErrorKind::Server, fallback, DEFAULT_STATUS).with_cause(err)
            }
        }
    }

    fn with_cause(mut self, cause: &phonebook_api::Error) -> Self {
        self.details = Some(json!({ "cause": cause.to_string() }));
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }

    /// Whether the request ran out of time (a `Network` failure).
    pub fn is_timeout(&self) -> bool {
        self.details
            .as_ref()
            .and_then(|d| d.get("timeout"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

/// Failures raised while building a [`Controller`](crate::Controller).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<phonebook_api::Error> for CoreError {
    fn from(err: phonebook_api::Error) -> Self {
        match err {
            phonebook_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid base URL: {e}"),
            },
            phonebook_api::Error::Tls(msg) => CoreError::Config { message: msg },
            other => CoreError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_classification() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
    }

    #[test]
    fn server_message_wins_over_fallback() {
        let err = phonebook_api::Error::Api {
            status: 400,
            message: Some("Number already exists".into()),
            details: Some(json!({ "message": "Number already exists" })),
        };
        let info = ErrorInfo::from_api(&err, "Failed to add contact");
        assert_eq!(info.kind, ErrorKind::Validation);
        assert_eq!(info.message, "Number already exists");
        assert_eq!(info.status, 400);
        assert!(info.details.is_some());
    }

    #[test]
    fn fallback_used_without_server_message() {
        let err = phonebook_api::Error::Api {
            status: 500,
            message: None,
            details: None,
        };
        let info = ErrorInfo::from_api(&err, "Failed to fetch contacts");
        assert_eq!(info.message, "Failed to fetch contacts");
        assert_eq!(info.kind, ErrorKind::Server);
        assert_eq!(info.status, 500);
    }

    #[test]
    fn unreadable_body_is_server_error_with_cause() {
        let err = phonebook_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };
        let info = ErrorInfo::from_api(&err, "Login failed");
        assert_eq!(info.kind, ErrorKind::Server);
        assert_eq!(info.status, DEFAULT_STATUS);
        assert_eq!(info.message, "Login failed");
        assert!(info.details.unwrap()["cause"].is_string());
    }

    #[test]
    fn unusable_id_is_validation_failure() {
        let err = phonebook_api::Error::InvalidId("..".into());
        let info = ErrorInfo::from_api(&err, "Failed to delete contact");
        assert_eq!(info.kind, ErrorKind::Validation);
        assert_eq!(info.status, 400);
        assert_eq!(info.message, "Failed to delete contact");
    }

    #[test]
    fn no_token_guard() {
        let info = ErrorInfo::no_token();
        assert!(info.is_unauthorized());
        assert_eq!(info.message, "No token provided");
        assert_eq!(info.status, 401);
        assert_eq!(info.to_string(), "No token provided (status 401)");
    }

    #[test]
    fn kind_round_trips_through_strings() {
        assert_eq!(ErrorKind::Cancelled.to_string(), "cancelled");
        assert_eq!("network".parse::<ErrorKind>().ok(), Some(ErrorKind::Network));
    }
}
