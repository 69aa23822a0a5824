//! CLI error types with miette diagnostics.
//!
//! Maps operation failures (`ErrorInfo`) and configuration errors into
//! user-facing errors with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use phonebook_config::ConfigError;
use phonebook_core::{CoreError, ErrorInfo, ErrorKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the contacts service: {message}")]
    #[diagnostic(
        code(phonebook::connection_failed),
        help(
            "Check the base URL and your network connection.\n\
             Try: phonebook config show"
        )
    )]
    ConnectionFailed { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(phonebook::timeout),
        help("Increase the timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Not logged in (profile '{profile}')")]
    #[diagnostic(code(phonebook::not_logged_in), help("Run: phonebook login"))]
    NotLoggedIn { profile: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(phonebook::auth_failed),
        help("Your session may have expired. Run: phonebook login")
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(phonebook::not_found),
        help("Run: phonebook {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(phonebook::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Request rejected (HTTP {status}): {message}")]
    #[diagnostic(code(phonebook::rejected))]
    Rejected { status: u16, message: String },

    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(phonebook::api_error))]
    ApiError { status: u16, message: String },

    #[error("Request cancelled")]
    #[diagnostic(code(phonebook::cancelled))]
    Cancelled,

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(phonebook::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(phonebook::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: phonebook config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(
        code(phonebook::config),
        help("Check the configuration file. Run: phonebook config show")
    )]
    Config(Box<ConfigError>),

    #[error("Internal error: {0}")]
    #[diagnostic(code(phonebook::internal))]
    Internal(String),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(phonebook::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotLoggedIn { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Rejected { .. }
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ErrorInfo → CliError mapping ─────────────────────────────────────

impl From<ErrorInfo> for CliError {
    fn from(err: ErrorInfo) -> Self {
        match err.kind {
            ErrorKind::Unauthorized => CliError::AuthFailed {
                message: err.message,
            },
            ErrorKind::Validation if err.status == 404 => CliError::NotFound {
                resource_type: "contact".into(),
                identifier: err.message,
                list_command: "contacts list".into(),
            },
            ErrorKind::Validation if err.status == 409 => CliError::Conflict {
                message: err.message,
            },
            ErrorKind::Validation => CliError::Rejected {
                status: err.status,
                message: err.message,
            },
            ErrorKind::Server => CliError::ApiError {
                status: err.status,
                message: err.message,
            },
            ErrorKind::Network if err.is_timeout() => CliError::Timeout,
            ErrorKind::Network => CliError::ConnectionFailed {
                message: err.message,
            },
            ErrorKind::Cancelled => CliError::Cancelled,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_errors_map_to_exit_codes() {
        let cases = [
            (ErrorInfo::no_token(), exit_code::AUTH),
            (ErrorInfo::new(ErrorKind::Validation, "Number already exists", 400), exit_code::USAGE),
            (ErrorInfo::new(ErrorKind::Validation, "Not found", 404), exit_code::NOT_FOUND),
            (ErrorInfo::new(ErrorKind::Validation, "Exists", 409), exit_code::CONFLICT),
            (ErrorInfo::new(ErrorKind::Server, "Failed to fetch contacts", 500), exit_code::GENERAL),
            (ErrorInfo::new(ErrorKind::Network, "Login failed", 500), exit_code::CONNECTION),
            (ErrorInfo::cancelled(), exit_code::GENERAL),
        ];
        for (info, code) in cases {
            let label = info.to_string();
            assert_eq!(CliError::from(info).exit_code(), code, "{label}");
        }
    }

    #[test]
    fn timeouts_have_their_own_code() {
        let mut info = ErrorInfo::new(ErrorKind::Network, "Failed to fetch contacts", 500);
        info.details = Some(serde_json::json!({ "cause": "timed out", "timeout": true }));
        assert_eq!(CliError::from(info).exit_code(), exit_code::TIMEOUT);
    }
}
