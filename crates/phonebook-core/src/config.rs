// ── Runtime session configuration ──
//
// Describes *where* the contacts service lives and how the session reacts
// to server-side failures. Never touches disk: the CLI builds a
// `SessionConfig` from its profile and hands it in.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Public instance of the contacts service.
pub const DEFAULT_BASE_URL: &str = "https://connections-api.goit.global";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local development servers).
    DangerAcceptInvalid,
}

/// What `logout` does when the server call fails.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LogoutPolicy {
    /// Clear the local session no matter what the server says. The server
    /// failure is still reported to the caller.
    #[default]
    Always,
    /// Keep the session when the server rejects the logout.
    RequireServer,
}

/// What `refresh_user` does with the token when the server rejects it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RefreshFailurePolicy {
    /// Keep the token; only the error is recorded.
    #[default]
    KeepSession,
    /// Drop the session when the server answers 401.
    ClearOnUnauthorized,
}

/// Configuration for a single session against one service instance.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Service base URL.
    pub base_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    pub logout_policy: LogoutPolicy,
    pub refresh_failure_policy: RefreshFailurePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            logout_policy: LogoutPolicy::default(),
            refresh_failure_policy: RefreshFailurePolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Default configuration pointed at another base URL.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_public_instance() {
        let config = SessionConfig::default();
        assert_eq!(config.base_url.as_str(), "https://connections-api.goit.global/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.logout_policy, LogoutPolicy::Always);
        assert_eq!(config.refresh_failure_policy, RefreshFailurePolicy::KeepSession);
    }

    #[test]
    fn policies_parse_from_kebab_case() {
        assert_eq!(
            "require-server".parse::<LogoutPolicy>().ok(),
            Some(LogoutPolicy::RequireServer)
        );
        assert_eq!(
            "clear-on-unauthorized".parse::<RefreshFailurePolicy>().ok(),
            Some(RefreshFailurePolicy::ClearOnUnauthorized)
        );
        assert_eq!(LogoutPolicy::Always.to_string(), "always");
    }
}
