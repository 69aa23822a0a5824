//! CLI configuration: thin wrapper around `phonebook_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--profile, --base-url, --insecure, --timeout) and opens a session
//! with the profile's stored token.

use std::time::Duration;

use phonebook_config::{
    Config, ConfigError, Profile, TokenStore, profile_to_session_config, resolve_token,
};
use phonebook_core::{Controller, SessionConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use phonebook_config::{DEFAULT_PROFILE, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Look up a profile, listing the alternatives when it is missing.
pub fn profile(config: &Config, name: &str) -> Result<Profile, CliError> {
    config.profile(name).map_err(|err| match err {
        ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
            name,
            available: available_profiles(config),
        },
        other => other.into(),
    })
}

pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Translate a `Profile` + global flags into a `SessionConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_session_config(
    profile: &Profile,
    defaults_timeout: u64,
    global: &GlobalOpts,
) -> Result<SessionConfig, CliError> {
    let mut session = profile_to_session_config(profile, defaults_timeout)?;

    if let Some(ref url_str) = global.base_url {
        session.base_url = url_str.parse().map_err(|_| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }
    if global.insecure {
        session.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(seconds) = global.timeout {
        session.timeout = Duration::from_secs(seconds);
    }

    Ok(session)
}

// ── Session ─────────────────────────────────────────────────────────

/// Everything a service command needs: the controller with any stored
/// token restored, and where to persist token changes.
pub struct Session {
    pub controller: Controller,
    pub tokens: TokenStore,
    pub profile_name: String,
    pub profile: Profile,
}

impl Session {
    pub fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = load_config()?;
        let profile_name = active_profile_name(global, &config);
        let profile = profile(&config, &profile_name)?;

        let session_config = resolve_session_config(&profile, config.defaults.timeout, global)?;
        tracing::debug!(
            profile = %profile_name,
            base_url = %session_config.base_url,
            "opening session"
        );
        let controller = Controller::new(session_config)?;

        let tokens = TokenStore::for_profile(&profile_name, profile.token_store)?;
        if let Some(token) = resolve_token(&tokens)? {
            controller.restore_session(token);
        }

        Ok(Self {
            controller,
            tokens,
            profile_name,
            profile,
        })
    }

    /// Fail fast when no token is available.
    pub fn require_login(&self) -> Result<(), CliError> {
        if self.controller.store().is_logged_in() {
            Ok(())
        } else {
            Err(CliError::NotLoggedIn {
                profile: self.profile_name.clone(),
            })
        }
    }

    /// Persist the controller's current token, or clear the stored one.
    pub fn persist_token(&self) -> Result<(), CliError> {
        match self.controller.store().token() {
            Some(token) => self.tokens.save(&token)?,
            None => self.tokens.clear()?,
        }
        Ok(())
    }
}
