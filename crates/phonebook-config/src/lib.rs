//! Shared configuration for phonebook tools.
//!
//! TOML profiles layered with `PHONEBOOK_*` environment overrides,
//! persisted session tokens (file or system keyring), and translation to
//! `phonebook_core::SessionConfig`.

mod token;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use phonebook_core::{
    DEFAULT_BASE_URL, LogoutPolicy, RefreshFailurePolicy, SessionConfig, TlsVerification,
};

pub use token::{TOKEN_ENV, TokenStore, TokenStoreKind, resolve_token};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{name}'")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

pub const DEFAULT_PROFILE: &str = "default";

impl Config {
    /// Name of the profile to use, honoring an explicit choice first.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.into())
    }

    /// Look up a profile.
    ///
    /// The default profile always resolves (to built-in values when it is
    /// not in the file); any other missing name is an error.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == DEFAULT_PROFILE => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named service profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Email remembered from the last login.
    pub email: Option<String>,

    /// Where the session token is kept.
    #[serde(default)]
    pub token_store: TokenStoreKind,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    #[serde(default)]
    pub logout_policy: LogoutPolicy,

    #[serde(default)]
    pub refresh_failure_policy: RefreshFailurePolicy,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email: None,
            token_store: TokenStoreKind::default(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            logout_policy: LogoutPolicy::default(),
            refresh_failure_policy: RefreshFailurePolicy::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

/// Profile names double as token file names.
pub fn validate_profile_name(name: &str) -> Result<(), ConfigError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            field: "profile".into(),
            reason: format!("'{name}' may only contain letters, digits, '-' and '_'"),
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "phonebook", "phonebook")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding file-stored session tokens.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("phonebook");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` layered over defaults and `PHONEBOOK_*` env
/// vars (`__` separates nested keys, e.g. `PHONEBOOK_DEFAULTS__TIMEOUT`).
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PHONEBOOK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    tracing::debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Translation to core ─────────────────────────────────────────────

/// Build a `SessionConfig` from a profile. `default_timeout` applies when
/// the profile has none.
pub fn profile_to_session_config(
    profile: &Profile,
    default_timeout: u64,
) -> Result<SessionConfig, ConfigError> {
    let base_url: url::Url = profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(SessionConfig {
        base_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(default_timeout)),
        logout_policy: profile.logout_policy,
        refresh_failure_policy: profile.refresh_failure_policy,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.output, "table");
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn file_profiles_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "staging"

[defaults]
output = "json"

[profiles.staging]
base_url = "https://staging.example.com"
email = "a@b.com"
token_store = "keyring"
logout_policy = "require-server"
timeout = 5
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.active_profile_name(None), "staging");
        assert_eq!(config.active_profile_name(Some("other")), "other");
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.timeout, 30);

        let profile = config.profile("staging").unwrap();
        assert_eq!(profile.email.as_deref(), Some("a@b.com"));
        assert_eq!(profile.token_store, TokenStoreKind::Keyring);
        assert_eq!(profile.logout_policy, LogoutPolicy::RequireServer);
        assert_eq!(
            profile.refresh_failure_policy,
            RefreshFailurePolicy::KeepSession
        );
    }

    #[test]
    fn default_profile_resolves_without_file_entry() {
        let config = Config::default();
        let profile = config.profile(DEFAULT_PROFILE).unwrap();
        assert_eq!(profile.base_url, DEFAULT_BASE_URL);
        assert!(matches!(
            config.profile("missing"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "local".into(),
            Profile {
                base_url: "http://localhost:3000".into(),
                insecure: Some(true),
                ..Profile::default()
            },
        );
        save_config_to(&path, &config).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, config.profiles);
    }

    #[test]
    fn profile_translates_to_session_config() {
        let profile = Profile {
            base_url: "http://localhost:3000".into(),
            insecure: Some(true),
            logout_policy: LogoutPolicy::RequireServer,
            ..Profile::default()
        };
        let session = profile_to_session_config(&profile, 12).unwrap();
        assert_eq!(session.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(session.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(session.timeout, Duration::from_secs(12));
        assert_eq!(session.logout_policy, LogoutPolicy::RequireServer);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let profile = Profile {
            base_url: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_session_config(&profile, 30).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "base_url"));
    }

    #[test]
    fn profile_names_are_restricted() {
        assert!(validate_profile_name("work-2").is_ok());
        assert!(validate_profile_name("a_b").is_ok());
        assert!(validate_profile_name("").is_err());
        assert!(validate_profile_name("../etc").is_err());
    }
}
