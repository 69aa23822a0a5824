// Persisted session tokens.
//
// One token per profile, kept either in a file under the platform data
// directory or in the system keyring. `PHONEBOOK_TOKEN` overrides both.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use phonebook_core::BearerToken;

use crate::{ConfigError, data_dir, validate_profile_name};

/// Environment variable that supplies a token directly.
pub const TOKEN_ENV: &str = "PHONEBOOK_TOKEN";

const KEYRING_SERVICE: &str = "phonebook";

/// Storage backend selected in a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    #[default]
    File,
    Keyring,
}

/// Where one profile's token lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStore {
    File { path: PathBuf },
    Keyring { profile: String },
}

impl TokenStore {
    /// Store for `profile_name` using the backend `kind`.
    pub fn for_profile(profile_name: &str, kind: TokenStoreKind) -> Result<Self, ConfigError> {
        validate_profile_name(profile_name)?;
        Ok(match kind {
            TokenStoreKind::File => Self::File {
                path: data_dir()
                    .join("tokens")
                    .join(format!("{profile_name}.token")),
            },
            TokenStoreKind::Keyring => Self::Keyring {
                profile: profile_name.into(),
            },
        })
    }

    /// Read the stored token, if any.
    pub fn load(&self) -> Result<Option<BearerToken>, ConfigError> {
        match self {
            Self::File { path } => match std::fs::read_to_string(path) {
                Ok(raw) => {
                    let raw = raw.trim();
                    Ok((!raw.is_empty()).then(|| BearerToken::new(raw)))
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
            Self::Keyring { profile } => match keyring_entry(profile)?.get_password() {
                Ok(secret) => Ok(Some(BearerToken::new(secret))),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(e.into()),
            },
        }
    }

    pub fn save(&self, token: &BearerToken) -> Result<(), ConfigError> {
        match self {
            Self::File { path } => write_private(path, token.expose())?,
            Self::Keyring { profile } => keyring_entry(profile)?.set_password(token.expose())?,
        }
        debug!(store = ?self, "session token saved");
        Ok(())
    }

    /// Remove the stored token. Clearing an empty store succeeds.
    pub fn clear(&self) -> Result<(), ConfigError> {
        match self {
            Self::File { path } => {
                if let Err(e) = std::fs::remove_file(path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        return Err(e.into());
                    }
                }
            }
            Self::Keyring { profile } => match keyring_entry(profile)?.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => return Err(e.into()),
            },
        }
        debug!(store = ?self, "session token cleared");
        Ok(())
    }
}

/// The token to start with: `PHONEBOOK_TOKEN` if set, else the stored one.
pub fn resolve_token(store: &TokenStore) -> Result<Option<BearerToken>, ConfigError> {
    if let Ok(raw) = std::env::var(TOKEN_ENV) {
        if !raw.trim().is_empty() {
            return Ok(Some(BearerToken::new(raw.trim())));
        }
    }
    store.load()
}

fn keyring_entry(profile: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile}/token"),
    )?)
}

/// Write a file readable only by the owner (on Unix).
fn write_private(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn file_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::File {
            path: dir.path().join("tokens").join("default.token"),
        };

        assert_eq!(store.load().unwrap(), None);

        store.save(&BearerToken::new("T1")).unwrap();
        assert_eq!(store.load().unwrap(), Some(BearerToken::new("T1")));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.token");
        let store = TokenStore::File { path: path.clone() };
        store.save(&BearerToken::new("T1")).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn blank_token_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.token");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(TokenStore::File { path }.load().unwrap(), None);
    }

    #[test]
    fn file_store_path_uses_profile_name() {
        let store = TokenStore::for_profile("work", TokenStoreKind::File).unwrap();
        match store {
            TokenStore::File { path } => assert!(path.ends_with("tokens/work.token")),
            TokenStore::Keyring { .. } => panic!("expected file store"),
        }
        assert!(TokenStore::for_profile("../x", TokenStoreKind::File).is_err());
    }
}
