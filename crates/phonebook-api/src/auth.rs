use std::fmt;

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Opaque bearer credential returned by signup/login.
///
/// Cloning is cheap and `Debug` never prints the secret. The token is
/// passed explicitly to every authenticated call; the client keeps no
/// default `Authorization` header.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    /// The raw token, for persistence and header construction.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Build the `Authorization` header value, marked sensitive so it is
    /// redacted from reqwest's debug output.
    pub(crate) fn header_value(&self) -> Result<HeaderValue, Error> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.expose()))
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(****)")
    }
}

impl PartialEq for BearerToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for BearerToken {}

impl From<String> for BearerToken {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for BearerToken {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Body of `POST /users/login`.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
}

/// Body of `POST /users/signup`.
#[derive(Debug, Clone)]
pub struct SignupCredentials {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let token = BearerToken::new("super-secret");
        assert_eq!(format!("{token:?}"), "BearerToken(****)");
    }

    #[test]
    fn header_value_is_bearer_and_sensitive() {
        let value = BearerToken::new("T1").header_value().unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer T1");
    }

    #[test]
    fn header_value_rejects_control_characters() {
        let result = BearerToken::new("bad\ntoken").header_value();
        assert!(matches!(result, Err(Error::InvalidToken(_))));
    }
}
