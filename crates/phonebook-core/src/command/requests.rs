// ── Operation request types ──

use secrecy::SecretString;

use phonebook_api::{LoginCredentials, SignupCredentials};

use crate::model::ContactId;

/// Credentials for `register`.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

/// Credentials for `login`.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

/// A contact to create. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub number: String,
}

/// Full replacement of an existing contact's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactUpdate {
    pub id: ContactId,
    pub name: String,
    pub number: String,
}

impl From<RegisterRequest> for SignupCredentials {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

impl From<LoginRequest> for LoginCredentials {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}
