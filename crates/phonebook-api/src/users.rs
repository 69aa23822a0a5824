// User endpoints
//
// Signup and login are anonymous and return `{user, token}`. Logout and
// current-user require the bearer token of the session they act on.

use secrecy::ExposeSecret;
use serde_json::json;
use tracing::debug;

use crate::auth::{BearerToken, LoginCredentials, SignupCredentials};
use crate::client::PhonebookClient;
use crate::error::Error;
use crate::models::{AuthResponse, UserDto};

impl PhonebookClient {
    /// Register a new account.
    ///
    /// `POST /users/signup` with `{name, email, password}`
    pub async fn signup(&self, credentials: &SignupCredentials) -> Result<AuthResponse, Error> {
        debug!(email = %credentials.email, "signing up");
        let body = json!({
            "name": credentials.name,
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });
        self.post("users/signup", &body, None).await
    }

    /// Authenticate with email and password.
    ///
    /// `POST /users/login` with `{email, password}`
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, Error> {
        debug!(email = %credentials.email, "logging in");
        let body = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });
        self.post("users/login", &body, None).await
    }

    /// Invalidate the token server-side.
    ///
    /// `POST /users/logout`
    pub async fn logout(&self, token: &BearerToken) -> Result<(), Error> {
        debug!("logging out");
        self.post_no_body("users/logout", Some(token)).await
    }

    /// Fetch the user the token belongs to.
    ///
    /// `GET /users/current`
    pub async fn current_user(&self, token: &BearerToken) -> Result<UserDto, Error> {
        debug!("fetching current user");
        self.get("users/current", Some(token)).await
    }
}
