// Wire types for the contacts REST API.
//
// Field names follow the server's JSON exactly. Unknown fields are
// ignored so additive server changes don't break decoding.

use serde::{Deserialize, Serialize};

/// User record as returned by signup/login/current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Response of `POST /users/signup` and `POST /users/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: UserDto,
    pub token: String,
}

/// Contact record as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDto {
    pub id: String,
    pub name: String,
    pub number: String,
}

/// Body of `POST /contacts` and `PATCH /contacts/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactPayload<'a> {
    pub name: &'a str,
    pub number: &'a str,
}

/// Error body shape. The server uses `message`; some gateways use `error`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_ignores_unknown_fields() {
        let user: UserDto = serde_json::from_value(json!({
            "name": "A",
            "email": "a@b.com",
            "subscription": "pro"
        }))
        .unwrap();
        assert_eq!(user.name, "A");
        assert_eq!(user.email, "a@b.com");
    }

    #[test]
    fn auth_response_tolerates_partial_user() {
        let resp: AuthResponse =
            serde_json::from_value(json!({ "user": { "name": "A" }, "token": "T1" })).unwrap();
        assert_eq!(resp.user.name, "A");
        assert!(resp.user.email.is_empty());
        assert_eq!(resp.token, "T1");
    }
}
