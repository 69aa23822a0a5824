#![allow(clippy::unwrap_used)]
// Integration tests for `PhonebookClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use phonebook_api::{
    BearerToken, ContactPayload, Error, LoginCredentials, PhonebookClient, SignupCredentials,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PhonebookClient) {
    let server = MockServer::start().await;
    let client = PhonebookClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn token() -> BearerToken {
    BearerToken::new("T1")
}

// ── User tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "name": "A", "email": "a@b.com" },
            "token": "T1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .login(&LoginCredentials {
            email: "a@b.com".into(),
            password: SecretString::from("secret1".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(resp.user.name, "A");
    assert_eq!(resp.token, "T1");
}

#[tokio::test]
async fn test_login_sends_no_authorization_header() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(|req: &Request| {
            if req.headers.contains_key("authorization") {
                ResponseTemplate::new(500)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({
                    "user": { "name": "A", "email": "a@b.com" },
                    "token": "T1"
                }))
            }
        })
        .mount(&server)
        .await;

    let result = client
        .login(&LoginCredentials {
            email: "a@b.com".into(),
            password: SecretString::from("secret1".to_owned()),
        })
        .await;
    assert!(result.is_ok(), "unexpected error: {result:?}");
}

#[tokio::test]
async fn test_signup_failure_extracts_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/users/signup"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "User already exists" })),
        )
        .mount(&server)
        .await;

    let result = client
        .signup(&SignupCredentials {
            name: "A".into(),
            email: "a@b.com".into(),
            password: SecretString::from("secret1".to_owned()),
        })
        .await;

    match result {
        Err(Error::Api {
            status,
            ref message,
            ref details,
        }) => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("User already exists"));
            assert_eq!(
                details.as_ref(),
                Some(&json!({ "message": "User already exists" }))
            );
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_field_used_when_message_absent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/current"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "jwt expired" })))
        .mount(&server)
        .await;

    let err = client.current_user(&token()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("jwt expired"));
}

#[tokio::test]
async fn test_logout_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/users/logout"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.logout(&token()).await.unwrap();
}

#[tokio::test]
async fn test_current_user() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/current"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "A", "email": "a@b.com" })),
        )
        .mount(&server)
        .await;

    let user = client.current_user(&token()).await.unwrap();
    assert_eq!(user.email, "a@b.com");
}

// ── Contact tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_contacts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "c1", "name": "Rosie Simpson", "number": "459-12-56" },
            { "id": "c2", "name": "Hermione Kline", "number": "443-89-12" }
        ])))
        .mount(&server)
        .await;

    let contacts = client.list_contacts(&token()).await.unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].id, "c1");
    assert_eq!(contacts[1].name, "Hermione Kline");
}

#[tokio::test]
async fn test_create_contact() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/contacts"))
        .and(body_json(json!({ "name": "Eden Clements", "number": "645-17-79" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "c3", "name": "Eden Clements", "number": "645-17-79"
        })))
        .mount(&server)
        .await;

    let created = client
        .create_contact(
            &token(),
            &ContactPayload {
                name: "Eden Clements",
                number: "645-17-79",
            },
        )
        .await
        .unwrap();
    assert_eq!(created.id, "c3");
}

#[tokio::test]
async fn test_update_contact_uses_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/contacts/c1"))
        .and(body_json(json!({ "name": "Rosie S.", "number": "111-222-3333" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1", "name": "Rosie S.", "number": "111-222-3333"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client
        .update_contact(
            &token(),
            "c1",
            &ContactPayload {
                name: "Rosie S.",
                number: "111-222-3333",
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Rosie S.");
}

#[tokio::test]
async fn test_delete_contact_ignores_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/contacts/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1", "name": "Rosie Simpson", "number": "459-12-56"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_contact(&token(), "c1").await.unwrap();
}

#[tokio::test]
async fn test_contact_id_stays_in_one_path_segment() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1", "name": "Rosie Simpson", "number": "459-12-56"
        })))
        .mount(&server)
        .await;

    client
        .delete_contact(&token(), "../users/current")
        .await
        .unwrap();
    client
        .update_contact(
            &token(),
            "c1?force=1",
            &ContactPayload {
                name: "Rosie Simpson",
                number: "459-12-56",
            },
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let targets: Vec<(&str, Option<&str>)> = requests
        .iter()
        .map(|r| (r.url.path(), r.url.query()))
        .collect();
    assert_eq!(
        targets,
        vec![
            ("/contacts/..%2Fusers%2Fcurrent", None),
            ("/contacts/c1%3Fforce=1", None),
        ]
    );
}

#[tokio::test]
async fn test_dot_segment_id_is_rejected_without_request() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.delete_contact(&token(), "..").await.unwrap_err();
    assert!(matches!(err, Error::InvalidId(ref id) if id == ".."));
    assert!(!err.is_transient());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    match client.list_contacts(&token()).await {
        Err(Error::Api {
            status,
            message,
            details,
        }) => {
            assert_eq!(status, 500);
            assert!(message.is_none());
            assert!(details.is_none());
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_contacts(&token()).await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let client = PhonebookClient::with_client("http://127.0.0.1:1", reqwest::Client::new()).unwrap();

    let err = client.list_contacts(&token()).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_transient());
    assert_eq!(err.status(), None);
}
