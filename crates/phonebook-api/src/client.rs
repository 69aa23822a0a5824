// Contacts API HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, per-request bearer
// auth, and uniform error extraction. Endpoint methods live in
// `users.rs` and `contacts.rs` as inherent impls.

use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::BearerToken;
use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Raw HTTP client for the contacts API.
///
/// Holds no credential. Authenticated calls take a [`BearerToken`]
/// argument, so two identities (or a logout racing an in-flight request)
/// can never observe each other's header.
#[derive(Debug, Clone)]
pub struct PhonebookClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PhonebookClient {
    /// Create a client from a base URL and transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ensure a trailing slash so relative joins append instead of replace.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"users/login"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// URL of one item in a collection: `{base}/{collection}/{id}`.
    ///
    /// The id becomes exactly one percent-encoded segment, so `/`, `?`
    /// and `#` inside it cannot reach another route or add a query.
    /// Dot segments would be dropped by the URL parser and are rejected.
    pub(crate) fn item_url(&self, collection: &str, id: &str) -> Result<Url, Error> {
        if matches!(id, "" | "." | "..") {
            return Err(Error::InvalidId(id.to_owned()));
        }
        let mut url = self.url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    fn authorize(
        builder: reqwest::RequestBuilder,
        token: Option<&BearerToken>,
    ) -> Result<reqwest::RequestBuilder, Error> {
        match token {
            Some(token) => Ok(builder.header(AUTHORIZATION, token.header_value()?)),
            None => Ok(builder),
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = Self::authorize(self.http.get(url), token)?.send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&BearerToken>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = Self::authorize(self.http.post(url).json(body), token)?
            .send()
            .await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post_no_body(
        &self,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = Self::authorize(self.http.post(url), token)?.send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
        token: Option<&BearerToken>,
    ) -> Result<T, Error> {
        debug!("PATCH {url}");

        let resp = Self::authorize(self.http.patch(url).json(body), token)?
            .send()
            .await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, url: Url, token: Option<&BearerToken>) -> Result<(), Error> {
        debug!("DELETE {url}");

        let resp = Self::authorize(self.http.delete(url), token)?.send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            trace!(bytes = body.len(), "response body received");
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "request rejected by server");

        let details = serde_json::from_str::<serde_json::Value>(&raw).ok();
        let message = details
            .as_ref()
            .and_then(|v| serde_json::from_value::<ErrorBody>(v.clone()).ok())
            .and_then(|b| b.message.or(b.error));

        Error::Api {
            status: status.as_u16(),
            message,
            details,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> PhonebookClient {
        PhonebookClient::with_client(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn url_joins_onto_bare_host() {
        let c = client("https://example.com");
        assert_eq!(
            c.url("users/login").unwrap().as_str(),
            "https://example.com/users/login"
        );
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let c = client("https://example.com/api/");
        assert_eq!(
            c.url("/contacts/abc").unwrap().as_str(),
            "https://example.com/api/contacts/abc"
        );
    }

    #[test]
    fn item_id_is_a_single_encoded_segment() {
        let c = client("https://example.com/api");
        assert_eq!(
            c.item_url("contacts", "../users/current").unwrap().as_str(),
            "https://example.com/api/contacts/..%2Fusers%2Fcurrent"
        );
        assert_eq!(
            c.item_url("contacts", "c1?force=1#x").unwrap().as_str(),
            "https://example.com/api/contacts/c1%3Fforce=1%23x"
        );
        assert_eq!(
            c.item_url("contacts", "64a1f0").unwrap().as_str(),
            "https://example.com/api/contacts/64a1f0"
        );
    }

    #[test]
    fn dot_segment_ids_are_rejected() {
        let c = client("https://example.com");
        for id in ["", ".", ".."] {
            assert!(
                matches!(c.item_url("contacts", id), Err(Error::InvalidId(ref got)) if got == id),
                "id {id:?} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = PhonebookClient::with_client("not a url", reqwest::Client::new());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
