// Contact endpoints
//
// All contact routes are scoped to the token's owner by the server.

use tracing::debug;

use crate::auth::BearerToken;
use crate::client::PhonebookClient;
use crate::error::Error;
use crate::models::{ContactDto, ContactPayload};

impl PhonebookClient {
    /// List every contact of the authenticated user.
    ///
    /// `GET /contacts`
    pub async fn list_contacts(&self, token: &BearerToken) -> Result<Vec<ContactDto>, Error> {
        debug!("listing contacts");
        self.get("contacts", Some(token)).await
    }

    /// Create a contact. The server assigns the id.
    ///
    /// `POST /contacts` with `{name, number}`
    pub async fn create_contact(
        &self,
        token: &BearerToken,
        contact: &ContactPayload<'_>,
    ) -> Result<ContactDto, Error> {
        debug!(name = contact.name, "creating contact");
        self.post("contacts", contact, Some(token)).await
    }

    /// Replace a contact's name and number.
    ///
    /// `PATCH /contacts/{id}` with `{name, number}`
    pub async fn update_contact(
        &self,
        token: &BearerToken,
        id: &str,
        contact: &ContactPayload<'_>,
    ) -> Result<ContactDto, Error> {
        debug!(id, "updating contact");
        let url = self.item_url("contacts", id)?;
        self.patch(url, contact, Some(token)).await
    }

    /// Delete a contact. The response body is ignored; callers already
    /// know the id they removed.
    ///
    /// `DELETE /contacts/{id}`
    pub async fn delete_contact(&self, token: &BearerToken, id: &str) -> Result<(), Error> {
        debug!(id, "deleting contact");
        let url = self.item_url("contacts", id)?;
        self.delete(url, Some(token)).await
    }
}
