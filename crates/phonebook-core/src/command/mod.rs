// ── Contact command API ──
//
// Every contact-list mutation flows through `ContactCommand`. Commands are
// queued to a single writer task, which applies them one at a time in
// submission order.

pub mod requests;

use std::sync::Arc;

use phonebook_api::BearerToken;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::ErrorInfo;
use crate::model::{Contact, ContactId};
use requests::{ContactUpdate, NewContact};

/// A command envelope sent through the command channel.
///
/// The token is snapshotted at submission; `cancel` is the session token
/// that logout fires.
pub(crate) struct CommandEnvelope {
    pub command: ContactCommand,
    pub token: Option<BearerToken>,
    pub cancel: CancellationToken,
    pub response_tx: oneshot::Sender<Result<CommandResult, ErrorInfo>>,
}

/// Contact-list operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactCommand {
    Fetch,
    Add(NewContact),
    Update(ContactUpdate),
    Delete(ContactId),
}

impl ContactCommand {
    /// Message used when the server gives none.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Fetch => "Failed to fetch contacts",
            Self::Add(_) => "Failed to add contact",
            Self::Update(_) => "Failed to update contact",
            Self::Delete(_) => "Failed to delete contact",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Add(_) => "add",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// Successful outcome of a [`ContactCommand`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// The full list after a fetch.
    Contacts(Arc<Vec<Contact>>),
    /// The contact as stored by the server after add/update.
    Contact(Contact),
    /// Id of the removed contact.
    Deleted(ContactId),
}
