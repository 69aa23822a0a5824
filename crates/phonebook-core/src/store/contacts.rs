// ── Contacts slice ──
//
// `items` is an immutable shared snapshot. Transitions that change the
// list publish a new `Arc`; all others keep the existing one so that
// pointer equality means "list unchanged".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Store;
use crate::error::ErrorInfo;
use crate::model::{Contact, ContactId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactsState {
    pub items: Arc<Vec<Contact>>,
    pub is_loading: bool,
    pub error: Option<ErrorInfo>,
    /// Time of the last successful fetch.
    pub last_fetched: Option<DateTime<Utc>>,
}

impl Store {
    pub fn is_loading(&self) -> bool {
        self.contacts.borrow().is_loading
    }

    pub fn contacts_error(&self) -> Option<ErrorInfo> {
        self.contacts.borrow().error.clone()
    }

    // ── Transitions ──────────────────────────────────────────────

    pub(crate) fn contacts_pending(&self) {
        self.contacts.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    // Outcome transitions take the session token the request ran under and
    // return `false` (store untouched) once it has fired. The check runs
    // inside the channel's write lock and every logout cancels before it
    // clears, so a finished request can never repopulate a cleared store.

    fn modify_if_live(
        &self,
        live: &CancellationToken,
        change: impl FnOnce(&mut ContactsState),
    ) -> bool {
        self.contacts.send_if_modified(|state| {
            if live.is_cancelled() {
                return false;
            }
            change(state);
            true
        })
    }

    pub(crate) fn contacts_fetched(
        &self,
        items: Vec<Contact>,
        live: &CancellationToken,
    ) -> Option<Arc<Vec<Contact>>> {
        let items = Arc::new(items);
        self.modify_if_live(live, |state| {
            state.items = Arc::clone(&items);
            state.is_loading = false;
            state.last_fetched = Some(Utc::now());
        })
        .then_some(items)
    }

    /// Append a created contact, replacing any entry with the same id.
    pub(crate) fn contact_added(&self, contact: Contact, live: &CancellationToken) -> bool {
        self.modify_if_live(live, |state| {
            let mut items = state.items.as_ref().clone();
            match items.iter_mut().find(|c| c.id == contact.id) {
                Some(existing) => *existing = contact,
                None => items.push(contact),
            }
            state.items = Arc::new(items);
            state.is_loading = false;
        })
    }

    /// Replace the entry with the same id, keeping its position.
    pub(crate) fn contact_updated(&self, contact: Contact, live: &CancellationToken) -> bool {
        self.modify_if_live(live, |state| {
            if let Some(pos) = state.items.iter().position(|c| c.id == contact.id) {
                let mut items = state.items.as_ref().clone();
                items[pos] = contact;
                state.items = Arc::new(items);
            } else {
                debug!(id = %contact.id, "updated contact not in local list");
            }
            state.is_loading = false;
        })
    }

    pub(crate) fn contact_removed(&self, id: &ContactId, live: &CancellationToken) -> bool {
        self.modify_if_live(live, |state| {
            if state.items.iter().any(|c| &c.id == id) {
                let items = state.items.iter().filter(|c| &c.id != id).cloned().collect();
                state.items = Arc::new(items);
            }
            state.is_loading = false;
        })
    }

    pub(crate) fn contacts_rejected(&self, error: ErrorInfo, live: &CancellationToken) -> bool {
        self.modify_if_live(live, |state| {
            state.is_loading = false;
            state.error = Some(error);
        })
    }

    /// Request dropped without an outcome (session ended).
    pub(crate) fn contacts_settled(&self) {
        self.contacts.send_if_modified(|state| {
            let was_loading = state.is_loading;
            state.is_loading = false;
            was_loading
        });
    }

    pub(crate) fn contacts_cleared(&self) {
        self.contacts
            .send_modify(|state| *state = ContactsState::default());
    }
}
