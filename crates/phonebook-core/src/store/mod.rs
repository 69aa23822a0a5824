// ── Observable application state ──
//
// Three independent slices (auth, contacts, filter), each held in a
// `watch` channel. Every transition is one `send_modify`/`send_if_modified`
// call, so subscribers never observe a half-applied change.

mod auth;
mod contacts;
mod filter;

use std::sync::Arc;

use tokio::sync::watch;

pub use auth::{AuthState, AuthStatus};
pub use contacts::ContactsState;
pub use filter::FilterState;

use crate::model::Contact;
use crate::selectors::FilteredContactsMemo;
use crate::stream::StateStream;

/// Central state container shared by the controller and its consumers.
///
/// Consumers read snapshots and subscribe; only the controller's
/// operations (crate-private transitions) mutate it.
pub struct Store {
    auth: watch::Sender<AuthState>,
    contacts: watch::Sender<ContactsState>,
    filter: watch::Sender<FilterState>,
    filtered: FilteredContactsMemo,
}

impl Store {
    pub fn new() -> Self {
        let (auth, _) = watch::channel(AuthState::default());
        let (contacts, _) = watch::channel(ContactsState::default());
        let (filter, _) = watch::channel(FilterState::default());

        Self {
            auth,
            contacts,
            filter,
            filtered: FilteredContactsMemo::default(),
        }
    }

    // ── Snapshots ────────────────────────────────────────────────

    pub fn auth(&self) -> AuthState {
        self.auth.borrow().clone()
    }

    pub fn contacts(&self) -> ContactsState {
        self.contacts.borrow().clone()
    }

    pub fn filter(&self) -> FilterState {
        self.filter.borrow().clone()
    }

    /// Current contact list snapshot.
    pub fn contact_items(&self) -> Arc<Vec<Contact>> {
        Arc::clone(&self.contacts.borrow().items)
    }

    /// Contacts matching the current filter, memoized on the
    /// `(items, filter)` pair.
    pub fn filtered_contacts(&self) -> Arc<Vec<Contact>> {
        let items = self.contact_items();
        let text = self.filter.borrow().text.clone();
        self.filtered.select(&items, &text)
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn subscribe_auth(&self) -> StateStream<AuthState> {
        StateStream::new(self.auth.subscribe())
    }

    pub fn subscribe_contacts(&self) -> StateStream<ContactsState> {
        StateStream::new(self.contacts.subscribe())
    }

    pub fn subscribe_filter(&self) -> StateStream<FilterState> {
        StateStream::new(self.filter.subscribe())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
