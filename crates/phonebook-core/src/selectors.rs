// ── Derived views ──
//
// Pure read-only projections over store snapshots. The filtered contact
// list is the only non-trivial one and is memoized on its inputs.

use std::sync::{Arc, Mutex, PoisonError};

use phonebook_api::BearerToken;

use crate::error::ErrorInfo;
use crate::model::{Contact, User};
use crate::store::{AuthState, ContactsState, FilterState};

/// Whether `contact` matches a filter: name case-insensitively, number
/// as a literal substring. `lowered` is `filter` already lowercased.
pub fn contact_matches(contact: &Contact, filter: &str, lowered: &str) -> bool {
    contact.name.to_lowercase().contains(lowered) || contact.number.contains(filter)
}

/// Contacts matching `filter`, in list order.
///
/// An empty filter returns the `items` snapshot itself (same allocation).
pub fn filtered_contacts(items: &Arc<Vec<Contact>>, filter: &str) -> Arc<Vec<Contact>> {
    if filter.is_empty() {
        return Arc::clone(items);
    }
    let lowered = filter.to_lowercase();
    Arc::new(
        items
            .iter()
            .filter(|c| contact_matches(c, filter, &lowered))
            .cloned()
            .collect(),
    )
}

struct MemoEntry {
    items: Arc<Vec<Contact>>,
    filter: String,
    result: Arc<Vec<Contact>>,
}

/// Single-entry cache for [`filtered_contacts`].
///
/// The cached result is reused while the items snapshot is the same
/// allocation and the filter text is equal.
#[derive(Default)]
pub struct FilteredContactsMemo {
    last: Mutex<Option<MemoEntry>>,
}

impl FilteredContactsMemo {
    pub fn select(&self, items: &Arc<Vec<Contact>>, filter: &str) -> Arc<Vec<Contact>> {
        // The entry is replaced in one assignment, so a poisoned guard
        // still holds a usable cache.
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = last.as_ref() {
            if Arc::ptr_eq(&entry.items, items) && entry.filter == filter {
                return Arc::clone(&entry.result);
            }
        }

        let result = filtered_contacts(items, filter);
        *last = Some(MemoEntry {
            items: Arc::clone(items),
            filter: filter.to_owned(),
            result: Arc::clone(&result),
        });
        result
    }
}

// ── Field selectors ──────────────────────────────────────────────

pub fn contacts(state: &ContactsState) -> &Arc<Vec<Contact>> {
    &state.items
}

pub fn is_loading(state: &ContactsState) -> bool {
    state.is_loading
}

pub fn error(state: &ContactsState) -> Option<&ErrorInfo> {
    state.error.as_ref()
}

pub fn filter(state: &FilterState) -> &str {
    &state.text
}

pub fn is_logged_in(state: &AuthState) -> bool {
    state.is_logged_in()
}

pub fn user(state: &AuthState) -> Option<&User> {
    state.user.as_ref()
}

pub fn token(state: &AuthState) -> Option<&BearerToken> {
    state.token.as_ref()
}

pub fn is_refreshing(state: &AuthState) -> bool {
    state.is_refreshing
}
