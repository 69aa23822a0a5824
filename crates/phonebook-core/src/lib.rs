// phonebook-core: Observable session and contact-list state between
// phonebook-api and its front ends.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod selectors;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{CommandResult, ContactCommand};
pub use config::{
    DEFAULT_BASE_URL, LogoutPolicy, RefreshFailurePolicy, SessionConfig, TlsVerification,
};
pub use controller::{Controller, LogoutOutcome};
pub use error::{CoreError, ErrorInfo, ErrorKind};
pub use model::{Contact, ContactId, User};
pub use store::{AuthState, AuthStatus, ContactsState, FilterState, Store};
pub use stream::StateStream;

pub use phonebook_api::BearerToken;
