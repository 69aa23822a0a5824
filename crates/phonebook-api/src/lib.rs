// phonebook-api: Async Rust client for the contacts REST API

pub mod auth;
pub mod client;
pub mod contacts;
pub mod error;
pub mod models;
pub mod transport;
pub mod users;

pub use auth::{BearerToken, LoginCredentials, SignupCredentials};
pub use client::PhonebookClient;
pub use error::Error;
pub use models::{AuthResponse, ContactDto, ContactPayload, UserDto};
pub use transport::{TlsMode, TransportConfig};
