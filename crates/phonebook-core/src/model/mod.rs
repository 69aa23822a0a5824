// ── Domain model ──

mod contact;
mod user;

pub use contact::{Contact, ContactId};
pub use user::User;
