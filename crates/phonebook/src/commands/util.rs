//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use phonebook_core::{Contact, ContactId, Controller, ErrorInfo};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, global: &GlobalOpts, action: &str) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Spinner on stderr while a request is outstanding. Hidden when stderr
/// is not a terminal or `--quiet` is set.
pub fn spinner(message: &str, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Load the list and find a contact by id.
pub async fn resolve_contact(controller: &Controller, id: &str) -> Result<Contact, CliError> {
    let contacts = controller.fetch_contacts().await?;
    contacts
        .iter()
        .find(|c| c.id.as_str() == id)
        .cloned()
        .ok_or_else(|| contact_not_found(id))
}

pub fn contact_not_found(id: &str) -> CliError {
    CliError::NotFound {
        resource_type: "contact".into(),
        identifier: id.into(),
        list_command: "contacts list".into(),
    }
}

/// A 404 from a per-contact request names the id rather than the server text.
pub fn contact_error(err: ErrorInfo, id: &ContactId) -> CliError {
    if err.status == 404 {
        contact_not_found(id.as_str())
    } else {
        err.into()
    }
}
