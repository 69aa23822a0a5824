//! Contact command handlers.

use tabled::Tabled;

use phonebook_core::{Contact, ContactId, ContactUpdate, NewContact};

use crate::cli::{ContactsArgs, ContactsCommand, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;
use crate::output;
use crate::validate;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ContactRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Number")]
    number: String,
}

impl From<&Contact> for ContactRow {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            number: c.number.clone(),
        }
    }
}

fn detail(c: &Contact) -> String {
    format!("ID:     {}\nName:   {}\nNumber: {}", c.id, c.name, c.number)
}

fn render_contact(contact: &Contact, global: &GlobalOpts) {
    let out = output::render_single(&global.output, contact, detail, |c| c.id.to_string());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: ContactsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    session.require_login()?;
    let controller = &session.controller;

    match args.command {
        ContactsCommand::List { filter } => {
            let spinner = util::spinner("Loading contacts...", global);
            let result = controller.fetch_contacts().await;
            spinner.finish_and_clear();
            result?;

            if let Some(ref text) = filter {
                controller.set_filter(text);
            }
            let visible = controller.filtered_contacts();
            let out = output::render_list(
                &global.output,
                visible.as_slice(),
                |c| ContactRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ContactsCommand::Add { name, number } => {
            let contact = NewContact {
                name: validate::contact_name(&name)?,
                number: validate::contact_number(&number)?,
            };
            let created = controller.add_contact(contact).await?;
            render_contact(&created, global);
            output::print_status(
                &format!("Added {}", created.name),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        ContactsCommand::Edit { id, name, number } => {
            if name.is_none() && number.is_none() {
                return Err(CliError::Validation {
                    field: "edit".into(),
                    reason: "pass --name and/or --number".into(),
                });
            }
            let current = util::resolve_contact(controller, &id).await?;
            let update = ContactUpdate {
                id: current.id.clone(),
                name: validate::contact_name(name.as_deref().unwrap_or(&current.name))?,
                number: validate::contact_number(number.as_deref().unwrap_or(&current.number))?,
            };
            let updated = controller
                .update_contact(update)
                .await
                .map_err(|err| util::contact_error(err, &current.id))?;
            render_contact(&updated, global);
            output::print_status(
                &format!("Updated {}", updated.name),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        ContactsCommand::Delete { id } => {
            let target = util::resolve_contact(controller, &id).await?;
            if !util::confirm(
                &format!("Are you sure you want to delete {}?", target.name),
                global,
                "contacts delete",
            )? {
                return Ok(());
            }
            let id = ContactId::from(id);
            controller
                .delete_contact(id.clone())
                .await
                .map_err(|err| util::contact_error(err, &id))?;
            output::print_status(
                &format!("Deleted {}", target.name),
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}
