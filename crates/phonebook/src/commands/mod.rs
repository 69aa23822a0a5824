//! Command dispatch: bridges CLI args -> controller operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod contacts;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Register(args) => auth::register(session, args, global).await,
        Command::Login(args) => auth::login(session, args, global).await,
        Command::Logout => auth::logout(session, global).await,
        Command::Whoami => auth::whoami(session, global).await,
        Command::Contacts(args) => contacts::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
