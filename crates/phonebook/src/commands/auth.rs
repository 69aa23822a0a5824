//! Account command handlers: register, login, logout, whoami.

use dialoguer::Input;
use secrecy::SecretString;

use phonebook_core::{LoginRequest, RegisterRequest, User};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::{self, Session};
use crate::error::CliError;
use crate::output;
use crate::validate;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

fn render_user(user: &User, global: &GlobalOpts) {
    let out = output::render_single(
        &global.output,
        user,
        |u| format!("Name:  {}\nEmail: {}", u.name, u.email),
        |u| u.email.clone(),
    );
    output::print_output(&out, global.quiet);
}

/// Use the given password, or prompt for one without echo.
fn read_password(given: Option<String>) -> Result<SecretString, CliError> {
    let password = match given {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").map_err(util::prompt_err)?,
    };
    validate::password(&password)?;
    Ok(SecretString::from(password))
}

/// Remember the login email on the profile so later logins can skip it.
fn remember_email(session: &Session, email: &str) -> Result<(), CliError> {
    if session.profile.email.as_deref() == Some(email) {
        return Ok(());
    }
    let mut cfg = config::load_config()?;
    let profile = cfg
        .profiles
        .entry(session.profile_name.clone())
        .or_insert_with(|| session.profile.clone());
    profile.email = Some(email.to_owned());
    config::save_config(&cfg)?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn register(
    session: &Session,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let name = validate::user_name(&args.name)?;
    let email = validate::email(&args.email)?;
    let password = read_password(args.password)?;

    let spinner = util::spinner("Creating account...", global);
    let result = session
        .controller
        .register(RegisterRequest {
            name,
            email: email.clone(),
            password,
        })
        .await;
    spinner.finish_and_clear();
    let user = result?;

    session.persist_token()?;
    if let Err(err) = remember_email(session, &email) {
        tracing::warn!(error = %err, "could not save email to profile");
    }

    render_user(&user, global);
    output::print_status(
        &format!("Registered and logged in as {}", user.email),
        &global.color,
        global.quiet,
    );
    Ok(())
}

pub async fn login(session: &Session, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let email = match args.email.or_else(|| session.profile.email.clone()) {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let email = validate::email(&email)?;
    let password = read_password(args.password)?;

    let spinner = util::spinner("Logging in...", global);
    let result = session
        .controller
        .login(LoginRequest {
            email: email.clone(),
            password,
        })
        .await;
    spinner.finish_and_clear();
    let user = result?;

    session.persist_token()?;
    if let Err(err) = remember_email(session, &email) {
        tracing::warn!(error = %err, "could not save email to profile");
    }

    render_user(&user, global);
    output::print_status(
        &format!("Logged in as {}", user.name),
        &global.color,
        global.quiet,
    );
    Ok(())
}

pub async fn logout(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    session.require_login()?;

    let outcome = session.controller.logout().await?;
    session.persist_token()?;

    if let Some(err) = outcome.server_error {
        output::print_warning(
            &format!("the service did not confirm the logout: {}", err.message),
            &global.color,
        );
    }
    output::print_status("Logged out", &global.color, global.quiet);
    Ok(())
}

pub async fn whoami(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    session.require_login()?;

    let spinner = util::spinner("Checking session...", global);
    let result = session.controller.refresh_user().await;
    spinner.finish_and_clear();

    match result {
        Ok(user) => {
            render_user(&user, global);
            Ok(())
        }
        Err(err) => {
            // Under `clear-on-unauthorized` the core has already dropped the token.
            if !session.controller.store().is_logged_in() {
                session.persist_token()?;
            }
            Err(err.into())
        }
    }
}
