//! Config subcommand handlers.

use dialoguer::{Input, Select};

use phonebook_config::{Config, Profile, TokenStoreKind, validate_profile_name};
use phonebook_core::{DEFAULT_BASE_URL, LogoutPolicy, RefreshFailurePolicy};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, DEFAULT_PROFILE};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const PROFILE_KEYS: &str = "base_url, email, token_store, ca_cert, insecure, timeout, \
     logout_policy, refresh_failure_policy, defaults.output, defaults.color, \
     defaults.timeout, default_profile";

// ── Helpers ─────────────────────────────────────────────────────────

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# could not render config: {e}"))
}

fn invalid(field: &str, reason: impl Into<String>) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value
        .parse()
        .map_err(|_| invalid(field, "must be 'true' or 'false'"))
}

fn parse_seconds(field: &str, value: &str) -> Result<u64, CliError> {
    value
        .parse()
        .map_err(|_| invalid(field, "must be a number (seconds)"))
}

fn parse_token_store(value: &str) -> Result<TokenStoreKind, CliError> {
    match value {
        "file" => Ok(TokenStoreKind::File),
        "keyring" => Ok(TokenStoreKind::Keyring),
        _ => Err(invalid("token_store", "must be 'file' or 'keyring'")),
    }
}

/// Apply `key = value` to the config. Unprefixed keys target `profile_name`.
fn apply_setting(
    cfg: &mut Config,
    profile_name: &str,
    key: &str,
    value: String,
) -> Result<(), CliError> {
    match key {
        "default_profile" | "default-profile" => {
            validate_profile_name(&value)?;
            cfg.default_profile = Some(value);
            return Ok(());
        }
        "defaults.output" => {
            if !matches!(
                value.as_str(),
                "table" | "json" | "json-compact" | "yaml" | "plain"
            ) {
                return Err(invalid(
                    "defaults.output",
                    "must be one of table, json, json-compact, yaml, plain",
                ));
            }
            cfg.defaults.output = value;
            return Ok(());
        }
        "defaults.color" => {
            if !matches!(value.as_str(), "auto" | "always" | "never") {
                return Err(invalid("defaults.color", "must be auto, always or never"));
            }
            cfg.defaults.color = value;
            return Ok(());
        }
        "defaults.timeout" => {
            cfg.defaults.timeout = parse_seconds(key, &value)?;
            return Ok(());
        }
        _ => {}
    }

    let profile = cfg.profiles.entry(profile_name.to_owned()).or_default();
    match key {
        "base_url" | "base-url" => {
            url::Url::parse(&value).map_err(|e| invalid("base_url", e.to_string()))?;
            profile.base_url = value;
        }
        "email" => profile.email = Some(value),
        "token_store" | "token-store" => profile.token_store = parse_token_store(&value)?,
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse_bool(key, &value)?),
        "timeout" => profile.timeout = Some(parse_seconds(key, &value)?),
        "logout_policy" | "logout-policy" => {
            profile.logout_policy = value.parse::<LogoutPolicy>().map_err(|_| {
                invalid("logout_policy", "must be 'always' or 'require-server'")
            })?;
        }
        "refresh_failure_policy" | "refresh-failure-policy" => {
            profile.refresh_failure_policy =
                value.parse::<RefreshFailurePolicy>().map_err(|_| {
                    invalid(
                        "refresh_failure_policy",
                        "must be 'keep-session' or 'clear-on-unauthorized'",
                    )
                })?;
        }
        other => {
            return Err(invalid(
                other,
                format!("unknown config key '{other}'. Valid keys: {PROFILE_KEYS}"),
            ));
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("phonebook configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(DEFAULT_PROFILE.into())
                .interact_text()
                .map_err(prompt_err)?;
            validate_profile_name(&profile_name)?;

            let base_url: String = Input::new()
                .with_prompt("Service URL")
                .default(DEFAULT_BASE_URL.into())
                .validate_with(|input: &String| {
                    url::Url::parse(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let email: String = Input::new()
                .with_prompt("Email (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let store_choices = &[
                "File in the data directory (default)",
                "System keyring",
            ];
            let token_store = match Select::new()
                .with_prompt("Where should the session token be kept?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => TokenStoreKind::File,
                _ => TokenStoreKind::Keyring,
            };

            let mut cfg = config::load_config()?;
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    base_url,
                    email: (!email.trim().is_empty()).then(|| email.trim().to_owned()),
                    token_store,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: phonebook login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            apply_setting(&mut cfg, &profile_name, &key, value)?;
            config::save_config(&cfg)?;
            output::print_status(
                &format!("Set {key} (profile '{profile_name}')"),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let default = cfg.active_profile_name(None);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: phonebook config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if *name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if name != DEFAULT_PROFILE && !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_status(
                &format!("Default profile set to '{name}'"),
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}
