mod cli;
mod commands;
mod config;
mod error;
mod output;
mod validate;

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, ColorMode, Command, GlobalOpts, OutputFormat};
use crate::config::Session;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let matches = Cli::command().get_matches();
    let mut cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    init_tracing(cli.global.verbose);
    apply_config_defaults(&mut cli.global, &matches);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Fill `--output` / `--color` from `[defaults]` when neither flag nor env set them.
fn apply_config_defaults(global: &mut GlobalOpts, matches: &ArgMatches) {
    let defaulted = |id: &str| matches.value_source(id) == Some(ValueSource::DefaultValue);
    if !defaulted("output") && !defaulted("color") {
        return;
    }
    let defaults = match config::load_config() {
        Ok(cfg) => cfg.defaults,
        Err(err) => {
            tracing::debug!(error = %err, "config unreadable, using built-in defaults");
            return;
        }
    };
    if defaulted("output") {
        if let Ok(format) = OutputFormat::from_str(&defaults.output, true) {
            global.output = format;
        }
    }
    if defaulted("color") {
        if let Ok(mode) = ColorMode::from_str(&defaults.color, true) {
            global.color = mode;
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a session
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "phonebook", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let session = Session::open(&cli.global)?;

            tracing::debug!(profile = %session.profile_name, "dispatching command");
            let result = commands::dispatch(cmd, &session, &cli.global).await;
            session.controller.shutdown().await;
            result
        }
    }
}
