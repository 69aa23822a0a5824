//! Command-line surface of `phonebook`.
//!
//! Kept free of crate-internal imports so `build.rs` can include it to
//! render man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// phonebook -- your contact list from the command line
#[derive(Debug, Parser)]
#[command(
    name = "phonebook",
    version,
    about = "Manage your contacts from the command line",
    long_about = "Register, log in, and manage a personal contact list stored by a\n\
        remote contacts service. The session token is kept per profile so\n\
        later commands run without logging in again.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Flags shared by every command ───────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "PHONEBOOK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, env = "PHONEBOOK_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PHONEBOOK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Colorize status lines
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print nothing but errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Answer yes to confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "PHONEBOOK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PHONEBOOK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// JSON on one line
    JsonCompact,
    /// YAML
    Yaml,
    /// One id per line
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Color when stderr is a terminal and NO_COLOR is unset
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and log in
    #[command(alias = "signup")]
    Register(RegisterArgs),

    /// Log in and store the session token
    Login(LoginArgs),

    /// End the session and forget the stored token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage contacts
    #[command(alias = "c")]
    Contacts(ContactsArgs),

    /// Inspect and edit profiles
    Config(ConfigArgs),

    /// Print a shell completion script
    Completions(CompletionsArgs),
}

// ── Auth ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Account email
    #[arg(long)]
    pub email: String,

    /// Password (prompted when omitted)
    #[arg(long, env = "PHONEBOOK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email)
    #[arg(long)]
    pub email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "PHONEBOOK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Contacts ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ContactsArgs {
    #[command(subcommand)]
    pub command: ContactsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ContactsCommand {
    /// List contacts
    #[command(alias = "ls")]
    List {
        /// Show only contacts whose name (any case) or number contains TEXT
        #[arg(long, short = 'f', value_name = "TEXT")]
        filter: Option<String>,
    },

    /// Add a contact
    Add {
        /// Contact name (at least 3 characters)
        #[arg(long)]
        name: String,

        /// Phone number, formatted ddd-ddd-dddd
        #[arg(long)]
        number: String,
    },

    /// Change a contact's name and/or number
    Edit {
        /// Contact ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New number
        #[arg(long)]
        number: Option<String>,
    },

    /// Delete a contact
    #[command(alias = "rm")]
    Delete {
        /// Contact ID
        id: String,
    },
}

// ── Config & Completions ──────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a profile interactively
    Init,

    /// Display current configuration
    Show,

    /// Set a value on the active profile (or `defaults.*` / `default_profile`)
    Set {
        /// Key, e.g. "base_url", "logout_policy", "defaults.output"
        key: String,

        /// Value to set
        value: String,
    },

    /// List profile names (* marks the default)
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
