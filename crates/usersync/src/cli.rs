//! Clap derive structures for the `usersync` CLI.
//!
//! Defines the command tree, global flags, and shared types. Also compiled
//! by `build.rs`, so it may only depend on clap, clap_complete and std.

use std::num::NonZeroU32;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// usersync -- read and manage users through the enveloped user API
#[derive(Debug, Parser)]
#[command(
    name = "usersync",
    version,
    about = "Manage users of a remote user API from the command line",
    long_about = "Reads and writes users through a `{ code, message, data }` \
        enveloped HTTP API.\n\n\
        Every write is confirmed by re-reading the affected data from the \
        server before it is shown.",
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

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "USERSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL, e.g. http://localhost:8080/api (overrides profile)
    #[arg(long, env = "USERSYNC_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "USERSYNC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "USERSYNC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read, create, update and delete users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// Show one user by id
    Get {
        /// User id
        id: u64,
    },

    /// List one page of users
    #[command(alias = "ls")]
    List {
        /// Page number, starting at 1 (server default when omitted)
        #[arg(long)]
        page: Option<NonZeroU32>,

        /// Page size (server default when omitted)
        #[arg(long)]
        size: Option<NonZeroU32>,
    },

    /// List every user without pagination
    All,

    /// Look a user up by email address
    Find {
        /// Email address
        email: String,
    },

    /// Create a user
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Age in years
        #[arg(long)]
        age: Option<u32>,
    },

    /// Update fields of a user; omitted fields are left unchanged
    Update {
        /// User id
        id: u64,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New email address
        #[arg(long)]
        email: Option<String>,

        /// New age in years
        #[arg(long)]
        age: Option<u32>,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User id
        id: u64,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a profile to the config file
    ///
    /// Uses the global --base-url, --profile and --timeout flags.
    Init {
        /// Collection path under the base URL
        #[arg(long, default_value = "users")]
        resource: String,

        /// Paginated listing path (defaults to <resource>/page)
        #[arg(long)]
        paged_list: Option<String>,

        /// Make this profile the default
        #[arg(long)]
        set_default: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
