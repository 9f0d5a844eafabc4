//! CLI argument definitions using the clap derive API.
//!
//! This module is the only place that knows about argument names, aliases,
//! help text, and value enums. No workflow logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use craftvista_core::domain::Category;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "craftvista",
    bin_name = "craftvista",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f3fa} AI-assisted listings for artisans",
    long_about = "CraftVista turns a short description of a handmade piece \
                  into a reviewed, publishable marketplace listing.",
    after_help = "EXAMPLES:\n\
        \x20 craftvista new --credential demo --category pottery --description \"blue glazed bowl\" -m clay\n\
        \x20 craftvista categories --format json\n\
        \x20 craftvista config list\n\
        \x20 craftvista completions bash > ~/.local/share/bash-completion/completions/craftvista",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Author a listing: sign in, generate, review, publish.
    #[command(
        visible_alias = "n",
        about = "Author and publish a new listing",
        after_help = "EXAMPLES:\n\
            \x20 craftvista new --credential demo --category textiles --description \"block printed scarf\" -m cotton -m indigo\n\
            \x20 craftvista new --category jewelry --description \"silver anklet\" --price 1800 --yes\n\
            \x20 craftvista new --category pottery --description \"clay lamp\" --dry-run"
    )]
    New(NewArgs),

    /// List craft categories.
    #[command(
        visible_alias = "ls",
        about = "List craft categories",
        after_help = "EXAMPLES:\n\
            \x20 craftvista categories\n\
            \x20 craftvista categories --format csv"
    )]
    Categories(CategoriesArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 craftvista init\n\
            \x20 craftvista init --path ./craftvista.toml --force"
    )]
    Init(InitArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 craftvista completions bash > ~/.local/share/bash-completion/completions/craftvista\n\
            \x20 craftvista completions zsh  > ~/.zfunc/_craftvista\n\
            \x20 craftvista completions fish > ~/.config/fish/completions/craftvista.fish"
    )]
    Completions(CompletionsArgs),

    #[command(
        about = "Inspect configuration",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 craftvista config get generator.provider\n\
            \x20 craftvista config list\n\
            \x20 craftvista config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Credential handed to the identity provider (an ID token, or `demo`).
    #[arg(
        long = "credential",
        env = "CRAFTVISTA_CREDENTIAL",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    pub credential: Option<String>,

    #[arg(
        short = 'k',
        long = "category",
        value_name = "CATEGORY",
        help = "Craft category (see `craftvista categories`)"
    )]
    pub category: Category,

    #[arg(
        short = 'd',
        long = "description",
        value_name = "TEXT",
        help = "What you made, in your own words"
    )]
    pub description: String,

    /// Repeat or comma-separate: `-m clay -m glaze` or `-m clay,glaze`.
    #[arg(
        short = 'm',
        long = "material",
        value_name = "MATERIAL",
        value_delimiter = ','
    )]
    pub materials: Vec<String>,

    #[arg(
        long = "voice-note",
        value_name = "REF",
        help = "Reference to a recorded voice note"
    )]
    pub voice_note: Option<String>,

    /// Also ask for an artisan story to publish with the listing.
    #[arg(long = "story")]
    pub story: bool,

    #[command(flatten)]
    pub edits: EditArgs,

    /// Publish without asking for confirmation.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Stop after the review; nothing is published.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Overrides applied to the generated copy before publishing.
#[derive(Debug, Default, Args)]
pub struct EditArgs {
    #[arg(long = "title", value_name = "TEXT", help = "Replace the generated title")]
    pub title: Option<String>,

    #[arg(
        long = "body",
        value_name = "TEXT",
        help = "Replace the generated description"
    )]
    pub body: Option<String>,

    #[arg(
        long = "cultural-context",
        value_name = "TEXT",
        help = "Replace the generated cultural context"
    )]
    pub cultural_context: Option<String>,

    #[arg(
        long = "price",
        value_name = "INR",
        allow_negative_numbers = true,
        help = "Replace the suggested price"
    )]
    pub price: Option<f64>,
}

// ── categories ────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One slug per line.
    List,
    Json,
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Where to write. Defaults to the platform config directory.
    #[arg(long = "path", value_name = "FILE")]
    pub path: Option<PathBuf>,

    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `workflow.generation_timeout_secs`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path of the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
