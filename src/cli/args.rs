//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// FIMS - Field inspection forms for district officers.
#[derive(Debug, Parser)]
#[command(name = "fims")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides the layered .fims/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List inspection categories
    Categories,

    /// Start a new inspection
    New(NewArgs),

    /// Edit a stored inspection
    Edit(EditArgs),

    /// Show a stored inspection
    View(ViewArgs),

    /// List stored inspections
    List(ListArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Commands {
    /// Whether the command asked for scripted answers.
    pub fn non_interactive(&self) -> bool {
        match self {
            Commands::New(args) => args.entry.non_interactive,
            Commands::Edit(args) => args.entry.non_interactive,
            _ => false,
        }
    }
}

/// Options shared by commands that fill in a form.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EntryArgs {
    /// Latitude of the inspected site (skips the position lookup)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the inspected site
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Accuracy of the given position, in meters
    #[arg(long, requires = "lat")]
    pub accuracy: Option<f64>,

    /// Attach a photo (repeatable, at most 5 per inspection)
    #[arg(long = "photo", value_name = "FILE")]
    pub photos: Vec<PathBuf>,

    /// Answer from FIMS_PROMPT_* variables and defaults, never prompt
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `new` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct NewArgs {
    /// Inspection type (skips the type selector)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub form_type: Option<String>,

    #[command(flatten)]
    pub entry: EntryArgs,
}

/// Arguments for the `edit` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EditArgs {
    /// Inspection identifier
    pub id: String,

    #[command(flatten)]
    pub entry: EntryArgs,
}

/// Arguments for the `view` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ViewArgs {
    /// Inspection identifier
    pub id: String,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Only inspections with this status (draft, submitted)
    #[arg(long)]
    pub status: Option<String>,

    /// Only inspections of this type
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub form_type: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long, conflicts_with = "yaml")]
    pub json: bool,

    /// Output as YAML (default)
    #[arg(long)]
    pub yaml: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
