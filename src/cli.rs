// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tagkeep::output::OutputMode;
use tagkeep::types::Label;

#[derive(Parser)]
#[command(name = "tagkeep")]
#[command(about = "Track image tags and manage secrets on Docker and Podman")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputMode::Normal, global = true)]
    pub output: OutputMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new tagkeep.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Manage tracked image tags
    #[command(subcommand)]
    Tag(TagCommand),

    /// Manage secrets
    #[command(subcommand)]
    Secret(SecretCommand),
}

#[derive(Subcommand)]
pub enum TagCommand {
    /// Pull the current digest of a tag and prune the ones it replaced
    Apply {
        /// Repository to track, e.g. library/nginx or ghcr.io/org/app:stable
        name: String,

        /// Opaque value whose change forces a new pull
        #[arg(short, long = "trigger")]
        triggers: Vec<String>,

        #[command(flatten)]
        labels: LabelArgs,

        /// Pull and prune even if no trigger changed
        #[arg(long)]
        force: bool,
    },

    /// Re-resolve a tracked tag without pulling
    Refresh { name: String },

    /// Remove every image a tracked tag pulled
    Destroy { name: String },

    /// Print the stored state of a tag
    Show { name: String },
}

#[derive(Subcommand)]
pub enum SecretCommand {
    /// Create a secret (replacing it if its attributes changed)
    Create {
        name: String,

        /// Base64-encoded payload
        #[arg(long, conflicts_with = "data_file", required_unless_present = "data_file")]
        data: Option<String>,

        /// Read the raw payload from a file
        #[arg(long)]
        data_file: Option<PathBuf>,

        #[command(flatten)]
        labels: LabelArgs,
    },

    /// Check that a stored secret still exists
    Refresh { name: String },

    /// Delete a secret
    Destroy { name: String },

    /// Print the stored state of a secret
    Show { name: String },
}

#[derive(Args)]
pub struct LabelArgs {
    /// Label as key=value
    #[arg(short, long = "label", value_parser = Label::parse)]
    pub labels: Vec<Label>,
}
