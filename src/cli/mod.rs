//! CLI argument definitions for Gripe.

use clap::{Parser, Subcommand};

/// Gripe - complaint tracking for students and staff.
///
/// Students submit complaints and follow their progress; staff list,
/// respond, and update statuses.
#[derive(Parser, Debug)]
#[command(name = "gripe")]
#[command(author, version, about = "A CLI tool for students and staff to track complaints", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Store data under <path> instead of the default data directory.
    /// Can also be set via the GRIPE_DATA_DIR environment variable.
    #[arg(short = 'D', long = "data-dir", global = true, env = "GRIPE_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a new complaint (student flow)
    Submit {
        /// Complaint title
        title: String,

        /// Category (academics, administration, facilities, technical, other)
        #[arg(short, long)]
        category: String,

        /// Detailed description
        #[arg(short, long)]
        description: String,

        /// Acting profile ID (falls back to the default_profile config key)
        #[arg(long = "as", value_name = "PROFILE_ID")]
        actor: Option<String>,
    },

    /// List your own complaints with responses (student flow)
    Mine {
        /// Acting profile ID (falls back to the default_profile config key)
        #[arg(long = "as", value_name = "PROFILE_ID")]
        actor: Option<String>,
    },

    /// List all complaints with author and responses (staff flow)
    List {
        /// Filter by status (open, in_progress, resolved)
        #[arg(long)]
        status: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a complaint with its author and responses
    Show {
        /// Complaint ID (e.g., gr-a1b2)
        id: String,
    },

    /// Update a complaint's status (staff flow)
    Status {
        /// Complaint ID
        id: String,

        /// New status (open, in_progress, resolved)
        status: String,

        /// Acting profile ID (falls back to the default_profile config key)
        #[arg(long = "as", value_name = "PROFILE_ID")]
        actor: Option<String>,
    },

    /// Respond to a complaint, optionally updating its status (staff flow)
    Respond {
        /// Complaint ID
        id: String,

        /// Response message
        #[arg(short, long)]
        message: String,

        /// Status to move the complaint to; skipped when it already matches
        #[arg(long)]
        status: Option<String>,

        /// Acting profile ID (falls back to the default_profile config key)
        #[arg(long = "as", value_name = "PROFILE_ID")]
        actor: Option<String>,
    },

    /// Show open / in progress / resolved counts
    Summary,

    /// Profile management commands
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show the action audit trail
    Log {
        /// Optional ID or command name to filter entries
        filter: Option<String>,
    },

    /// System administration commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Register a new profile
    Register {
        /// Full name
        full_name: String,

        /// Contact email
        #[arg(short, long)]
        email: String,

        /// Role (student, staff, admin)
        #[arg(short, long, default_value = "student")]
        role: String,
    },

    /// List profiles
    List {
        /// Filter by role
        #[arg(long)]
        role: Option<String>,
    },

    /// Show profile details
    Show {
        /// Profile ID (e.g., grp-a1b2)
        id: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,
}

/// System subcommands
#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Initialize the complaint store
    Init,

    /// Show version, build info, and store counts
    Info,

    /// Rebuild the SQLite index from the JSONL journals
    Rebuild,
}
