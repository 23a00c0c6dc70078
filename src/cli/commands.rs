// src/cli/commands.rs
use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::models::PoolOptions;

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Generate a new password
    Generate(GenerateArgs),

    /// Search stored entries, or check whether a password was stored (by hash)
    Search(SearchArgs),

    /// Remove the entries a search would return
    Remove(SearchArgs),

    /// Remove every stored entry
    Clear {
        /// Confirm removal of all entries
        #[arg(long)]
        yes: bool,

        #[command(flatten)]
        storage: StorageArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct StorageArgs {
    /// Path to the JSON storage file
    #[arg(long)]
    pub storage_file: Option<PathBuf>,

    /// Database connection string (postgres://... or sqlite:...), used instead of the file
    #[arg(long)]
    pub storage_dsn: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Password length [default: 16, or PASSGEN_DEFAULT_LENGTH]
    #[arg(long)]
    pub length: Option<usize>,

    /// Use digits
    #[arg(long, overrides_with = "no_digits")]
    pub digits: bool,
    /// Do not use digits
    #[arg(long, overrides_with = "digits")]
    pub no_digits: bool,

    /// Use special characters
    #[arg(long, overrides_with = "no_special")]
    pub special: bool,
    /// Do not use special characters
    #[arg(long, overrides_with = "special")]
    pub no_special: bool,

    /// Use uppercase letters
    #[arg(long, overrides_with = "no_uppercase")]
    pub uppercase: bool,
    /// Do not use uppercase letters
    #[arg(long, overrides_with = "uppercase")]
    pub no_uppercase: bool,

    /// Use lowercase letters
    #[arg(long, overrides_with = "no_lowercase")]
    pub lowercase: bool,
    /// Do not use lowercase letters
    #[arg(long, overrides_with = "lowercase")]
    pub no_lowercase: bool,

    /// Save the password hash
    #[arg(long)]
    pub save: bool,

    /// Label for the saved entry [default: entry-<timestamp>]
    #[arg(long)]
    pub label: Option<String>,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl GenerateArgs {
    // Every pool is on unless its --no-<pool> flag was the last one given
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            digits: self.digits || !self.no_digits,
            special: self.special || !self.no_special,
            uppercase: self.uppercase || !self.no_uppercase,
            lowercase: self.lowercase || !self.no_lowercase,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Part of the label to filter by (case-insensitive)
    #[arg(long)]
    pub label: Option<String>,

    /// Only entries whose hash matches this password
    #[arg(long)]
    pub password: Option<String>,

    #[command(flatten)]
    pub storage: StorageArgs,
}
