// src/cli/mod.rs
use clap::Parser;

pub mod commands;
pub mod handlers;

pub use commands::{CliCommand, GenerateArgs, SearchArgs, StorageArgs};

#[derive(Parser, Debug)]
#[command(
    name = "passgen",
    author,
    version,
    about = "Generate strong passwords and keep a hashed record of them",
    long_about = None
)]
pub struct Args {
    /// Command to execute
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}
