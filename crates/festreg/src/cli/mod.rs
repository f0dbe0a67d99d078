//! Command-line interface for festreg.
//!
//! This module provides the CLI structure for the `festreg` binary and the
//! confirmation prompt used before destructive commands.

mod commands;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DeleteCommand, ListCommand, ParticipantArgs, RegisterCommand, SearchCommand,
    UpdateCommand,
};

/// festreg - Festival participant registration desk
///
/// Register, search, update, and delete participant records kept in a local
/// `SQLite` database.
#[derive(Debug, Parser)]
#[command(name = "festreg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new participant
    Register(RegisterCommand),

    /// Look up a participant by registration ID
    Search(SearchCommand),

    /// Overwrite an existing participant's details
    Update(UpdateCommand),

    /// Delete a participant
    Delete(DeleteCommand),

    /// List all registered participants
    List(ListCommand),

    /// Show the department catalog
    Departments,

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

/// Ask a yes/no question, defaulting to no.
///
/// Only `y` or `yes` (any case) confirms. End of input counts as no.
///
/// # Errors
///
/// Returns an error if writing the prompt or reading the answer fails.
pub fn confirm(
    prompt: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
