//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::participant::ParticipantForm;

/// Participant details shared by `register` and `update`.
#[derive(Debug, Clone, Args)]
pub struct ParticipantArgs {
    /// Participant's full name
    #[arg(long)]
    pub name: String,

    /// Department name or slug (see `festreg departments`)
    #[arg(short, long)]
    pub department: String,

    /// Dancing partner's name
    #[arg(short, long, default_value = "")]
    pub partner: String,

    /// Contact phone number
    #[arg(long)]
    pub contact: String,

    /// Email address
    #[arg(short, long)]
    pub email: String,
}

impl ParticipantArgs {
    /// Build an unvalidated form payload for the given registration ID.
    #[must_use]
    pub fn to_form(&self, registration_id: &str) -> ParticipantForm {
        ParticipantForm {
            registration_id: registration_id.to_string(),
            name: self.name.clone(),
            department: self.department.clone(),
            dancing_partner: self.partner.clone(),
            contact_number: self.contact.clone(),
            email_address: self.email.clone(),
            id_image: None,
        }
    }
}

/// Register command arguments.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Registration ID for the new participant
    #[arg(long = "id", value_name = "ID")]
    pub registration_id: String,

    /// Participant details.
    #[command(flatten)]
    pub details: ParticipantArgs,

    /// University ID photo to attach
    #[arg(short, long, value_name = "FILE")]
    pub image: Option<PathBuf>,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Registration ID to look up
    #[arg(value_name = "ID")]
    pub registration_id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Write the stored ID photo to this file
    #[arg(long, value_name = "FILE")]
    pub export_image: Option<PathBuf>,
}

/// Update command arguments.
///
/// Without `--image` or `--clear-image` the stored photo is kept.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Registration ID of the participant to update
    #[arg(value_name = "ID")]
    pub registration_id: String,

    /// Participant details.
    #[command(flatten)]
    pub details: ParticipantArgs,

    /// Replace the ID photo with this file
    #[arg(short, long, value_name = "FILE", conflicts_with = "clear_image")]
    pub image: Option<PathBuf>,

    /// Remove the stored ID photo
    #[arg(long)]
    pub clear_image: bool,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Registration ID of the participant to delete
    #[arg(value_name = "ID")]
    pub registration_id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
