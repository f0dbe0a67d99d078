//! `festreg` - CLI for the participant registration store
//!
//! This binary collects participant details from the command line, validates
//! them, and runs them against the local participant database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use festreg::cli::{
    confirm, Cli, Command, ConfigCommand, DeleteCommand, ListCommand, RegisterCommand,
    SearchCommand, UpdateCommand,
};
use festreg::image::{describe, read_image, write_image};
use festreg::validation::trim_input;
use festreg::{init_logging, Config, Department, Error, ParticipantStore};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Errors returned from here are fatal (configuration or database startup).
/// Per-command failures are reported by [`report`] instead.
fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // Loaded only by commands that use it, so a broken file cannot block
    // `config path` or `config validate --file`.
    let load_config =
        || Config::load_from(cli.config.clone()).context("loading configuration");

    let code = match cli.command {
        Command::Departments => {
            handle_departments();
            ExitCode::SUCCESS
        }
        Command::Config(ConfigCommand::Path) => {
            println!("{}", Config::default_config_path().display());
            ExitCode::SUCCESS
        }
        Command::Config(ConfigCommand::Validate { file }) => {
            let path = file
                .or_else(|| cli.config.clone())
                .unwrap_or_else(Config::default_config_path);
            if validate_config_file(&path) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Config(ConfigCommand::Show { json }) => {
            show_config(&load_config()?, json)?;
            ExitCode::SUCCESS
        }
        Command::Register(cmd) => {
            let config = load_config()?;
            report(handle_register(&open_store(&config)?, &config, &cmd))
        }
        Command::Search(cmd) => report(handle_search(&open_store(&load_config()?)?, &cmd)),
        Command::Update(cmd) => {
            let config = load_config()?;
            report(handle_update(&open_store(&config)?, &config, &cmd))
        }
        Command::Delete(cmd) => report(handle_delete(&open_store(&load_config()?)?, &cmd)),
        Command::List(cmd) => report(handle_list(&open_store(&load_config()?)?, &cmd)),
    };
    Ok(code)
}

fn open_store(config: &Config) -> anyhow::Result<ParticipantStore> {
    let path = config.database_path();
    ParticipantStore::open(&path)
        .with_context(|| format!("cannot open participant database {}", path.display()))
}

fn report(result: festreg::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", user_message(&err));
            ExitCode::FAILURE
        }
    }
}

fn user_message(err: &Error) -> String {
    match err {
        Error::Validation(v) => format!("Validation error: {v}"),
        Error::DuplicateKey { .. } => {
            "Registration ID already exists! Please use a different ID.".to_string()
        }
        Error::NotFound { registration_id } => {
            format!("No participant found with Registration ID: {registration_id}")
        }
        Error::ImageRead { .. } | Error::ImageType { .. } => format!("Image error: {err}"),
        other => format!("Database error: {other}"),
    }
}

fn handle_register(
    store: &ParticipantStore,
    config: &Config,
    cmd: &RegisterCommand,
) -> festreg::Result<()> {
    let mut record = cmd.details.to_form(&cmd.registration_id).into_record()?;
    if let Some(path) = &cmd.image {
        record.id_image = Some(read_image(path, &config.images.allowed_extensions)?);
    }

    store.insert(&record)?;
    println!("Participant registered successfully!");
    Ok(())
}

fn handle_search(store: &ParticipantStore, cmd: &SearchCommand) -> festreg::Result<()> {
    let record = store.find_by_id(trim_input(&cmd.registration_id))?;

    if cmd.json {
        let output = serde_json::json!({
            "participant": record,
            "image": record.id_image.as_deref().map(describe),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Participant found!");
        println!();
        println!("Registration ID:  {}", record.registration_id);
        println!("Name:             {}", record.name);
        println!("Department:       {}", record.department);
        println!("Dancing Partner:  {}", record.dancing_partner);
        println!("Contact Number:   {}", record.contact_number);
        println!("Email Address:    {}", record.email_address);
        match &record.id_image {
            Some(bytes) => println!("ID Image:         {}", describe(bytes)),
            None => println!("ID Image:         No image available"),
        }
    }

    if let Some(path) = &cmd.export_image {
        match &record.id_image {
            Some(bytes) => {
                write_image(path, bytes)?;
                println!("Image exported to {}", path.display());
            }
            None => println!("No image available to export."),
        }
    }
    Ok(())
}

fn handle_update(
    store: &ParticipantStore,
    config: &Config,
    cmd: &UpdateCommand,
) -> festreg::Result<()> {
    let registration_id = trim_input(&cmd.registration_id);
    let mut record = cmd.details.to_form(registration_id).into_record()?;

    record.id_image = if cmd.clear_image {
        None
    } else if let Some(path) = &cmd.image {
        Some(read_image(path, &config.images.allowed_extensions)?)
    } else {
        store.find_by_id(registration_id)?.id_image
    };

    store.update(registration_id, &record)?;
    println!("Participant record updated successfully!");
    Ok(())
}

fn handle_delete(store: &ParticipantStore, cmd: &DeleteCommand) -> festreg::Result<()> {
    let registration_id = trim_input(&cmd.registration_id);

    if !cmd.yes {
        let prompt =
            format!("Are you sure you want to delete participant with ID: {registration_id}?");
        if !confirm(&prompt, &mut io::stdin().lock(), &mut io::stdout())? {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    store.delete_by_id(registration_id)?;
    println!("Participant deleted successfully!");
    Ok(())
}

fn handle_list(store: &ParticipantStore, cmd: &ListCommand) -> festreg::Result<()> {
    let participants = store.list()?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&participants)?);
        return Ok(());
    }

    if participants.is_empty() {
        println!("No participants registered.");
        return Ok(());
    }

    println!(
        "{:<12} {:<24} {:<22} {:<16} {:<28} {:<6}",
        "ID", "Name", "Department", "Contact", "Email", "Photo"
    );
    for p in &participants {
        println!(
            "{:<12} {:<24} {:<22} {:<16} {:<28} {:<6}",
            p.registration_id,
            p.name,
            p.department.name(),
            p.contact_number,
            p.email_address,
            if p.image_len.is_some() { "yes" } else { "no" }
        );
    }
    println!();
    println!("{} participant(s)", participants.len());
    Ok(())
}

fn handle_departments() {
    for dept in Department::ALL {
        println!("{:<22} {}", dept.slug(), dept.name());
    }
}

fn show_config(config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("[Storage]");
    println!("  Database path:      {}", config.database_path().display());
    println!();
    println!("[Images]");
    println!(
        "  Allowed extensions: {}",
        config.images.allowed_extensions.join(", ")
    );
    Ok(())
}

/// Returns `false` and prints the reason when `path` does not load.
fn validate_config_file(path: &Path) -> bool {
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path.to_path_buf())) {
        Ok(_) => {
            println!("Configuration is valid.");
            true
        }
        Err(e) => {
            eprintln!("Configuration error: {e}");
            false
        }
    }
}
