// src/cli.rs
use crate::config::{self, Config};
use crate::error::{AppError, AppResult};
use crate::generator;
use crate::models::{now_to_minute, parse_timestamp, NewPasswordRecord, PasswordRecord};
use crate::storage::{JsonFileStorage, RecordStorage};
use crate::store::RecordStore;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use log;
use std::io::{self, Write};
use std::path::PathBuf;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Random password generator with a local password history.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the password history file (overrides the configured location)
    #[clap(short, long, global = true, value_parser)]
    pub file: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Generate a random alphanumeric password (the default command)
    Generate {
        /// Number of characters, 6 to 30
        #[clap(short, long)]
        length: Option<usize>,
        /// Save the generated password to the history
        #[clap(short, long)]
        save: bool,
    },
    /// Save a password of your own to the history
    Add {
        password: String,
        /// Creation time, YYYY-MM-DDTHH:MM[:SS] (defaults to now)
        #[clap(long, value_parser = parse_datetime_arg)]
        at: Option<NaiveDateTime>,
    },
    /// List saved passwords, newest first
    List,
    /// Show the current password
    Current,
    /// Mark a saved password as the current one
    Use { id: i64 },
    /// Change a saved password
    Update {
        id: i64,
        #[clap(short, long)]
        password: Option<String>,
        /// New creation time, YYYY-MM-DDTHH:MM[:SS]
        #[clap(long, value_parser = parse_datetime_arg)]
        at: Option<NaiveDateTime>,
    },
    /// Remove a saved password
    Delete { id: i64 },
}

fn parse_datetime_arg(value: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(value).map_err(|e| format!("expected YYYY-MM-DDTHH:MM[:SS]: {}", e))
}

fn output_error(e: io::Error) -> AppError {
    log::error!("Failed to write command output: {}", e);
    AppError::Cli(format!("Failed to write output: {}", e))
}

/// Opens the record file and runs the parsed command against it.
pub fn handle_cli_command(cli: Cli, config: &Config) -> AppResult<()> {
    log::debug!("Handling CLI command: {:?}", cli.command);
    let path = cli.file.unwrap_or_else(|| config::data_file_path(config));
    let mut store = RecordStore::open(JsonFileStorage::new(path))?;

    let command = cli.command.unwrap_or(Commands::Generate {
        length: None,
        save: false,
    });
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(command, &mut store, config, &mut out)
}

pub fn run_command<S: RecordStorage, W: Write>(
    command: Commands,
    store: &mut RecordStore<S>,
    config: &Config,
    out: &mut W,
) -> AppResult<()> {
    match command {
        Commands::Generate { length, save } => {
            let length = length.unwrap_or(config.default_length);
            let password = generator::generate_password(length)?;
            writeln!(out, "{}", password).map_err(output_error)?;
            if save {
                save_password(store, password, None, config, out)?;
            }
        }
        Commands::Add { password, at } => {
            let password = password.trim().to_string();
            if password.is_empty() {
                log::warn!("Refusing to save a blank password.");
                return Err(AppError::Cli("Password cannot be blank.".to_string()));
            }
            save_password(store, password, at, config, out)?;
        }
        Commands::List => {
            let records = store.list();
            if records.is_empty() {
                writeln!(out, "No saved passwords.").map_err(output_error)?;
            }
            for record in &records {
                writeln!(out, "{}", format_record(record)).map_err(output_error)?;
            }
            log::info!("Listed {} records.", records.len());
        }
        Commands::Current => match store.current() {
            Some(record) => writeln!(out, "{}", format_record(record)).map_err(output_error)?,
            None => writeln!(out, "No current password.").map_err(output_error)?,
        },
        Commands::Use { id } => {
            if store.set_current(id)? {
                writeln!(out, "Password #{} is now current.", id).map_err(output_error)?;
            } else {
                writeln!(out, "No password with id {}; no password is current now.", id)
                    .map_err(output_error)?;
            }
        }
        Commands::Update { id, password, at } => {
            if password.is_none() && at.is_none() {
                return Err(AppError::Cli("Nothing to update: pass --password and/or --at.".to_string()));
            }
            let mut record = store
                .get(id)
                .cloned()
                .ok_or_else(|| AppError::Cli(format!("No password with id {}.", id)))?;
            if let Some(password) = password {
                let password = password.trim().to_string();
                if password.is_empty() {
                    return Err(AppError::Cli("Password cannot be blank.".to_string()));
                }
                record.password = password;
            }
            if let Some(at) = at {
                record.created_at = at;
            }
            if !store.update(record)? {
                return Err(AppError::Cli(format!("No password with id {}.", id)));
            }
            writeln!(out, "Updated password #{}.", id).map_err(output_error)?;
        }
        Commands::Delete { id } => {
            if store.delete(id)? {
                writeln!(out, "Deleted password #{}.", id).map_err(output_error)?;
            } else {
                writeln!(out, "No password with id {}.", id).map_err(output_error)?;
            }
        }
    }
    Ok(())
}

fn save_password<S: RecordStorage, W: Write>(
    store: &mut RecordStore<S>,
    password: String,
    at: Option<NaiveDateTime>,
    config: &Config,
    out: &mut W,
) -> AppResult<()> {
    if store.contains_password(&password) {
        log::warn!("Password is already in the history, not saving it again.");
        return Err(AppError::Cli("This password is already saved.".to_string()));
    }

    let candidate = NewPasswordRecord::new(password).at(at.unwrap_or_else(now_to_minute));
    let record = if config.save_as_current {
        store.add_as_current(candidate)?
    } else {
        store.add(candidate)?
    };

    let note = if record.is_current { " as current" } else { "" };
    writeln!(out, "Saved password #{}{}.", record.id, note).map_err(output_error)?;
    Ok(())
}

fn format_record(record: &PasswordRecord) -> String {
    format!(
        "{:>4}  {}  {}{}",
        record.id,
        record.created_at.format(DISPLAY_FORMAT),
        record.password,
        if record.is_current { "  (current)" } else { "" }
    )
}
