// src/main.rs
use clap::Parser;
use passgen_rs::{cli, config, error};

fn main() -> Result<(), error::AppError> {
    env_logger::init();
    log::info!("Starting passgen-rs");

    let cli_args = cli::Cli::parse();
    let config = config::load_config();

    if let Err(e) = cli::handle_cli_command(cli_args, &config) {
        log::error!("Application failed: {:#?}", e);
        eprintln!("Error: {}", e);
        return Err(e);
    }

    log::info!("passgen-rs finished successfully.");
    Ok(())
}
