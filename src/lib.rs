//! TimeClock library root.
//! Exposes the CLI parser, the high-level run() function, and the engine's
//! internal modules.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod hardware;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::{AppError, AppResult};

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Run { .. } => cli::commands::run::handle(&cli.command, cfg),
        Commands::AddEmployee { .. } => cli::commands::add::handle(&cli.command, cfg),
        Commands::InsertEntry { .. } => cli::commands::insert::handle(&cli.command, cfg),
        Commands::ListEntries { .. } => cli::commands::list::handle(&cli.command, cfg),
        Commands::DeleteEntry { .. } => cli::commands::del::handle(&cli.command, cfg),
        Commands::ChangeEmployeeName { .. } => cli::commands::rename::handle(&cli.command, cfg),
        Commands::Report { .. } => cli::commands::report::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Load the config once; the CLI may override the database path.
    let mut cfg = Config::load();
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    if cfg.database.trim().is_empty() {
        return Err(AppError::Config("database path is empty".into()));
    }

    dispatch(&cli, &cfg)
}
