pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod exports;
pub mod ledger;
pub mod query;
pub mod rating;
pub mod services;
pub mod store;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::path::{Path, PathBuf};

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::ingestion::IngestionService;
use crate::services::processing::ProcessingService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_import(path: &Path, reset: bool) -> Result<()> {
    let config = AppConfig::new();
    let service = IngestionService::new(&config)?;
    service.run(path, reset)?;
    Ok(())
}

pub fn handle_process(out: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::new();
    let export_dir = out.unwrap_or_else(|| PathBuf::from(&config.storage.export_dir));
    let service = ProcessingService::new(config);
    service.run(&export_dir)?;
    Ok(())
}
