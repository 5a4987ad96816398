mod config;
mod error;
mod loader;
mod menu;
mod prompt;
mod query;
mod selection;
mod table;

use std::io;

use anyhow::{Context, Result};
use tracing::Level;

use config::CatalogueConfig;
use menu::Menu;
use prompt::Prompter;

fn main() -> Result<()> {
    // stdout carries the menu, keep diagnostics on stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::WARN)
        .with_target(false)
        .init();

    let config = CatalogueConfig::default();
    let table = loader::load_table(&config.catalogue_path)
        .with_context(|| format!("Cannot open the car catalogue at {}!", config.catalogue_path))?;
    table
        .require_columns(&config::REQUIRED_COLUMNS)
        .context("Car catalogue is missing a required column!")?;

    let stdin = io::stdin();
    let prompter = Prompter::new(stdin.lock(), io::stdout().lock());
    Menu::new(&table, &config, prompter)
        .run()
        .context("Car catalogue session aborted!")?;
    Ok(())
}
