//! Init-db command - (re)creates the schema, dropping existing data

use std::path::PathBuf;

use clap::Args;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{initialize_schema, SqliteConfig};

#[derive(Debug, Args)]
pub struct InitDbArgs {
    /// Database file to initialize instead of the configured one
    #[arg(long)]
    pub database: Option<PathBuf>,
}

pub async fn run(args: InitDbArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(path) = args.database {
        config.database.path = path;
    }
    init_logging(&config.logging);

    let storage = SqliteConfig::from(&config.database);
    initialize_schema(&storage).await?;

    println!("Initialized the database.");
    Ok(())
}
