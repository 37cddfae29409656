//! Command line interface
//!
//! - `serve`: run the HTTP server
//! - `init-db`: create a fresh database schema

pub mod init_db;
pub mod serve;

use clap::{Parser, Subcommand};

/// PMP CMS core - user registration, login and session-bound identity
#[derive(Parser)]
#[command(name = "pmp-cms-core")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Clear existing data and create new tables
    InitDb(init_db::InitDbArgs),
}
