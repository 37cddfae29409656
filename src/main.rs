use clap::Parser;
use pmp_cms_core::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::InitDb(args) => cli::init_db::run(args).await,
    }
}
