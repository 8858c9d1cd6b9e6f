//! SNIES software-activities reporting backend.

mod api;
mod cli;
mod domain;
mod excel;
mod storage;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Cli::parse();
    let pool = storage::connect(&args.database_url()).await?;

    match args.command {
        Commands::Serve { addr } => cli::commands::serve(pool, addr).await,
        Commands::Import { file } => cli::commands::import(pool, &file).await,
        Commands::Export { file, limit, offset } => {
            cli::commands::export(pool, &file, limit, offset).await
        }
        Commands::List { limit, offset } => cli::commands::list(pool, limit, offset).await,
    }
}
