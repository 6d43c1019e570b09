//! listings CLI - property listings HTTP service
//!
//! Entry point for the `listings` binary:
//! - `serve`: run the HTTP server backed by MySQL
//! - `sql`: print the listings statement for a filter set without touching the database

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "listings",
    author,
    version,
    about = "Property listings service: current sale status per property, filterable by year, city and status"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Append log output to this file instead of stderr
    #[arg(long, global = true, env = "LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Print the SQL statement and bound parameters for a filter set
    Sql(commands::sql::SqlArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // ./.env wins over the login environment (USER, HOST are usually preset)
    dotenvy::dotenv_override().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        log_file: cli.log_file,
    })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Sql(args) => commands::run_sql(args).await?,
    }
    Ok(())
}
